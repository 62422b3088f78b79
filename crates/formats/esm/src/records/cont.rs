use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::inventory::InventoryList;
use crate::records::sub::{FLAG, FNAM, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const CNDT: Tag = Tag::new(b"CNDT");

/// Chests, barrels, corpses and the like.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    pub model: String,
    pub name: String,
    pub weight: f32,
    pub flags: i32,
    pub script: String,
    pub inventory: InventoryList,
}

impl Container {
    pub const ORGANIC: i32 = 0x01;
    pub const RESPAWN: i32 = 0x02;
    /// Always set.
    pub const UNKNOWN: i32 = 0x08;
}

impl Record for Container {
    const TAG: Tag = Tag::new(b"CONT");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            weight: r.get_hnt(CNDT)?,
            flags: r.get_hnt(FLAG)?,
            script: r.get_hno_string(SCRI)?,
            inventory: InventoryList::load(r)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(CNDT, &self.weight);
        w.write_hnt(FLAG, &self.flags);
        w.write_hno_c_string(SCRI, &self.script);
        self.inventory.save(w);
    }
}
