use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{ENAM, FNAM, ITEX, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const WPDT: Tag = Tag::new(b"WPDT");

fixed_field! {
    /// WPDT (32 bytes).
    pub struct WeaponData {
        pub weight: f32,
        pub value: i32,
        /// 0 = short blade through 13 = bolt.
        pub kind: i16,
        pub health: i16,
        pub speed: f32,
        pub reach: f32,
        pub enchant: i16,
        /// Min/max damage per attack type.
        pub chop: [u8; 2],
        pub slash: [u8; 2],
        pub thrust: [u8; 2],
        pub flags: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Weapon {
    pub model: String,
    pub name: String,
    pub data: WeaponData,
    pub script: String,
    pub icon: String,
    pub enchant: String,
}

impl Weapon {
    pub const MAGICAL: i32 = 0x01;
    pub const SILVER: i32 = 0x02;
}

impl Record for Weapon {
    const TAG: Tag = Tag::new(b"WEAP");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            data: r.get_hnt_sized(WPDT, 32)?,
            script: r.get_hno_string(SCRI)?,
            icon: r.get_hno_string(ITEX)?,
            enchant: r.get_hno_string(ENAM)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(WPDT, &self.data);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(ITEX, &self.icon);
        w.write_hno_c_string(ENAM, &self.enchant);
    }
}
