use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FNAM, ITEX, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const MCDT: Tag = Tag::new(b"MCDT");

fixed_field! {
    pub struct MiscData {
        pub weight: f32,
        pub value: i32,
        pub is_key: i32,
    }
}

/// Clutter and keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Miscellaneous {
    pub model: String,
    pub name: String,
    pub data: MiscData,
    pub script: String,
    pub icon: String,
}

impl Record for Miscellaneous {
    const TAG: Tag = Tag::new(b"MISC");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            data: r.get_hnt_sized(MCDT, 12)?,
            script: r.get_hno_string(SCRI)?,
            icon: r.get_hno_string(ITEX)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(MCDT, &self.data);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(ITEX, &self.icon);
    }
}
