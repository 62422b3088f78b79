use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FNAM, ITEX, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const AADT: Tag = Tag::new(b"AADT");

fixed_field! {
    pub struct ApparatusData {
        /// 0 = mortar and pestle, 1 = alembic, 2 = calcinator, 3 = retort.
        pub kind: i32,
        pub quality: f32,
        pub weight: f32,
        pub value: i32,
    }
}

/// Alchemist's tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Apparatus {
    pub model: String,
    pub name: String,
    pub data: ApparatusData,
    pub icon: String,
    pub script: String,
}

impl Record for Apparatus {
    const TAG: Tag = Tag::new(b"APPA");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hn_string(FNAM)?,
            data: r.get_hnt(AADT)?,
            icon: r.get_hno_string(ITEX)?,
            script: r.get_hno_string(SCRI)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hn_c_string(FNAM, &self.name);
        w.write_hnt(AADT, &self.data);
        w.write_hno_c_string(ITEX, &self.icon);
        w.write_hno_c_string(SCRI, &self.script);
    }
}
