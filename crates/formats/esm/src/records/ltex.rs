use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{DATA, INTV};
use crate::tag::Tag;
use crate::writer::Writer;

/// Terrain texture referenced by index from LAND VTEX data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LandTexture {
    pub index: i32,
    pub texture: String,
}

impl Record for LandTexture {
    const TAG: Tag = Tag::new(b"LTEX");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            index: r.get_hnt(INTV)?,
            texture: r.get_hn_string(DATA)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hnt(INTV, &self.index);
        w.write_hn_c_string(DATA, &self.texture);
    }
}
