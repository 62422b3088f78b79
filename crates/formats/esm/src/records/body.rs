use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FNAM, MODL};
use crate::tag::Tag;
use crate::writer::Writer;

const BYDT: Tag = Tag::new(b"BYDT");

fixed_field! {
    pub struct BodyPartData {
        /// Mesh part, see [`crate::records::parts::PartSlot`] for worn parts.
        pub part: u8,
        pub vampire: u8,
        /// 1 = female, 2 = not playable.
        pub flags: u8,
        /// 0 = skin, 1 = clothing, 2 = armor.
        pub kind: u8,
    }
}

/// Mesh for one body slot of a race, or a piece of worn equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BodyPart {
    pub model: String,
    /// Race id for skin parts.
    pub name: String,
    pub data: BodyPartData,
}

impl BodyPart {
    pub const FEMALE: u8 = 0x01;
    pub const NOT_PLAYABLE: u8 = 0x02;
}

impl Record for BodyPart {
    const TAG: Tag = Tag::new(b"BODY");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hn_string(FNAM)?,
            data: r.get_hnt(BYDT)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hn_c_string(FNAM, &self.name);
        w.write_hnt(BYDT, &self.data);
    }
}
