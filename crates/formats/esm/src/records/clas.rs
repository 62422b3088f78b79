use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{DESC, FNAM};
use crate::tag::Tag;
use crate::writer::Writer;

const CLDT: Tag = Tag::new(b"CLDT");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Specialization {
    Combat,
    Magic,
    Stealth,
}

impl Specialization {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Combat),
            1 => Some(Self::Magic),
            2 => Some(Self::Stealth),
            _ => None,
        }
    }
}

fixed_field! {
    /// CLDT (60 bytes).
    pub struct ClassData {
        pub attribute: [i32; 2],
        pub specialization: i32,
        /// Minor/major skill pairs.
        pub skills: [[i32; 2]; 5],
        pub is_playable: i32,
        /// Services offered by NPCs of this class when they autocalculate.
        pub calc: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Class {
    pub name: String,
    pub data: ClassData,
    pub description: String,
}

impl Class {
    pub fn specialization(&self) -> Option<Specialization> {
        Specialization::from_raw(self.data.specialization)
    }
}

impl Record for Class {
    const TAG: Tag = Tag::new(b"CLAS");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            name: r.get_hn_string(FNAM)?,
            data: r.get_hnt_sized(CLDT, 60)?,
            description: r.get_hno_string(DESC)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(FNAM, &self.name);
        w.write_hnt(CLDT, &self.data);
        w.write_hno_string(DESC, &self.description);
    }
}
