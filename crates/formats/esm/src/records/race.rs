use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::inventory::SpellList;
use crate::records::sub::{DESC, FNAM};
use crate::tag::Tag;
use crate::writer::Writer;

const RADT: Tag = Tag::new(b"RADT");

fixed_field! {
    pub struct SkillBonus {
        /// Skill index, -1 for unused slots.
        pub skill: i32,
        pub bonus: i32,
    }
}

fixed_field! {
    /// RADT (140 bytes).
    pub struct RaceData {
        pub bonus: [SkillBonus; 7],
        /// Starting attributes, male then female, for each of the eight attributes.
        pub attributes: [[i32; 2]; 8],
        pub height: [f32; 2],
        pub weight: [f32; 2],
        pub flags: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Race {
    pub name: String,
    pub data: RaceData,
    pub powers: SpellList,
    pub description: String,
}

impl Race {
    pub const PLAYABLE: i32 = 0x01;
    pub const BEAST: i32 = 0x02;

    pub fn is_playable(&self) -> bool {
        self.data.flags & Self::PLAYABLE != 0
    }
}

impl Record for Race {
    const TAG: Tag = Tag::new(b"RACE");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            name: r.get_hn_string(FNAM)?,
            data: r.get_hnt_sized(RADT, 140)?,
            powers: SpellList::load(r)?,
            description: r.get_hno_string(DESC)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(FNAM, &self.name);
        w.write_hnt(RADT, &self.data);
        self.powers.save(w);
        w.write_hno_string(DESC, &self.description);
    }
}
