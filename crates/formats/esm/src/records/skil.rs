use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{DESC, INDX};
use crate::tag::Tag;
use crate::writer::Writer;

const SKDT: Tag = Tag::new(b"SKDT");

/// Number of hardcoded skills.
pub const LENGTH: i32 = 27;

pub const SKILL_NAMES: [&str; 27] = [
    "Block",
    "Armorer",
    "Medium Armor",
    "Heavy Armor",
    "Blunt Weapon",
    "Long Blade",
    "Axe",
    "Spear",
    "Athletics",
    "Enchant",
    "Destruction",
    "Alteration",
    "Illusion",
    "Conjuration",
    "Mysticism",
    "Restoration",
    "Alchemy",
    "Unarmored",
    "Security",
    "Sneak",
    "Acrobatics",
    "Light Armor",
    "Short Blade",
    "Marksman",
    "Mercantile",
    "Speechcraft",
    "Hand To Hand",
];

fixed_field! {
    pub struct SkillData {
        pub attribute: i32,
        pub specialization: i32,
        /// Experience gained per use, indexed by use type.
        pub use_value: [f32; 4],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Skill {
    pub index: i32,
    pub data: SkillData,
    pub description: String,
}

impl Skill {
    pub fn name(&self) -> Option<&'static str> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| SKILL_NAMES.get(i).copied())
    }
}

impl Record for Skill {
    const TAG: Tag = Tag::new(b"SKIL");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            index: r.get_hnt(INDX)?,
            data: r.get_hnt_sized(SKDT, 24)?,
            description: r.get_hno_string(DESC)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hnt(INDX, &self.index);
        w.write_hnt(SKDT, &self.data);
        w.write_hno_string(DESC, &self.description);
    }
}
