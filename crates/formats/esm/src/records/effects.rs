use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::sub::ENAM;
use crate::writer::Writer;

fixed_field! {
    /// One magic effect descriptor (ENAM, 24 bytes).
    pub struct EffectEntry {
        pub effect_id: i16,
        /// Skill for skill-affecting effects, -1 otherwise.
        pub skill: i8,
        /// Attribute for attribute-affecting effects, -1 otherwise.
        pub attribute: i8,
        /// 0 = self, 1 = touch, 2 = target.
        pub range: i32,
        pub area: i32,
        pub duration: i32,
        pub magnitude_min: i32,
        pub magnitude_max: i32,
    }
}

/// Ordered list of magic effects used by spells, potions and enchantments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectList {
    pub list: Vec<EffectEntry>,
}

impl EffectList {
    /// Read all consecutive ENAM subrecords.
    pub fn load(r: &mut Reader) -> Result<Self> {
        let mut list = Vec::new();
        while r.is_next_sub(ENAM)? {
            list.push(r.get_ht()?);
        }
        Ok(Self { list })
    }

    pub fn save(&self, w: &mut Writer) {
        for effect in &self.list {
            w.write_hnt(ENAM, effect);
        }
    }
}
