use serde::Serialize;

use crate::error::Result;
use crate::field::FixedString;
use crate::fixed_field;
use crate::reader::Reader;
use crate::tag::Tag;
use crate::writer::Writer;

pub const NPCO: Tag = Tag::new(b"NPCO");
pub const NPCS: Tag = Tag::new(b"NPCS");

fixed_field! {
    /// An item and how many of it (NPCO, 36 bytes).
    pub struct ContItem {
        /// Negative counts mark restocking items.
        pub count: i32,
        pub item: FixedString<32>,
    }
}

/// Items carried by a container, creature or NPC.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryList {
    pub list: Vec<ContItem>,
}

impl InventoryList {
    /// Read the NPCO subrecord the reader is positioned on.
    pub fn add(&mut self, r: &mut Reader) -> Result<()> {
        self.list.push(r.get_ht()?);
        Ok(())
    }

    /// Read all consecutive NPCO subrecords.
    pub fn load(r: &mut Reader) -> Result<Self> {
        let mut inv = Self::default();
        while r.is_next_sub(NPCO)? {
            inv.add(r)?;
        }
        Ok(inv)
    }

    pub fn save(&self, w: &mut Writer) {
        for item in &self.list {
            w.write_hnt(NPCO, item);
        }
    }
}

/// Spell ids known by an NPC or creature, or granted by a race or birth sign.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpellList {
    pub list: Vec<String>,
}

impl SpellList {
    /// Read the NPCS subrecord the reader is positioned on.
    pub fn add(&mut self, r: &mut Reader) -> Result<()> {
        self.list.push(r.get_h_string()?);
        Ok(())
    }

    /// Read all consecutive NPCS subrecords.
    pub fn load(r: &mut Reader) -> Result<Self> {
        let mut spells = Self::default();
        while r.is_next_sub(NPCS)? {
            spells.add(r)?;
        }
        Ok(spells)
    }

    /// Spell ids are stored in fixed 32-byte slots.
    pub fn save(&self, w: &mut Writer) {
        for spell in &self.list {
            w.write_hnt(NPCS, &FixedString::<32>::from(spell.as_str()));
        }
    }
}
