//! Levelled lists: pick a creature or item by the player's level.

use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{CNAM, DATA, INDX, INTV};
use crate::tag::Tag;
use crate::writer::Writer;

const NNAM: Tag = Tag::new(b"NNAM");
const INAM: Tag = Tag::new(b"INAM");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelItem {
    pub id: String,
    pub level: i16,
}

/// Contents shared by both kinds of levelled list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelledList {
    pub flags: i32,
    /// Percent chance that nothing is chosen.
    pub chance_none: u8,
    pub list: Vec<LevelItem>,
}

impl LevelledList {
    /// Creature lists: choose from all entries up to the player's level.
    /// Item lists: same, for each item in a stack.
    pub const CALC_FROM_ALL_LEVELS: i32 = 0x01;
    pub const EACH: i32 = 0x02;

    fn load(r: &mut Reader, entry: Tag) -> Result<Self> {
        let flags = r.get_hnt(DATA)?;
        let chance_none = r.get_hnt(NNAM)?;
        let count = if r.is_next_sub(INDX)? {
            r.get_ht::<i32>()?
        } else {
            0
        };

        let mut list = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count {
            let id = r.get_hn_string(entry)?;
            let level = r.get_hnt(INTV)?;
            list.push(LevelItem { id, level });
        }
        Ok(Self {
            flags,
            chance_none,
            list,
        })
    }

    fn save(&self, w: &mut Writer, entry: Tag) {
        w.write_hnt(DATA, &self.flags);
        w.write_hnt(NNAM, &self.chance_none);
        w.write_hnt(INDX, &(self.list.len() as i32));
        for item in &self.list {
            w.write_hn_c_string(entry, &item.id);
            w.write_hnt(INTV, &item.level);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatureLevList(pub LevelledList);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemLevList(pub LevelledList);

impl Record for CreatureLevList {
    const TAG: Tag = Tag::new(b"LEVC");

    fn load(r: &mut Reader) -> Result<Self> {
        LevelledList::load(r, CNAM).map(Self)
    }

    fn save(&self, w: &mut Writer) {
        self.0.save(w, CNAM);
    }
}

impl Record for ItemLevList {
    const TAG: Tag = Tag::new(b"LEVI");

    fn load(r: &mut Reader) -> Result<Self> {
        LevelledList::load(r, INAM).map(Self)
    }

    fn save(&self, w: &mut Writer) {
        self.0.save(w, INAM);
    }
}
