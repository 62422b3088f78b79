use serde::Serialize;

use crate::error::Result;
use crate::field::FixedString;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{ANAM, FNAM, INTV, RNAM};
use crate::tag::Tag;
use crate::writer::Writer;

const FADT: Tag = Tag::new(b"FADT");

/// Factions have at most ten ranks.
pub const MAX_RANKS: usize = 10;

fixed_field! {
    /// Requirements for one faction rank.
    pub struct RankData {
        pub attribute1: i32,
        pub attribute2: i32,
        pub skill1: i32,
        pub skill2: i32,
        pub faction_reaction: i32,
    }
}

fixed_field! {
    /// FADT (240 bytes).
    pub struct FactionData {
        pub attribute: [i32; 2],
        pub ranks: [RankData; 10],
        /// Favoured skills, -1 for unused slots.
        pub skills: [i32; 6],
        pub unknown: i32,
        /// 1 if hidden from the player.
        pub hidden: i32,
    }
}

/// Disposition modifier towards another faction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reaction {
    pub faction: String,
    pub reaction: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Faction {
    pub name: String,
    /// Rank names, at most [`MAX_RANKS`].
    pub ranks: Vec<String>,
    pub data: FactionData,
    pub reactions: Vec<Reaction>,
}

impl Record for Faction {
    const TAG: Tag = Tag::new(b"FACT");

    fn load(r: &mut Reader) -> Result<Self> {
        let name = r.get_hn_string(FNAM)?;

        let mut ranks = Vec::new();
        while ranks.len() < MAX_RANKS && r.is_next_sub(RNAM)? {
            ranks.push(r.get_h_string()?);
        }

        let data = r.get_hnt_sized(FADT, 240)?;

        let mut reactions = Vec::new();
        while r.is_next_sub(ANAM)? {
            let faction = r.get_h_string()?;
            let reaction = r.get_hnt(INTV)?;
            reactions.push(Reaction { faction, reaction });
        }

        Ok(Self {
            name,
            ranks,
            data,
            reactions,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(FNAM, &self.name);
        for rank in self.ranks.iter().take(MAX_RANKS) {
            w.write_hnt(RNAM, &FixedString::<32>::from(rank.as_str()));
        }
        w.write_hnt(FADT, &self.data);
        for reaction in &self.reactions {
            w.write_hn_c_string(ANAM, &reaction.faction);
            w.write_hnt(INTV, &reaction.reaction);
        }
    }
}
