use serde::Serialize;

use crate::error::{FormatErrorKind, Result};
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::ai::ActorExtras;
use crate::records::sub::{ANAM, BNAM, CNAM, FLAG, FNAM, MODL, RNAM, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const NPDT: Tag = Tag::new(b"NPDT");
const KNAM: Tag = Tag::new(b"KNAM");

fixed_field! {
    /// Full NPC statistics (52 bytes).
    pub struct NpcStats {
        pub level: i16,
        pub attributes: [u8; 8],
        pub skills: [u8; 27],
        pub reputation: u8,
        pub health: i16,
        pub mana: i16,
        pub fatigue: i16,
        pub disposition: u8,
        pub faction_id: u8,
        pub rank: u8,
        pub unknown: u8,
        pub gold: i32,
    }
}

fixed_field! {
    /// Statistics of an autocalculated NPC (12 bytes); the rest is derived
    /// from race and class at runtime.
    pub struct NpcAutoStats {
        pub level: i16,
        pub disposition: u8,
        pub reputation: u8,
        pub rank: u8,
        pub unknown: [u8; 3],
        pub gold: i32,
    }
}

/// NPDT comes in two sizes depending on whether stats are autocalculated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NpcData {
    Full(NpcStats),
    Auto(NpcAutoStats),
}

impl Default for NpcData {
    fn default() -> Self {
        Self::Auto(NpcAutoStats::default())
    }
}

impl NpcData {
    pub fn level(&self) -> i16 {
        match self {
            Self::Full(s) => s.level,
            Self::Auto(s) => s.level,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Npc {
    pub model: String,
    pub name: String,
    pub race: String,
    pub class: String,
    pub faction: String,
    pub head: String,
    pub hair: String,
    pub script: String,
    pub data: NpcData,
    pub flags: i32,
    #[serde(flatten)]
    pub extras: ActorExtras,
}

impl Npc {
    pub const FEMALE: i32 = 0x0001;
    pub const ESSENTIAL: i32 = 0x0002;
    pub const RESPAWN: i32 = 0x0004;
    pub const AUTOCALC: i32 = 0x0010;
}

impl Record for Npc {
    const TAG: Tag = Tag::new(b"NPC_");

    fn load(r: &mut Reader) -> Result<Self> {
        let model = r.get_hno_string(MODL)?;
        let name = r.get_hno_string(FNAM)?;
        let race = r.get_hn_string(RNAM)?;
        let class = r.get_hn_string(CNAM)?;
        let faction = r.get_hn_string(ANAM)?;
        let head = r.get_hn_string(BNAM)?;
        let hair = r.get_hn_string(KNAM)?;
        let script = r.get_hno_string(SCRI)?;

        r.get_sub_name_is(NPDT)?;
        r.get_sub_header()?;
        let data = match r.sub_size() {
            52 => NpcData::Full(r.get_t()?),
            12 => NpcData::Auto(r.get_t()?),
            found => {
                return Err(r.fail(FormatErrorKind::SubSizeMismatch {
                    expected: 52,
                    found,
                }));
            }
        };

        Ok(Self {
            model,
            name,
            race,
            class,
            faction,
            head,
            hair,
            script,
            data,
            flags: r.get_hnt(FLAG)?,
            extras: ActorExtras::load(r)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hno_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hn_c_string(RNAM, &self.race);
        w.write_hn_c_string(CNAM, &self.class);
        w.write_hn_c_string(ANAM, &self.faction);
        w.write_hn_c_string(BNAM, &self.head);
        w.write_hn_c_string(KNAM, &self.hair);
        w.write_hno_c_string(SCRI, &self.script);
        match &self.data {
            NpcData::Full(s) => w.write_hnt(NPDT, s),
            NpcData::Auto(s) => w.write_hnt(NPDT, s),
        }
        w.write_hnt(FLAG, &self.flags);
        self.extras.save(w);
    }
}
