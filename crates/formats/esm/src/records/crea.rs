use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::ai::ActorExtras;
use crate::records::sub::{CNAM, FLAG, FNAM, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const NPDT: Tag = Tag::new(b"NPDT");

fixed_field! {
    /// Creature statistics (NPDT, 96 bytes).
    pub struct CreatureData {
        /// 0 = creature, 1 = daedra, 2 = undead, 3 = humanoid.
        pub kind: i32,
        pub level: i32,
        pub attributes: [i32; 8],
        pub health: i32,
        pub mana: i32,
        pub fatigue: i32,
        pub soul: i32,
        pub combat: i32,
        pub magic: i32,
        pub stealth: i32,
        /// Min/max damage for each of three attacks.
        pub attack: [i32; 6],
        pub gold: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Creature {
    pub model: String,
    /// Creature whose sounds this one borrows.
    pub original: String,
    pub name: String,
    pub script: String,
    pub data: CreatureData,
    pub flags: i32,
    #[serde(flatten)]
    pub extras: ActorExtras,
}

impl Creature {
    pub const BIPED: i32 = 0x0001;
    pub const RESPAWN: i32 = 0x0002;
    pub const WEAPON_AND_SHIELD: i32 = 0x0004;
    pub const SWIMS: i32 = 0x0010;
    pub const FLIES: i32 = 0x0020;
    pub const WALKS: i32 = 0x0040;
    pub const ESSENTIAL: i32 = 0x0080;
}

impl Record for Creature {
    const TAG: Tag = Tag::new(b"CREA");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            original: r.get_hno_string(CNAM)?,
            name: r.get_hno_string(FNAM)?,
            script: r.get_hno_string(SCRI)?,
            data: r.get_hnt_sized(NPDT, 96)?,
            flags: r.get_hnt(FLAG)?,
            extras: ActorExtras::load(r)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(CNAM, &self.original);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hnt(NPDT, &self.data);
        w.write_hnt(FLAG, &self.flags);
        self.extras.save(w);
    }
}
