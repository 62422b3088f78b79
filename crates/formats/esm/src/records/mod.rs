//! Typed record loaders.
//!
//! Every record kind declares its tag and implements [`Record`]. The record's
//! `NAME` id, when it has one, is read by the caller before `load` and written
//! by the caller before `save` (see [`crate::Writer::write_record`]).

pub mod acti;
pub mod ai;
pub mod alch;
pub mod appa;
pub mod armo;
pub mod body;
pub mod book;
pub mod bsgn;
pub mod cell;
pub mod clas;
pub mod clot;
pub mod cont;
pub mod crea;
pub mod dial;
pub mod door;
pub mod effects;
pub mod ench;
pub mod fact;
pub mod glob;
pub mod gmst;
pub mod ingr;
pub mod inventory;
pub mod land;
pub mod lev;
pub mod ligh;
pub mod ltex;
pub mod mgef;
pub mod misc;
pub mod npc;
pub mod parts;
pub mod pgrd;
pub mod race;
pub mod regn;
pub mod scpt;
pub mod skil;
pub mod sndg;
pub mod soun;
pub mod spel;
pub mod stat;
pub mod tool;
pub mod weap;

use crate::error::Result;
use crate::reader::Reader;
use crate::tag::Tag;
use crate::writer::Writer;

pub use acti::Activator;
pub use alch::Potion;
pub use appa::Apparatus;
pub use armo::Armor;
pub use body::BodyPart;
pub use book::Book;
pub use bsgn::BirthSign;
pub use cell::{Cell, CellRef};
pub use clas::Class;
pub use clot::Clothing;
pub use cont::Container;
pub use crea::Creature;
pub use dial::{DialInfo, Dialogue};
pub use door::Door;
pub use ench::Enchantment;
pub use fact::Faction;
pub use glob::Global;
pub use gmst::GameSetting;
pub use ingr::Ingredient;
pub use land::Land;
pub use lev::{CreatureLevList, ItemLevList};
pub use ligh::Light;
pub use ltex::LandTexture;
pub use mgef::MagicEffect;
pub use misc::Miscellaneous;
pub use npc::Npc;
pub use pgrd::Pathgrid;
pub use race::Race;
pub use regn::Region;
pub use scpt::{Script, StartScript};
pub use skil::Skill;
pub use sndg::SoundGenerator;
pub use soun::Sound;
pub use spel::Spell;
pub use stat::Static;
pub use tool::{Lockpick, Probe, Repair};
pub use weap::Weapon;

/// A record kind that can be decoded from and encoded to a record body.
pub trait Record: Sized {
    /// Top-level record tag.
    const TAG: Tag;

    /// Decode the record body. The record header (and the `NAME` id, if the
    /// caller consumed it) has already been read.
    fn load(r: &mut Reader) -> Result<Self>;

    /// Encode the record body, excluding the record header and `NAME` id.
    fn save(&self, w: &mut Writer);
}

/// A record that can be placed in a cell: it has a mesh and usually a name.
pub trait BaseObject {
    /// Mesh file name, relative to the meshes directory.
    fn model(&self) -> &str;

    /// Name shown to the player.
    fn display_name(&self) -> &str {
        ""
    }
}

/// Subrecord tags shared by many record kinds.
pub(crate) mod sub {
    use crate::tag::Tag;

    pub const MODL: Tag = Tag::new(b"MODL");
    pub const FNAM: Tag = Tag::new(b"FNAM");
    pub const SCRI: Tag = Tag::new(b"SCRI");
    pub const ITEX: Tag = Tag::new(b"ITEX");
    pub const ENAM: Tag = Tag::new(b"ENAM");
    pub const DESC: Tag = Tag::new(b"DESC");
    pub const INDX: Tag = Tag::new(b"INDX");
    pub const DATA: Tag = Tag::new(b"DATA");
    pub const FLAG: Tag = Tag::new(b"FLAG");
    pub const INTV: Tag = Tag::new(b"INTV");
    pub const FLTV: Tag = Tag::new(b"FLTV");
    pub const NAME: Tag = Tag::new(b"NAME");
    pub const SNAM: Tag = Tag::new(b"SNAM");
    pub const CNAM: Tag = Tag::new(b"CNAM");
    pub const ANAM: Tag = Tag::new(b"ANAM");
    pub const BNAM: Tag = Tag::new(b"BNAM");
    pub const RNAM: Tag = Tag::new(b"RNAM");
    pub const TEXT: Tag = Tag::new(b"TEXT");
}

/// Implement [`BaseObject`] for records with `model` and `name` fields.
macro_rules! base_object {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::records::BaseObject for $ty {
                fn model(&self) -> &str {
                    &self.model
                }

                fn display_name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

base_object!(
    Activator,
    Potion,
    Apparatus,
    Armor,
    Book,
    Clothing,
    Container,
    Creature,
    Door,
    Ingredient,
    Light,
    Lockpick,
    Miscellaneous,
    Npc,
    Probe,
    Repair,
    Weapon,
);

impl BaseObject for Static {
    fn model(&self) -> &str {
        &self.model
    }
}

/// Levelled lists have no mesh of their own; they resolve to another object at spawn time.
impl BaseObject for CreatureLevList {
    fn model(&self) -> &str {
        ""
    }
}

impl BaseObject for ItemLevList {
    fn model(&self) -> &str {
        ""
    }
}
