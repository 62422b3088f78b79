//! AI settings and packages shared by NPCs and creatures.

use serde::Serialize;

use crate::error::Result;
use crate::field::FixedString;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::cell::{Position, XSCL};
use crate::records::inventory::{InventoryList, NPCO, NPCS, SpellList};
use crate::tag::Tag;
use crate::writer::Writer;

pub const AIDT: Tag = Tag::new(b"AIDT");
pub const AI_W: Tag = Tag::new(b"AI_W");
pub const AI_T: Tag = Tag::new(b"AI_T");
pub const AI_F: Tag = Tag::new(b"AI_F");
pub const AI_E: Tag = Tag::new(b"AI_E");
pub const AI_A: Tag = Tag::new(b"AI_A");
pub const CNDT: Tag = Tag::new(b"CNDT");
pub const DODT: Tag = Tag::new(b"DODT");
pub const DNAM: Tag = Tag::new(b"DNAM");

fixed_field! {
    /// General AI settings (AIDT, 12 bytes).
    pub struct AiData {
        pub hello: i16,
        pub fight: u8,
        pub flee: u8,
        pub alarm: u8,
        pub unknown: [u8; 3],
        /// Bitmask of services offered (barter categories, training, spells).
        pub services: i32,
    }
}

fixed_field! {
    /// AI_W payload (14 bytes).
    pub struct AiWander {
        pub distance: i16,
        pub duration: i16,
        pub time_of_day: u8,
        pub idle: [u8; 8],
        pub unknown: u8,
    }
}

fixed_field! {
    /// AI_T payload (16 bytes).
    pub struct AiTravel {
        pub x: f32,
        pub y: f32,
        pub z: f32,
        pub unknown: i32,
    }
}

fixed_field! {
    /// AI_F and AI_E payload (48 bytes).
    pub struct AiTarget {
        pub x: f32,
        pub y: f32,
        pub z: f32,
        pub duration: i16,
        pub id: FixedString<32>,
        pub unknown: i16,
    }
}

fixed_field! {
    /// AI_A payload (33 bytes).
    pub struct AiActivate {
        pub name: FixedString<32>,
        pub unknown: u8,
    }
}

/// One AI directive. The variant is selected by the subrecord tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AiPackage {
    Wander(AiWander),
    Travel(AiTravel),
    Escort { target: AiTarget, cell: String },
    Follow { target: AiTarget, cell: String },
    Activate(AiActivate),
}

impl AiPackage {
    pub fn tag(&self) -> Tag {
        match self {
            Self::Wander(_) => AI_W,
            Self::Travel(_) => AI_T,
            Self::Escort { .. } => AI_E,
            Self::Follow { .. } => AI_F,
            Self::Activate(_) => AI_A,
        }
    }

    pub fn is_package_tag(tag: Tag) -> bool {
        matches!(tag, t if t == AI_W || t == AI_T || t == AI_E || t == AI_F || t == AI_A)
    }

    /// Decode the package whose tag has just been read.
    fn load(r: &mut Reader, tag: Tag) -> Result<Self> {
        let package = if tag == AI_W {
            Self::Wander(r.get_ht()?)
        } else if tag == AI_T {
            Self::Travel(r.get_ht()?)
        } else if tag == AI_A {
            Self::Activate(r.get_ht()?)
        } else {
            let target = r.get_ht()?;
            let cell = r.get_hno_string(CNDT)?;
            if tag == AI_E {
                Self::Escort { target, cell }
            } else {
                Self::Follow { target, cell }
            }
        };
        Ok(package)
    }

    fn save(&self, w: &mut Writer) {
        match self {
            Self::Wander(p) => w.write_hnt(AI_W, p),
            Self::Travel(p) => w.write_hnt(AI_T, p),
            Self::Activate(p) => w.write_hnt(AI_A, p),
            Self::Escort { target, cell } | Self::Follow { target, cell } => {
                w.write_hnt(self.tag(), target);
                w.write_hno_c_string(CNDT, cell);
            }
        }
    }
}

/// Ordered AI directives of an NPC or creature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiPackageList {
    pub list: Vec<AiPackage>,
}

impl AiPackageList {
    /// Read one package whose tag the reader has just consumed.
    pub fn add(&mut self, r: &mut Reader, tag: Tag) -> Result<()> {
        self.list.push(AiPackage::load(r, tag)?);
        Ok(())
    }

    /// Read all consecutive package subrecords.
    pub fn load(r: &mut Reader) -> Result<Self> {
        let mut packages = Self::default();
        while let Some(tag) = r.peek_sub_name()? {
            if !AiPackage::is_package_tag(tag) {
                break;
            }
            r.get_sub_name()?;
            packages.add(r, tag)?;
        }
        Ok(packages)
    }

    pub fn save(&self, w: &mut Writer) {
        for package in &self.list {
            package.save(w);
        }
    }
}

/// A travel service destination (DODT + optional DNAM).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Destination {
    pub pos: Position,
    /// Interior cell name, empty for exterior destinations.
    pub cell: String,
}

impl Destination {
    /// Read the DODT payload the reader is positioned on, plus the optional cell name.
    pub fn load(r: &mut Reader) -> Result<Self> {
        let pos = r.get_ht()?;
        let cell = r.get_hno_string(DNAM)?;
        Ok(Self { pos, cell })
    }

    pub fn save(&self, w: &mut Writer) {
        w.write_hnt(DODT, &self.pos);
        w.write_hno_c_string(DNAM, &self.cell);
    }
}

/// Trailing subrecords shared by NPCs and creatures. Plugins store these in
/// any order; they are written back in a fixed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActorExtras {
    pub inventory: InventoryList,
    pub spells: SpellList,
    pub ai: Option<AiData>,
    pub destinations: Vec<Destination>,
    pub packages: AiPackageList,
    pub scale: Option<f32>,
}

impl ActorExtras {
    /// Read until the end of the record. Unrecognised subrecords are skipped.
    pub fn load(r: &mut Reader) -> Result<Self> {
        let mut extras = Self::default();
        while r.peek_sub_name()?.is_some() {
            let tag = r.get_sub_name()?;
            if tag == NPCO {
                extras.inventory.add(r)?;
            } else if tag == NPCS {
                extras.spells.add(r)?;
            } else if tag == AIDT {
                extras.ai = Some(r.get_ht()?);
            } else if tag == DODT {
                extras.destinations.push(Destination::load(r)?);
            } else if AiPackage::is_package_tag(tag) {
                extras.packages.add(r, tag)?;
            } else if tag == XSCL {
                extras.scale = Some(r.get_ht()?);
            } else {
                log::debug!("{}: skipping {tag} in {}", r.name(), r.rec_name());
                r.skip_h_sub()?;
            }
        }
        Ok(extras)
    }

    pub fn save(&self, w: &mut Writer) {
        self.inventory.save(w);
        self.spells.save(w);
        w.write_hnot(AIDT, &self.ai);
        for dest in &self.destinations {
            dest.save(w);
        }
        self.packages.save(w);
        w.write_hnot(XSCL, &self.scale);
    }
}
