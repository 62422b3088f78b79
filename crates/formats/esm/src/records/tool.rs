//! Lockpicks, probes and repair hammers share one data layout.

use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FNAM, ITEX, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const LKDT: Tag = Tag::new(b"LKDT");
const PBDT: Tag = Tag::new(b"PBDT");
const RIDT: Tag = Tag::new(b"RIDT");

fixed_field! {
    /// LKDT and PBDT (16 bytes).
    pub struct ToolData {
        pub weight: f32,
        pub value: i32,
        pub quality: f32,
        pub uses: i32,
    }
}

fixed_field! {
    /// RIDT (16 bytes). Same size as [`ToolData`], different field order.
    pub struct RepairData {
        pub weight: f32,
        pub value: i32,
        pub uses: i32,
        pub quality: f32,
    }
}

/// Fields common to every tool record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tool<D> {
    pub model: String,
    pub name: String,
    pub data: D,
    pub script: String,
    pub icon: String,
}

impl<D: crate::field::FixedField> Tool<D> {
    fn load(r: &mut Reader, data_tag: Tag) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            data: r.get_hnt_sized(data_tag, 16)?,
            script: r.get_hno_string(SCRI)?,
            icon: r.get_hno_string(ITEX)?,
        })
    }

    fn save(&self, w: &mut Writer, data_tag: Tag) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(data_tag, &self.data);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(ITEX, &self.icon);
    }
}

pub type Lockpick = Tool<ToolData>;

/// Probes use the lockpick layout under a different tag; a newtype keeps the
/// two record kinds distinct.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Probe(pub Tool<ToolData>);

pub type Repair = Tool<RepairData>;

impl std::ops::Deref for Probe {
    type Target = Tool<ToolData>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Record for Lockpick {
    const TAG: Tag = Tag::new(b"LOCK");

    fn load(r: &mut Reader) -> Result<Self> {
        Tool::load(r, LKDT)
    }

    fn save(&self, w: &mut Writer) {
        Tool::save(self, w, LKDT);
    }
}

impl Record for Probe {
    const TAG: Tag = Tag::new(b"PROB");

    fn load(r: &mut Reader) -> Result<Self> {
        Tool::load(r, PBDT).map(Self)
    }

    fn save(&self, w: &mut Writer) {
        self.0.save(w, PBDT);
    }
}

impl Record for Repair {
    const TAG: Tag = Tag::new(b"REPA");

    fn load(r: &mut Reader) -> Result<Self> {
        Tool::load(r, RIDT)
    }

    fn save(&self, w: &mut Writer) {
        Tool::save(self, w, RIDT);
    }
}
