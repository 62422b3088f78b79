use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::effects::EffectList;
use crate::records::sub::{FNAM, MODL, SCRI, TEXT};
use crate::tag::Tag;
use crate::writer::Writer;

const ALDT: Tag = Tag::new(b"ALDT");

fixed_field! {
    pub struct PotionData {
        pub weight: f32,
        pub value: i32,
        pub auto_calc: i32,
    }
}

/// Potion or other alchemy product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Potion {
    pub model: String,
    pub icon: String,
    pub script: String,
    pub name: String,
    pub data: PotionData,
    pub effects: EffectList,
}

impl Record for Potion {
    const TAG: Tag = Tag::new(b"ALCH");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            icon: r.get_hno_string(TEXT)?,
            script: r.get_hno_string(SCRI)?,
            name: r.get_hno_string(FNAM)?,
            data: r.get_hnt(ALDT)?,
            effects: EffectList::load(r)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(TEXT, &self.icon);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(ALDT, &self.data);
        self.effects.save(w);
    }
}
