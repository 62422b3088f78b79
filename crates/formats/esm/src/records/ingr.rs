use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FNAM, ITEX, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const IRDT: Tag = Tag::new(b"IRDT");

fixed_field! {
    /// IRDT (56 bytes).
    pub struct IngredientData {
        pub weight: f32,
        pub value: i32,
        /// Magic effect ids, -1 for empty slots.
        pub effect_id: [i32; 4],
        pub skills: [i32; 4],
        pub attributes: [i32; 4],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ingredient {
    pub model: String,
    pub name: String,
    pub data: IngredientData,
    pub script: String,
    pub icon: String,
}

impl Record for Ingredient {
    const TAG: Tag = Tag::new(b"INGR");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hn_string(FNAM)?,
            data: r.get_hnt_sized(IRDT, 56)?,
            script: r.get_hno_string(SCRI)?,
            icon: r.get_hno_string(ITEX)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hn_c_string(FNAM, &self.name);
        w.write_hnt(IRDT, &self.data);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(ITEX, &self.icon);
    }
}
