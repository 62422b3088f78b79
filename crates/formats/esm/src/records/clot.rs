use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::parts::PartReferenceList;
use crate::records::sub::{ENAM, FNAM, ITEX, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const CTDT: Tag = Tag::new(b"CTDT");

fixed_field! {
    pub struct ClothingData {
        /// 0 = pants, 1 = shoes, 2 = shirt, 3 = belt, 4 = robe, 5 = right glove,
        /// 6 = left glove, 7 = skirt, 8 = ring, 9 = amulet.
        pub kind: i32,
        pub weight: f32,
        pub value: i16,
        pub enchant: i16,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clothing {
    pub model: String,
    pub name: String,
    pub data: ClothingData,
    pub script: String,
    pub icon: String,
    pub parts: PartReferenceList,
    pub enchant: String,
}

impl Record for Clothing {
    const TAG: Tag = Tag::new(b"CLOT");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            data: r.get_hnt_sized(CTDT, 12)?,
            script: r.get_hno_string(SCRI)?,
            icon: r.get_hno_string(ITEX)?,
            parts: PartReferenceList::load(r)?,
            enchant: r.get_hno_string(ENAM)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(CTDT, &self.data);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(ITEX, &self.icon);
        self.parts.save(w);
        w.write_hno_c_string(ENAM, &self.enchant);
    }
}
