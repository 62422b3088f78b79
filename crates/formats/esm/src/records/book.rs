use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{ENAM, FNAM, ITEX, MODL, SCRI, TEXT};
use crate::tag::Tag;
use crate::writer::Writer;

const BKDT: Tag = Tag::new(b"BKDT");

fixed_field! {
    pub struct BookData {
        pub weight: f32,
        pub value: i32,
        pub is_scroll: i32,
        /// Skill raised on first read, -1 for none.
        pub skill_id: i32,
        pub enchant: i32,
    }
}

/// Book or scroll. The text is HTML-like markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Book {
    pub model: String,
    pub name: String,
    pub data: BookData,
    pub script: String,
    pub icon: String,
    pub text: String,
    pub enchant: String,
}

impl Record for Book {
    const TAG: Tag = Tag::new(b"BOOK");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            data: r.get_hnt(BKDT)?,
            script: r.get_hno_string(SCRI)?,
            icon: r.get_hno_string(ITEX)?,
            text: r.get_hno_string(TEXT)?,
            enchant: r.get_hno_string(ENAM)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(BKDT, &self.data);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(ITEX, &self.icon);
        w.write_hno_string(TEXT, &self.text);
        w.write_hno_c_string(ENAM, &self.enchant);
    }
}
