use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{ANAM, FNAM, MODL, SCRI, SNAM};
use crate::tag::Tag;
use crate::writer::Writer;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Door {
    pub model: String,
    pub name: String,
    pub script: String,
    pub open_sound: String,
    pub close_sound: String,
}

impl Record for Door {
    const TAG: Tag = Tag::new(b"DOOR");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            script: r.get_hno_string(SCRI)?,
            open_sound: r.get_hno_string(SNAM)?,
            close_sound: r.get_hno_string(ANAM)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(SNAM, &self.open_sound);
        w.write_hno_c_string(ANAM, &self.close_sound);
    }
}
