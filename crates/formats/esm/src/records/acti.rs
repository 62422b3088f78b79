use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FNAM, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

/// Something the player can use: levers, signs, shrines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Activator {
    pub model: String,
    pub name: String,
    pub script: String,
}

impl Record for Activator {
    const TAG: Tag = Tag::new(b"ACTI");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            script: r.get_hno_string(SCRI)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hno_c_string(SCRI, &self.script);
    }
}
