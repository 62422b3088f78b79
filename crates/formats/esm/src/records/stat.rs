use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::MODL;
use crate::tag::Tag;
use crate::writer::Writer;

/// Scenery: a mesh and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Static {
    pub model: String,
}

impl Record for Static {
    const TAG: Tag = Tag::new(b"STAT");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
    }
}
