use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::inventory::SpellList;
use crate::records::sub::{DESC, FNAM};
use crate::tag::Tag;
use crate::writer::Writer;

const TNAM: Tag = Tag::new(b"TNAM");

/// Birth sign: a name, a texture, a description and the powers it grants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BirthSign {
    pub name: String,
    pub texture: String,
    pub description: String,
    pub powers: SpellList,
}

impl Record for BirthSign {
    const TAG: Tag = Tag::new(b"BSGN");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            name: r.get_hn_string(FNAM)?,
            texture: r.get_hno_string(TNAM)?,
            description: r.get_hno_string(DESC)?,
            powers: SpellList::load(r)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(FNAM, &self.name);
        w.write_hno_c_string(TNAM, &self.texture);
        w.write_hno_c_string(DESC, &self.description);
        self.powers.save(w);
    }
}
