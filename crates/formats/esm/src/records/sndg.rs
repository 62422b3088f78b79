use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{CNAM, DATA, SNAM};
use crate::tag::Tag;
use crate::writer::Writer;

/// Sound played for a creature action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoundGenerator {
    /// 0 = left foot, 1 = right foot, 2 = swim left, 3 = swim right, 4 = moan,
    /// 5 = roar, 6 = scream, 7 = land.
    pub kind: i32,
    pub creature: String,
    pub sound: String,
}

impl Record for SoundGenerator {
    const TAG: Tag = Tag::new(b"SNDG");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            kind: r.get_hnt(DATA)?,
            creature: r.get_hno_string(CNAM)?,
            sound: r.get_hno_string(SNAM)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hnt(DATA, &self.kind);
        w.write_hno_c_string(CNAM, &self.creature);
        w.write_hno_c_string(SNAM, &self.sound);
    }
}
