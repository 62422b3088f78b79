use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{DATA, FNAM};
use crate::tag::Tag;
use crate::writer::Writer;

fixed_field! {
    pub struct SoundData {
        pub volume: u8,
        pub min_range: u8,
        pub max_range: u8,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sound {
    /// Sound file, relative to the sound directory.
    pub sound: String,
    pub data: SoundData,
}

impl Record for Sound {
    const TAG: Tag = Tag::new(b"SOUN");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            sound: r.get_hn_string(FNAM)?,
            data: r.get_hnt_sized(DATA, 3)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(FNAM, &self.sound);
        w.write_hnt(DATA, &self.data);
    }
}
