use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FNAM, ITEX, MODL, SCRI, SNAM};
use crate::tag::Tag;
use crate::writer::Writer;

const LHDT: Tag = Tag::new(b"LHDT");

fixed_field! {
    pub struct LightData {
        pub weight: f32,
        pub value: i32,
        /// Burn time in seconds, -1 for infinite.
        pub time: i32,
        pub radius: i32,
        /// Packed RGBA.
        pub color: i32,
        pub flags: i32,
    }
}

/// Light source, carriable or fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Light {
    pub model: String,
    pub name: String,
    pub icon: String,
    pub data: LightData,
    pub script: String,
    pub sound: String,
}

impl Light {
    pub const DYNAMIC: i32 = 0x001;
    pub const CARRY: i32 = 0x002;
    pub const NEGATIVE: i32 = 0x004;
    pub const FLICKER: i32 = 0x008;
    pub const FIRE: i32 = 0x010;
    pub const OFF_DEFAULT: i32 = 0x020;
    pub const FLICKER_SLOW: i32 = 0x040;
    pub const PULSE: i32 = 0x080;
    pub const PULSE_SLOW: i32 = 0x100;
}

impl Record for Light {
    const TAG: Tag = Tag::new(b"LIGH");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hno_string(FNAM)?,
            icon: r.get_hno_string(ITEX)?,
            data: r.get_hnt_sized(LHDT, 24)?,
            script: r.get_hno_string(SCRI)?,
            sound: r.get_hno_string(SNAM)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hno_c_string(ITEX, &self.icon);
        w.write_hnt(LHDT, &self.data);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hno_c_string(SNAM, &self.sound);
    }
}
