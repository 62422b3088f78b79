use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FLTV, INTV};
use crate::tag::Tag;
use crate::writer::Writer;

const STRV: Tag = Tag::new(b"STRV");

/// Engine setting value. The id prefix conventionally hints at the type
/// (`s`, `i`, `f`), but the subrecord tag is what decides it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum GameSetting {
    #[default]
    None,
    String(String),
    Int(i32),
    Float(f32),
}

impl GameSetting {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Record for GameSetting {
    const TAG: Tag = Tag::new(b"GMST");

    fn load(r: &mut Reader) -> Result<Self> {
        if r.is_next_sub(STRV)? {
            Ok(Self::String(r.get_h_string()?))
        } else if r.is_next_sub(INTV)? {
            Ok(Self::Int(r.get_ht()?))
        } else if r.is_next_sub(FLTV)? {
            Ok(Self::Float(r.get_ht()?))
        } else {
            Ok(Self::None)
        }
    }

    fn save(&self, w: &mut Writer) {
        match self {
            Self::None => {}
            Self::String(s) => w.write_hn_string(STRV, s),
            Self::Int(v) => w.write_hnt(INTV, v),
            Self::Float(v) => w.write_hnt(FLTV, v),
        }
    }
}
