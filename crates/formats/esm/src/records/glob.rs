use serde::Serialize;

use crate::error::{FormatErrorKind, Result};
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{FLTV, FNAM};
use crate::tag::Tag;
use crate::writer::Writer;

/// Storage type of a global variable. The value itself is always stored as a float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum VarType {
    Short,
    Long,
    #[default]
    Float,
}

impl VarType {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            b's' => Some(Self::Short),
            b'l' => Some(Self::Long),
            b'f' => Some(Self::Float),
            _ => None,
        }
    }

    fn code(self) -> u8 {
        match self {
            Self::Short => b's',
            Self::Long => b'l',
            Self::Float => b'f',
        }
    }
}

/// A script-visible global variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Global {
    pub kind: VarType,
    pub value: f32,
}

impl Record for Global {
    const TAG: Tag = Tag::new(b"GLOB");

    fn load(r: &mut Reader) -> Result<Self> {
        let code: u8 = r.get_hnt(FNAM)?;
        let kind = VarType::from_code(code).ok_or_else(|| {
            r.fail(FormatErrorKind::Invalid(format!(
                "global type {:?}",
                char::from(code)
            )))
        })?;
        let value = r.get_hnt(FLTV)?;
        Ok(Self { kind, value })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hnt(FNAM, &self.kind.code());
        w.write_hnt(FLTV, &self.value);
    }
}
