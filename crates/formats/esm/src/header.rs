use serde::Serialize;

use crate::error::{FormatErrorKind, Result};
use crate::field::FixedString;
use crate::fixed_field;
use crate::reader::Reader;
use crate::tag::Tag;

/// Format version 1.2 (`0x3f99999a` as an IEEE float).
pub const VERSION_12: u32 = 0x3f99_999a;
/// Format version 1.3 (`0x3fa66666` as an IEEE float).
pub const VERSION_13: u32 = 0x3fa6_6666;

/// Size of the savegame screenshot format block (five ints: masks and bpp).
pub const SCREENSHOT_FORMAT_SIZE: usize = 20;
/// Size of the savegame screenshot: 128x128 pixels, 4 bytes per pixel.
pub const SCREENSHOT_SIZE: usize = 128 * 128 * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    /// Plugin (`.esp`).
    Esp,
    /// Master (`.esm`).
    Esm,
    /// Savegame (`.ess`).
    Ess,
    Other(i32),
}

impl FileType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Esp,
            1 => Self::Esm,
            32 => Self::Ess,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Esp => 0,
            Self::Esm => 1,
            Self::Ess => 32,
            Self::Other(raw) => raw,
        }
    }
}

fixed_field! {
    /// The HEDR subrecord (300 bytes).
    pub struct HeaderData {
        /// Raw bits of the float version number.
        pub version: u32,
        pub file_type: i32,
        pub author: FixedString<32>,
        pub description: FixedString<256>,
        /// Number of records in the file. Informational only.
        pub record_count: i32,
    }
}

fixed_field! {
    /// The GMDT subrecord of a savegame (124 bytes).
    pub struct SaveData {
        /// Player position and rotation.
        pub pos: [f32; 6],
        pub cell: FixedString<64>,
        /// Possibly game time.
        pub unknown: f32,
        pub player: FixedString<32>,
    }
}

/// Another content file this one depends on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterData {
    pub name: String,
    pub size: i64,
}

/// Savegame-only header blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveGameHeader {
    pub data: SaveData,
    #[serde(skip)]
    pub screenshot_format: Vec<u8>,
    #[serde(skip)]
    pub screenshot: Vec<u8>,
}

/// Parsed TES3 header record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub data: HeaderData,
    pub masters: Vec<MasterData>,
    pub save: Option<SaveGameHeader>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            data: HeaderData {
                version: VERSION_13,
                file_type: FileType::Esp.to_raw(),
                ..HeaderData::default()
            },
            masters: Vec::new(),
            save: None,
        }
    }
}

impl Header {
    pub fn new(file_type: FileType, author: &str, description: &str) -> Self {
        let mut header = Self::default();
        header.data.file_type = file_type.to_raw();
        header.data.author = author.into();
        header.data.description = description.into();
        header
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_raw(self.data.file_type)
    }

    /// Version as the float the raw bits encode (1.2 or 1.3).
    pub fn version(&self) -> f32 {
        f32::from_bits(self.data.version)
    }

    /// Read the body of the TES3 record. The record name and header have
    /// already been consumed.
    pub(crate) fn load(r: &mut Reader) -> Result<Self> {
        let data: HeaderData = r.get_hnt(Tag::HEDR)?;
        if data.version != VERSION_12 && data.version != VERSION_13 {
            return Err(r.fail(FormatErrorKind::UnsupportedVersion(data.version)));
        }

        let mut masters = Vec::new();
        while r.is_next_sub(Tag::MAST)? {
            let name = r.get_h_string()?;
            let size = r.get_hn_long(Tag::DATA)?;
            masters.push(MasterData { name, size });
        }

        let save = if FileType::from_raw(data.file_type) == FileType::Ess {
            let save_data: SaveData = r.get_hnt(Tag::GMDT)?;
            r.get_sub_name_is(Tag::SCRD)?;
            let screenshot_format = r.get_h_bytes_exact(SCREENSHOT_FORMAT_SIZE)?;
            r.get_sub_name_is(Tag::SCRS)?;
            let screenshot = r.get_h_bytes_exact(SCREENSHOT_SIZE)?;
            Some(SaveGameHeader {
                data: save_data,
                screenshot_format,
                screenshot,
            })
        } else {
            None
        };

        Ok(Self {
            data,
            masters,
            save,
        })
    }
}

/// Content files that get special treatment, recognised by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecialFile {
    Other,
    Morrowind,
    Tribunal,
    Bloodmoon,
}

impl SpecialFile {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with("morrowind.esm") {
            Self::Morrowind
        } else if lower.ends_with("tribunal.esm") {
            Self::Tribunal
        } else if lower.ends_with("bloodmoon.esm") {
            Self::Bloodmoon
        } else {
            Self::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FixedField;

    #[test]
    fn fixed_block_sizes() {
        assert_eq!(HeaderData::SIZE, 300);
        assert_eq!(SaveData::SIZE, 124);
    }

    #[test]
    fn version_bits_decode_to_floats() {
        let h = Header::default();
        assert!((h.version() - 1.3).abs() < 1e-6);
        assert!((f32::from_bits(VERSION_12) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn special_files_by_suffix() {
        assert_eq!(SpecialFile::from_name("Data Files/Morrowind.esm"), SpecialFile::Morrowind);
        assert_eq!(SpecialFile::from_name("BLOODMOON.ESM"), SpecialFile::Bloodmoon);
        assert_eq!(SpecialFile::from_name("mod.esp"), SpecialFile::Other);
    }
}
