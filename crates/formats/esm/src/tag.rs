use std::fmt;

use serde::{Serialize, Serializer};

/// A 4-byte record or subrecord tag such as `CELL` or `FRMR`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }

    /// The file header record.
    pub const TES3: Tag = Tag::new(b"TES3");
    pub const HEDR: Tag = Tag::new(b"HEDR");
    pub const MAST: Tag = Tag::new(b"MAST");
    pub const DATA: Tag = Tag::new(b"DATA");
    pub const GMDT: Tag = Tag::new(b"GMDT");
    pub const SCRD: Tag = Tag::new(b"SCRD");
    pub const SCRS: Tag = Tag::new(b"SCRS");
    /// Record ID subrecord, read by the store ahead of the record body.
    pub const NAME: Tag = Tag::new(b"NAME");
    pub const DELE: Tag = Tag::new(b"DELE");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Tag as a string (for display). Non-ASCII bytes are escaped.
    pub fn as_string(&self) -> String {
        self.0.escape_ascii().to_string()
    }
}

impl From<&[u8; 4]> for Tag {
    fn from(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == [0; 4] {
            return f.write_str("<none>");
        }
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_plain_and_escaped() {
        assert_eq!(Tag::new(b"NPC_").to_string(), "NPC_");
        assert_eq!(Tag([b'A', 0x01, b'B', b'C']).to_string(), "A\\x01BC");
        assert_eq!(Tag::default().to_string(), "<none>");
    }
}
