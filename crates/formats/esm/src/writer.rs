use std::path::Path;

use crate::cursor::ByteWriter;
use crate::error::{Error, Result};
use crate::field::FixedField;
use crate::header::{Header, HeaderData};
use crate::records::Record;
use crate::tag::Tag;
use crate::text;

/// Offset of `record_count` inside the HEDR payload.
const RECORD_COUNT_OFFSET: usize = HeaderData::SIZE - 4;

/// An open record or subrecord whose size is patched on close.
struct OpenBlock {
    size_pos: usize,
    body_start: usize,
}

/// Framed writer, the inverse of [`crate::Reader`].
///
/// Sizes are written as placeholders and patched once the block is closed,
/// so records and subrecords may be built incrementally. Open blocks nest on
/// a stack.
pub struct Writer {
    buf: ByteWriter,
    open: Vec<OpenBlock>,
    record_count: usize,
    count_pos: usize,
}

impl Writer {
    /// Start a file and write its TES3 header record.
    pub fn new(header: &Header) -> Self {
        let mut w = Self {
            buf: ByteWriter::new(),
            open: Vec::new(),
            record_count: 0,
            count_pos: 0,
        };
        w.write_header(header);
        w
    }

    fn write_header(&mut self, header: &Header) {
        self.start_record(Tag::TES3, 0);
        // Payload starts after the HEDR tag and size.
        self.count_pos = self.buf.position() + 8 + RECORD_COUNT_OFFSET;
        self.write_hnt(Tag::HEDR, &header.data);
        for master in &header.masters {
            self.write_hn_c_string(Tag::MAST, &master.name);
            self.write_hnt(Tag::DATA, &master.size);
        }
        if let Some(save) = &header.save {
            self.write_hnt(Tag::GMDT, &save.data);
            self.write_hn_bytes(Tag::SCRD, &save.screenshot_format);
            self.write_hn_bytes(Tag::SCRS, &save.screenshot);
        }
        self.end_record();
        self.record_count = 0;
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.buf.position()
    }

    /// Number of top-level records written after the header.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Open a top-level record.
    pub fn start_record(&mut self, name: Tag, flags: u32) {
        if self.open.is_empty() {
            self.record_count += 1;
        }
        self.write_name(name);
        let size_pos = self.buf.position();
        self.buf.write_u32(0);
        self.buf.write_u32(0);
        self.buf.write_u32(flags);
        self.open.push(OpenBlock {
            size_pos,
            body_start: self.buf.position(),
        });
    }

    /// Close the innermost open record and patch its size.
    pub fn end_record(&mut self) {
        self.close();
    }

    /// Open a subrecord whose payload is written incrementally.
    pub fn start_sub_record(&mut self, name: Tag) {
        self.write_name(name);
        let size_pos = self.buf.position();
        self.buf.write_u32(0);
        self.open.push(OpenBlock {
            size_pos,
            body_start: self.buf.position(),
        });
    }

    pub fn end_sub_record(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        let Some(block) = self.open.pop() else {
            debug_assert!(false, "close without matching start");
            return;
        };
        let size = self.buf.position() - block.body_start;
        self.buf.patch_u32(block.size_pos, size as u32);
    }

    /// Write a whole record: tag, optional NAME id, then the record body.
    pub fn write_record<R: Record>(&mut self, id: Option<&str>, record: &R) {
        self.start_record(R::TAG, 0);
        if let Some(id) = id {
            self.write_hn_c_string(Tag::NAME, id);
        }
        record.save(self);
        self.end_record();
    }

    // ── Named writes ─────────────────────────────────────────────────────

    pub fn write_name(&mut self, name: Tag) {
        self.buf.write_bytes(name.as_bytes());
    }

    /// Write a fixed-size value as a complete subrecord.
    pub fn write_hnt<T: FixedField>(&mut self, name: Tag, value: &T) {
        self.write_name(name);
        self.buf.write_u32(T::SIZE as u32);
        let start = self.buf.position();
        value.encode(&mut self.buf);
        debug_assert_eq!(self.buf.position() - start, T::SIZE);
    }

    pub fn write_hnot<T: FixedField>(&mut self, name: Tag, value: &Option<T>) {
        if let Some(value) = value {
            self.write_hnt(name, value);
        }
    }

    /// Write a string whose stored length is exactly its byte length.
    pub fn write_hn_string(&mut self, name: Tag, s: &str) {
        self.write_hn_bytes(name, &text::encode(s));
    }

    /// Write a NUL-terminated string. The stored length includes the NUL.
    pub fn write_hn_c_string(&mut self, name: Tag, s: &str) {
        let mut bytes = text::encode(s);
        bytes.push(0);
        self.write_hn_bytes(name, &bytes);
    }

    /// Write a NUL-terminated string unless it is empty.
    pub fn write_hno_c_string(&mut self, name: Tag, s: &str) {
        if !s.is_empty() {
            self.write_hn_c_string(name, s);
        }
    }

    /// Write an exact-length string unless it is empty.
    pub fn write_hno_string(&mut self, name: Tag, s: &str) {
        if !s.is_empty() {
            self.write_hn_string(name, s);
        }
    }

    pub fn write_hn_bytes(&mut self, name: Tag, bytes: &[u8]) {
        self.write_name(name);
        self.buf.write_u32(bytes.len() as u32);
        self.buf.write_bytes(bytes);
    }

    // ── Raw writes inside an open subrecord ──────────────────────────────

    pub fn write_t<T: FixedField>(&mut self, value: &T) {
        value.encode(&mut self.buf);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.write_bytes(bytes);
    }

    /// Finish the file: patch the header record count and return the bytes.
    pub fn finish(mut self) -> Vec<u8> {
        debug_assert!(self.open.is_empty(), "{} blocks still open", self.open.len());
        let count = self.record_count as u32;
        self.buf.patch_u32(self.count_pos, count);
        self.buf.into_bytes()
    }

    /// Finish the file and write it to disk.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.finish()).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatErrorKind;
    use crate::header::{
        FileType, MasterData, SCREENSHOT_FORMAT_SIZE, SCREENSHOT_SIZE, SaveData, SaveGameHeader,
    };
    use crate::reader::Reader;

    #[test]
    fn record_sizes_are_patched() {
        let mut w = Writer::new(&Header::default());
        let body_start = w.position() + 16;
        w.start_record(Tag::new(b"MISC"), 0);
        w.write_hnt(Tag::DATA, &100i32);
        w.end_record();
        let bytes = w.finish();

        let size_field = &bytes[body_start - 12..body_start - 8];
        assert_eq!(u32::from_le_bytes(size_field.try_into().unwrap()), 12);
        assert_eq!(bytes.len(), body_start + 12);
    }

    #[test]
    fn nested_subrecord_is_patched() {
        let mut w = Writer::new(&Header::default());
        w.start_record(Tag::new(b"TEST"), 0);
        w.start_sub_record(Tag::new(b"LIST"));
        w.write_t(&1u16);
        w.write_t(&2u16);
        w.end_sub_record();
        w.end_record();
        let mut r = Reader::from_bytes("t.esp", w.finish()).unwrap();
        r.get_rec_name().unwrap();
        r.get_rec_header().unwrap();
        assert_eq!(r.get_hn_bytes(Tag::new(b"LIST")).unwrap(), vec![1, 0, 2, 0]);
    }

    #[test]
    fn header_round_trips_with_count() {
        let mut header = Header::new(FileType::Esm, "someone", "a test master");
        header.masters.push(MasterData {
            name: "Morrowind.esm".into(),
            size: 79_837_557,
        });
        let mut w = Writer::new(&header);
        for _ in 0..3 {
            w.start_record(Tag::new(b"STAT"), 0);
            w.write_hn_c_string(Tag::NAME, "x");
            w.end_record();
        }
        let r = Reader::from_bytes("t.esm", w.finish()).unwrap();
        let read = r.header();
        assert_eq!(read.file_type(), FileType::Esm);
        assert_eq!(read.data.author.as_str(), "someone");
        assert_eq!(read.masters, header.masters);
        assert_eq!(read.data.record_count, 3);
    }

    fn savegame_header() -> Header {
        let mut header = Header::new(FileType::Ess, "", "");
        header.masters.push(MasterData {
            name: "Morrowind.esm".into(),
            size: 79_837_557,
        });
        header.save = Some(SaveGameHeader {
            data: SaveData {
                pos: [-9_812.5, -71_610.0, 140.0, 0.0, 0.0, 1.5],
                cell: "Seyda Neen".into(),
                unknown: 12.25,
                player: "Nerevar".into(),
            },
            screenshot_format: (0..SCREENSHOT_FORMAT_SIZE as u8).collect(),
            screenshot: vec![0x7f; SCREENSHOT_SIZE],
        });
        header
    }

    #[test]
    fn savegame_header_round_trips() {
        let header = savegame_header();
        let w = Writer::new(&header);
        let r = Reader::from_bytes("quick.ess", w.finish()).unwrap();
        let read = r.header();
        assert_eq!(read.file_type(), FileType::Ess);
        assert_eq!(read.masters, header.masters);
        assert_eq!(read.save, header.save);
        assert!(!r.has_more_recs());
    }

    #[test]
    fn savegame_screenshot_must_be_full_size() {
        let mut header = savegame_header();
        if let Some(save) = &mut header.save {
            save.screenshot.truncate(SCREENSHOT_SIZE - 4);
        }
        let err = Reader::from_bytes("short.ess", Writer::new(&header).finish()).unwrap_err();
        assert_eq!(
            err.format_kind(),
            Some(&FormatErrorKind::SubSizeMismatch {
                expected: SCREENSHOT_SIZE,
                found: SCREENSHOT_SIZE - 4,
            })
        );

        let mut header = savegame_header();
        if let Some(save) = &mut header.save {
            save.screenshot_format.push(0);
        }
        let err = Reader::from_bytes("odd.ess", Writer::new(&header).finish()).unwrap_err();
        assert_eq!(
            err.format_kind(),
            Some(&FormatErrorKind::SubSizeMismatch {
                expected: SCREENSHOT_FORMAT_SIZE,
                found: SCREENSHOT_FORMAT_SIZE + 1,
            })
        );
    }

    #[test]
    fn empty_string_has_no_payload() {
        let mut w = Writer::new(&Header::default());
        let start = w.position();
        w.start_record(Tag::new(b"TEST"), 0);
        w.write_hn_string(Tag::NAME, "");
        w.end_record();
        let bytes = w.finish();
        // Record header, then the subrecord tag and a zero size.
        assert_eq!(bytes.len(), start + 16 + 8);
        assert_eq!(&bytes[start + 16..], b"NAME\0\0\0\0");
    }
}
