use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::cursor::Cursor;
use crate::error::{Error, FormatErrorKind, Result};
use crate::field::FixedField;
use crate::header::{Header, SpecialFile};
use crate::tag::Tag;
use crate::text;

/// Record header bytes after the tag: size, reserved flags, flags.
const RECORD_HEADER_SIZE: usize = 12;

/// The bytes of one content file plus the name it was opened under.
///
/// Cloning is cheap; clones share the same buffer. Two sources are the same
/// source only if they share a buffer.
#[derive(Clone)]
pub struct Source {
    name: Arc<str>,
    data: Arc<[u8]>,
}

impl Source {
    pub fn new(name: impl Into<Arc<str>>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a whole file into memory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_same(&self, other: &Source) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("name", &self.name)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Saved cursor state. Restoring it resumes parsing exactly where
/// [`Reader::get_context`] was called, on the same source.
#[derive(Debug, Clone)]
pub struct Context {
    pub source: Source,
    /// Absolute byte offset in the source.
    pub offset: usize,
    pub left_file: usize,
    pub left_rec: usize,
    pub left_sub: usize,
    pub rec_name: Tag,
    pub sub_name: Tag,
    /// A subrecord tag that was read ahead but not consumed.
    pub cached_sub: Option<Tag>,
    pub rec_flags: u32,
    pub header: Arc<Header>,
}

/// Framed, resumable reader over a content file.
///
/// `left_file` counts bytes after the current record; `left_rec` counts
/// unread bytes of the current record; `left_sub` is the size of the last
/// subrecord header read.
pub struct Reader {
    source: Source,
    pos: usize,
    left_file: usize,
    left_rec: usize,
    left_sub: usize,
    rec_name: Tag,
    sub_name: Tag,
    cached_sub: Option<Tag>,
    rec_flags: u32,
    header: Arc<Header>,
    special: SpecialFile,
}

impl Reader {
    /// Open a file from disk and parse its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_source(Source::from_path(path)?)
    }

    /// Parse the header of an in-memory file.
    pub fn from_bytes(name: &str, data: impl Into<Arc<[u8]>>) -> Result<Self> {
        Self::from_source(Source::new(name, data))
    }

    /// Open a source and parse the mandatory TES3 header record.
    pub fn from_source(source: Source) -> Result<Self> {
        let mut r = Self::open_raw(source);
        let name = r.get_rec_name()?;
        if name != Tag::TES3 {
            return Err(r.fail(FormatErrorKind::NotTes3(name)));
        }
        r.get_rec_header()?;
        let header = Header::load(&mut r)?;
        if r.left_rec != 0 {
            // Unknown trailing header subrecords are ignored.
            r.skip_record()?;
        }
        r.header = Arc::new(header);
        Ok(r)
    }

    /// Set up a reader over a source without parsing anything.
    pub fn open_raw(source: Source) -> Self {
        let special = SpecialFile::from_name(source.name());
        Self {
            left_file: source.len(),
            source,
            pos: 0,
            left_rec: 0,
            left_sub: 0,
            rec_name: Tag::default(),
            sub_name: Tag::default(),
            cached_sub: None,
            rec_flags: 0,
            header: Arc::new(Header::default()),
            special,
        }
    }

    /// A reader positioned at a saved context.
    pub fn resume(ctx: &Context) -> Self {
        let mut r = Self::open_raw(ctx.source.clone());
        r.restore_context(ctx);
        r
    }

    // ── Information retrieval ────────────────────────────────────────────

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn special(&self) -> SpecialFile {
        self.special
    }

    /// Absolute byte offset in the source.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn rec_name(&self) -> Tag {
        self.rec_name
    }

    pub fn sub_name(&self) -> Tag {
        self.sub_name
    }

    /// Size of the last subrecord whose header was read.
    pub fn sub_size(&self) -> usize {
        self.left_sub
    }

    /// Flags of the current record.
    pub fn rec_flags(&self) -> u32 {
        self.rec_flags
    }

    /// Subrecord tag read ahead and waiting to be consumed.
    pub fn cached_sub(&self) -> Option<Tag> {
        self.cached_sub
    }

    pub fn has_more_recs(&self) -> bool {
        self.left_file > 0
    }

    pub fn has_more_subs(&self) -> bool {
        self.left_rec > 0
    }

    // ── Contexts ─────────────────────────────────────────────────────────

    /// Snapshot the full cursor state.
    pub fn get_context(&self) -> Context {
        Context {
            source: self.source.clone(),
            offset: self.pos,
            left_file: self.left_file,
            left_rec: self.left_rec,
            left_sub: self.left_sub,
            rec_name: self.rec_name,
            sub_name: self.sub_name,
            cached_sub: self.cached_sub,
            rec_flags: self.rec_flags,
            header: Arc::clone(&self.header),
        }
    }

    /// Resume at a saved context, switching sources if it belongs to another file.
    pub fn restore_context(&mut self, ctx: &Context) {
        if !self.source.is_same(&ctx.source) {
            log::debug!("switching source {} -> {}", self.source.name(), ctx.source.name());
            self.special = SpecialFile::from_name(ctx.source.name());
            self.source = ctx.source.clone();
        }
        self.pos = ctx.offset;
        self.left_file = ctx.left_file;
        self.left_rec = ctx.left_rec;
        self.left_sub = ctx.left_sub;
        self.rec_name = ctx.rec_name;
        self.sub_name = ctx.sub_name;
        self.cached_sub = ctx.cached_sub;
        self.rec_flags = ctx.rec_flags;
        self.header = Arc::clone(&ctx.header);
    }

    // ── Medium-level reading shortcuts ───────────────────────────────────

    /// Read a fixed-size value stored in a subrecord with the given tag.
    pub fn get_hnt<T: FixedField>(&mut self, name: Tag) -> Result<T> {
        self.get_sub_name_is(name)?;
        self.get_ht()
    }

    /// Like [`Reader::get_hnt`], additionally checking the expected on-disk size.
    pub fn get_hnt_sized<T: FixedField>(&mut self, name: Tag, size: usize) -> Result<T> {
        if T::SIZE != size {
            return Err(self.fail(FormatErrorKind::SubSizeMismatch {
                expected: size,
                found: T::SIZE,
            }));
        }
        self.get_hnt(name)
    }

    /// Optional version of [`Reader::get_hnt`].
    pub fn get_hnot<T: FixedField>(&mut self, name: Tag) -> Result<Option<T>> {
        if self.is_next_sub(name)? {
            return self.get_ht().map(Some);
        }
        Ok(None)
    }

    pub fn get_hn_long(&mut self, name: Tag) -> Result<i64> {
        self.get_hnt(name)
    }

    /// Read a fixed-size value, including the subrecord header.
    pub fn get_ht<T: FixedField>(&mut self) -> Result<T> {
        self.get_sub_header()?;
        self.get_t()
    }

    /// Decode the payload of the subrecord whose header was just read.
    ///
    /// Used where the payload layout depends on the declared size.
    pub fn get_t<T: FixedField>(&mut self) -> Result<T> {
        if self.left_sub != T::SIZE {
            return Err(self.fail(FormatErrorKind::SubSizeMismatch {
                expected: T::SIZE,
                found: self.left_sub,
            }));
        }
        let start = self.advance(T::SIZE)?;
        let data = Arc::clone(&self.source.data);
        let mut c = Cursor::new(&data[start..start + T::SIZE]);
        let value = T::decode(&mut c).map_err(|e| self.wrap(e))?;
        debug_assert!(c.is_empty(), "{} bytes left after decode", c.remaining());
        Ok(value)
    }

    /// Read a string if the next subrecord has the given tag, else `""`.
    pub fn get_hno_string(&mut self, name: Tag) -> Result<String> {
        if self.is_next_sub(name)? {
            return self.get_h_string();
        }
        Ok(String::new())
    }

    /// Read a string with the given subrecord tag.
    pub fn get_hn_string(&mut self, name: Tag) -> Result<String> {
        self.get_sub_name_is(name)?;
        self.get_h_string()
    }

    /// Read a string, including the subrecord header (but not the name).
    ///
    /// The declared subrecord size is the string length. A trailing NUL
    /// terminator, if present, ends the string.
    pub fn get_h_string(&mut self) -> Result<String> {
        self.get_sub_header()?;

        // Some plugins write zero-length strings that still carry a single
        // zero byte. Skip it.
        if self.left_sub == 0 {
            if self.left_rec > 0 && self.source.data.get(self.pos) == Some(&0) {
                self.left_rec -= 1;
                self.pos += 1;
            }
            return Ok(String::new());
        }

        let size = self.left_sub;
        self.get_string(size)
    }

    /// Read the raw payload of a subrecord, including its header.
    pub fn get_h_bytes(&mut self) -> Result<Vec<u8>> {
        self.get_sub_header()?;
        let size = self.left_sub;
        let start = self.advance(size)?;
        Ok(self.source.data[start..start + size].to_vec())
    }

    /// Read the raw payload of a subrecord that must be exactly `size` bytes.
    pub fn get_h_bytes_exact(&mut self, size: usize) -> Result<Vec<u8>> {
        let bytes = self.get_h_bytes()?;
        if bytes.len() != size {
            return Err(self.fail(FormatErrorKind::SubSizeMismatch {
                expected: size,
                found: bytes.len(),
            }));
        }
        Ok(bytes)
    }

    pub fn get_hn_bytes(&mut self, name: Tag) -> Result<Vec<u8>> {
        self.get_sub_name_is(name)?;
        self.get_h_bytes()
    }

    /// Skip a DELE marker if it is next. Returns whether one was present.
    pub fn skip_deleted(&mut self) -> Result<bool> {
        if self.is_next_sub(Tag::DELE)? {
            self.skip_h_sub()?;
            return Ok(true);
        }
        Ok(false)
    }

    // ── Low level subrecord methods ──────────────────────────────────────

    /// Read the next subrecord tag and check it matches `name`.
    pub fn get_sub_name_is(&mut self, name: Tag) -> Result<()> {
        let found = self.get_sub_name()?;
        if found != name {
            return Err(self.fail(FormatErrorKind::UnexpectedSubrecord {
                expected: name,
                found,
            }));
        }
        Ok(())
    }

    /// Check whether the next subrecord has the given tag.
    ///
    /// On a match the tag is consumed, exactly as if [`Reader::get_sub_name`]
    /// had been called. Otherwise it stays buffered for the next call to
    /// `get_sub_name`, `is_next_sub` or `get_sub_name_is`.
    pub fn is_next_sub(&mut self, name: Tag) -> Result<bool> {
        match self.peek_sub_name()? {
            Some(next) if next == name => {
                self.get_sub_name()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// The next subrecord tag without consuming it, or `None` at end of record.
    pub fn peek_sub_name(&mut self) -> Result<Option<Tag>> {
        if let Some(tag) = self.cached_sub {
            return Ok(Some(tag));
        }
        if self.left_rec == 0 {
            return Ok(None);
        }
        let tag = self.read_sub_tag()?;
        self.cached_sub = Some(tag);
        Ok(Some(tag))
    }

    /// Push the current subrecord tag back so the next read returns it again.
    pub fn cache_sub_name(&mut self) {
        self.cached_sub = Some(self.sub_name);
    }

    /// Read (or take the buffered) next subrecord tag.
    pub fn get_sub_name(&mut self) -> Result<Tag> {
        if let Some(tag) = self.cached_sub.take() {
            self.sub_name = tag;
            return Ok(tag);
        }
        let tag = self.read_sub_tag()?;
        self.sub_name = tag;
        Ok(tag)
    }

    /// Skip the current subrecord, including its header (but not its name).
    pub fn skip_h_sub(&mut self) -> Result<()> {
        self.get_sub_header()?;
        self.skip(self.left_sub)
    }

    /// Skip the current subrecord and check its size.
    pub fn skip_h_sub_size(&mut self, size: usize) -> Result<()> {
        self.skip_h_sub()?;
        if self.left_sub != size {
            return Err(self.fail(FormatErrorKind::SubSizeMismatch {
                expected: size,
                found: self.left_sub,
            }));
        }
        Ok(())
    }

    /// Read a subrecord size header. This moves `left_rec` past the whole
    /// subrecord; `left_sub` holds the payload size.
    pub fn get_sub_header(&mut self) -> Result<usize> {
        if self.left_rec < 4 {
            return Err(self.fail(FormatErrorKind::EndOfRecord));
        }
        let size = self.read_u32()? as usize;
        self.left_rec -= 4;
        if size > self.left_rec {
            return Err(self.fail(FormatErrorKind::SubrecordOverrun {
                size,
                left: self.left_rec,
            }));
        }
        self.left_rec -= size;
        self.left_sub = size;
        Ok(size)
    }

    fn read_sub_tag(&mut self) -> Result<Tag> {
        if self.left_rec < 4 {
            return Err(self.fail(FormatErrorKind::EndOfRecord));
        }
        let tag = self.read_tag()?;
        self.left_rec -= 4;
        Ok(tag)
    }

    // ── Low level record methods ─────────────────────────────────────────

    /// Read the next record tag. The previous record must be fully consumed.
    pub fn get_rec_name(&mut self) -> Result<Tag> {
        if self.left_rec != 0 {
            return Err(self.fail(FormatErrorKind::UnreadBytes(self.left_rec)));
        }
        if self.left_file < 4 {
            return Err(self.fail(FormatErrorKind::EndOfFile("no more records")));
        }
        let tag = self.read_tag()?;
        self.left_file -= 4;
        self.rec_name = tag;
        self.sub_name = Tag::default();
        Ok(tag)
    }

    /// Read a record header. This moves `left_file` past the whole record;
    /// `left_rec` then tracks position inside it.
    pub fn get_rec_header(&mut self) -> Result<u32> {
        if self.left_file < RECORD_HEADER_SIZE {
            return Err(self.fail(FormatErrorKind::EndOfFile("while reading record header")));
        }
        if self.left_rec != 0 {
            return Err(self.fail(FormatErrorKind::UnreadBytes(self.left_rec)));
        }
        let size = self.read_u32()? as usize;
        // The first flags word is always zero.
        let _reserved = self.read_u32()?;
        let flags = self.read_u32()?;
        self.left_file -= RECORD_HEADER_SIZE;
        if size > self.left_file {
            return Err(self.fail(FormatErrorKind::RecordOverrun {
                size,
                left: self.left_file,
            }));
        }
        self.left_file -= size;
        self.left_rec = size;
        self.cached_sub = None;
        self.rec_flags = flags;
        Ok(flags)
    }

    /// Skip the rest of this record. The name and header have already been read.
    pub fn skip_record(&mut self) -> Result<()> {
        let left = self.left_rec;
        self.skip(left)?;
        self.left_rec = 0;
        self.cached_sub = None;
        Ok(())
    }

    /// Skip an entire record, including its header (but not its name).
    pub fn skip_h_record(&mut self) -> Result<()> {
        if self.left_file == 0 {
            return Ok(());
        }
        self.get_rec_header()?;
        self.skip_record()
    }

    // ── Lowest level data reading ────────────────────────────────────────

    /// Read `size` bytes as a string. Reading stops at the first NUL.
    pub fn get_string(&mut self, size: usize) -> Result<String> {
        let start = self.advance(size)?;
        Ok(text::decode_c(&self.source.data[start..start + size]))
    }

    pub fn skip(&mut self, bytes: usize) -> Result<()> {
        self.advance(bytes).map(|_| ())
    }

    /// Build a format error at the current position.
    pub fn fail(&self, kind: FormatErrorKind) -> Error {
        Error::Format {
            file: self.source.name().to_string(),
            record: self.rec_name,
            subrecord: self.sub_name,
            offset: self.pos,
            kind,
        }
    }

    /// Attach position context to a low-level decode error.
    fn wrap(&self, err: Error) -> Error {
        match err {
            Error::Format { .. } => err,
            other => self.fail(FormatErrorKind::Decode(other.to_string())),
        }
    }

    fn advance(&mut self, n: usize) -> Result<usize> {
        if self.pos + n > self.source.data.len() {
            return Err(self.fail(FormatErrorKind::EndOfFile("read past end of data")));
        }
        let start = self.pos;
        self.pos += n;
        Ok(start)
    }

    fn read_tag(&mut self) -> Result<Tag> {
        let start = self.advance(4)?;
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&self.source.data[start..start + 4]);
        Ok(Tag(tag))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let start = self.advance(4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.source.data[start..start + 4]);
        Ok(u32::from_le_bytes(bytes))
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("source", &self.source)
            .field("offset", &self.pos)
            .field("record", &self.rec_name)
            .field("left_rec", &self.left_rec)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Writer;

    const ALPH: Tag = Tag::new(b"ALPH");
    const BETA: Tag = Tag::new(b"BETA");
    const GAMA: Tag = Tag::new(b"GAMA");

    fn sample() -> Vec<u8> {
        let mut w = Writer::new(&Header::default());
        w.start_record(Tag::new(b"TEST"), 0);
        w.write_hnt(ALPH, &7i32);
        w.write_hn_c_string(BETA, "hello");
        w.write_hnt(GAMA, &1.5f32);
        w.end_record();
        w.finish()
    }

    fn open() -> Reader {
        let mut r = Reader::from_bytes("sample.esp", sample()).unwrap();
        assert_eq!(r.get_rec_name().unwrap(), Tag::new(b"TEST"));
        r.get_rec_header().unwrap();
        r
    }

    #[test]
    fn lookahead_survives_mismatch() {
        let mut r = open();
        assert!(!r.is_next_sub(BETA).unwrap());
        assert_eq!(r.cached_sub(), Some(ALPH));
        // A second probe for another tag sees the same buffered tag.
        assert!(!r.is_next_sub(GAMA).unwrap());
        assert!(r.is_next_sub(ALPH).unwrap());
        assert_eq!(r.cached_sub(), None);
        assert_eq!(r.get_ht::<i32>().unwrap(), 7);
        assert_eq!(r.get_hn_string(BETA).unwrap(), "hello");
    }

    #[test]
    fn probing_at_end_of_record_is_false() {
        let mut r = open();
        r.get_hnt::<i32>(ALPH).unwrap();
        r.get_hn_string(BETA).unwrap();
        r.get_hnt::<f32>(GAMA).unwrap();
        assert!(!r.has_more_subs());
        assert!(!r.is_next_sub(ALPH).unwrap());
        assert!(!r.has_more_recs());
    }

    #[test]
    fn unexpected_tag_is_a_format_error() {
        let mut r = open();
        let err = r.get_hnt::<i32>(BETA).unwrap_err();
        assert_eq!(
            err.format_kind(),
            Some(&FormatErrorKind::UnexpectedSubrecord {
                expected: BETA,
                found: ALPH,
            })
        );
        match err {
            Error::Format { file, record, .. } => {
                assert_eq!(file, "sample.esp");
                assert_eq!(record, Tag::new(b"TEST"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn size_mismatch_detected() {
        let mut r = open();
        let err = r.get_hnt::<i64>(ALPH).unwrap_err();
        assert_eq!(
            err.format_kind(),
            Some(&FormatErrorKind::SubSizeMismatch {
                expected: 8,
                found: 4,
            })
        );
    }

    #[test]
    fn context_resume_repeats_reads() {
        let mut r = open();
        assert!(!r.is_next_sub(BETA).unwrap());
        let ctx = r.get_context();

        let first = (r.get_hnt::<i32>(ALPH).unwrap(), r.get_hn_string(BETA).unwrap());
        r.restore_context(&ctx);
        let second = (r.get_hnt::<i32>(ALPH).unwrap(), r.get_hn_string(BETA).unwrap());
        assert_eq!(first, second);

        let mut other = Reader::resume(&ctx);
        assert_eq!(other.get_hnt::<i32>(ALPH).unwrap(), 7);
    }

    #[test]
    fn unread_bytes_block_next_record() {
        let mut w = Writer::new(&Header::default());
        for _ in 0..2 {
            w.start_record(Tag::new(b"TEST"), 0);
            w.write_hnt(ALPH, &1i32);
            w.end_record();
        }
        let mut r = Reader::from_bytes("two.esp", w.finish()).unwrap();
        r.get_rec_name().unwrap();
        r.get_rec_header().unwrap();
        // Reading the next header without consuming the first body fails.
        let err = r.get_rec_header().unwrap_err();
        assert_eq!(err.format_kind(), Some(&FormatErrorKind::UnreadBytes(12)));
    }

    #[test]
    fn rejects_non_tes3() {
        let mut data = sample();
        data[..4].copy_from_slice(b"TES4");
        let err = Reader::from_bytes("bad.esm", data).unwrap_err();
        assert_eq!(err.format_kind(), Some(&FormatErrorKind::NotTes3(Tag::new(b"TES4"))));
    }

    #[test]
    fn zero_length_string_skips_stray_byte() {
        let mut w = Writer::new(&Header::default());
        w.start_record(Tag::new(b"TEST"), 0);
        // Declared size zero, followed by one stray NUL.
        w.write_name(ALPH);
        w.write_bytes(&[0, 0, 0, 0, 0]);
        w.write_hnt(BETA, &3i32);
        w.end_record();
        let mut r = Reader::from_bytes("multimark.esp", w.finish()).unwrap();
        r.get_rec_name().unwrap();
        r.get_rec_header().unwrap();
        assert_eq!(r.get_hn_string(ALPH).unwrap(), "");
        assert_eq!(r.get_hnt::<i32>(BETA).unwrap(), 3);
        assert!(!r.has_more_subs());
    }

    #[test]
    fn zero_length_string_without_stray_byte() {
        let mut w = Writer::new(&Header::default());
        w.start_record(Tag::new(b"TEST"), 0);
        w.write_hn_string(ALPH, "");
        w.write_hnt(BETA, &3i32);
        w.end_record();
        let mut r = Reader::from_bytes("clean.esp", w.finish()).unwrap();
        r.get_rec_name().unwrap();
        r.get_rec_header().unwrap();
        assert_eq!(r.get_hn_string(ALPH).unwrap(), "");
        assert_eq!(r.get_hnt::<i32>(BETA).unwrap(), 3);
    }

    #[test]
    fn next_record_name_requires_consumed_body() {
        let mut w = Writer::new(&Header::default());
        for _ in 0..2 {
            w.start_record(Tag::new(b"TEST"), 0);
            w.write_hnt(ALPH, &1i32);
            w.end_record();
        }
        let mut r = Reader::from_bytes("two.esp", w.finish()).unwrap();
        r.get_rec_name().unwrap();
        r.get_rec_header().unwrap();
        let body = r.offset();

        let err = r.get_rec_name().unwrap_err();
        assert_eq!(err.format_kind(), Some(&FormatErrorKind::UnreadBytes(12)));
        match err {
            Error::Format { offset, .. } => assert_eq!(offset, body),
            other => panic!("unexpected {other:?}"),
        }
        // Nothing was consumed by the failed call.
        assert_eq!(r.offset(), body);
        assert_eq!(r.rec_name(), Tag::new(b"TEST"));
    }

    #[test]
    fn context_restores_onto_another_source() {
        let mut w = Writer::new(&Header::default());
        w.start_record(Tag::new(b"TEST"), 0x400);
        w.write_hnt(ALPH, &1i32);
        w.write_hnt(ALPH, &2i32);
        w.end_record();
        let mut first = Reader::from_bytes("Tribunal.esm", w.finish()).unwrap();
        first.get_rec_name().unwrap();
        first.get_rec_header().unwrap();
        first.get_hnt::<i32>(ALPH).unwrap();
        let ctx = first.get_context();

        let mut other = open();
        assert_eq!(other.rec_flags(), 0);
        other.restore_context(&ctx);
        assert_eq!(other.name(), "Tribunal.esm");
        assert_eq!(other.special(), SpecialFile::Tribunal);
        assert!(other.source().is_same(&ctx.source));
        assert_eq!(other.rec_flags(), 0x400);
        assert_eq!(other.get_hnt::<i32>(ALPH).unwrap(), 2);
        assert!(!other.has_more_subs());
        assert!(!other.has_more_recs());
    }
}
