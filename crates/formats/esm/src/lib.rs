//! Reader/writer for the TES3 content file format (`.esm`, `.esp`, `.ess`).
//!
//! Two-layer architecture:
//! - **Layer 1** (`cursor`/`reader`/`writer`): framed record/subrecord I/O, the
//!   file header, and resumable parse contexts
//! - **Layer 2** (`records`): typed loaders for every record kind, built from the
//!   Layer 1 primitives and a few shared sub-loaders

pub mod cursor;
pub mod error;
pub mod field;
pub mod header;
pub mod reader;
pub mod records;
pub mod tag;
pub mod text;
pub mod writer;

pub use error::{Error, FormatErrorKind, Result};
pub use field::{FixedField, FixedString};
pub use header::{FileType, Header, MasterData};
pub use reader::{Context, Reader, Source};
pub use records::Record;
pub use tag::Tag;
pub use writer::Writer;
