//! Keyed record storage over TES3 content files, and lazy resolution of the
//! objects placed in a cell.
//!
//! ```ignore
//! let order = LoadOrder::from_file(Path::new("load_order.json"))?;
//! let store = Store::load_all(&order, &StoreConfig::default())?;
//! let mut cell = CellStore::new(&store);
//! cell.load_int("Seyda Neen, Census and Excise Office")?;
//! cell.for_each(|obj| {
//!     println!("{:?} {}", obj.kind, obj.cell_ref.ref_id);
//!     true
//! })?;
//! ```

pub mod arena;
pub mod cell_store;
pub mod config;
pub mod error;
pub mod key;
pub mod reclist;
pub mod store;

pub use cell_store::{CellRefList, CellRefLists, CellStore, LiveCellRef, ObjectRef, RefData, RefKind};
pub use config::{LoadOrder, StoreConfig};
pub use error::{Result, StoreError};
pub use key::CiKey;
pub use reclist::{CellKey, RecordList};
pub use store::{Lists, Store};
