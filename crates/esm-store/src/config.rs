use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use esm::Tag;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Which content files to load, and in what order.
///
/// Read from a JSON manifest:
///
/// ```json
/// { "data_dir": "Data Files", "content": ["Morrowind.esm", "Tribunal.esm"] }
/// ```
///
/// Later files override earlier ones for duplicate ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadOrder {
    /// Directory the content file names are relative to.
    #[serde(default)]
    pub data_dir: PathBuf,
    pub content: Vec<String>,
}

impl LoadOrder {
    pub fn new<S: Into<String>>(data_dir: impl Into<PathBuf>, content: impl IntoIterator<Item = S>) -> Self {
        Self {
            data_dir: data_dir.into(),
            content: content.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a manifest file. A relative `data_dir` is resolved against the
    /// manifest's own directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let mut order: LoadOrder =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::LoadOrder {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if order.content.is_empty() {
            return Err(StoreError::LoadOrder {
                path: path.to_path_buf(),
                message: "no content files listed".to_string(),
            });
        }

        if order.data_dir.is_relative() {
            let canonical = path.canonicalize().map_err(io_err)?;
            if let Some(base) = canonical.parent() {
                order.data_dir = base.join(&order.data_dir);
            }
        }
        Ok(order)
    }

    /// Full paths of the content files, in load order.
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.content.iter().map(|name| self.data_dir.join(name))
    }
}

/// Options for [`Store::load_all`](crate::Store::load_all).
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Decode terrain data for every LAND once all files are loaded, instead
    /// of on first use.
    pub load_land_data: bool,
    /// Top-level record tags to skip wholesale.
    pub skip_list: Vec<Tag>,
}

impl StoreConfig {
    /// Create a config that skips the given record tags. Names that are not
    /// four bytes long are ignored.
    pub fn from_skip_list(skip: &[&str]) -> Self {
        let skip_list = skip
            .iter()
            .filter_map(|name| <&[u8; 4]>::try_from(name.as_bytes()).ok())
            .map(Tag::new)
            .collect();
        Self {
            skip_list,
            ..Self::default()
        }
    }

    pub fn skips(&self, tag: Tag) -> bool {
        self.skip_list.contains(&tag)
    }
}
