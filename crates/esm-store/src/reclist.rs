//! Keyed record containers, one instantiated per record kind.
//!
//! Every container implements [`RecordList`], which is what the store's tag
//! dispatch table hands a record body to. `load` always inserts or
//! overwrites: when two content files define the same id, the one loaded
//! last wins.

use std::collections::BTreeMap;
use std::fmt;

use esm::records::{Cell, Dialogue, LandTexture, MagicEffect, Pathgrid, Script, Skill, StartScript};
use esm::records::{Land, mgef, skil};
use esm::{FixedString, FormatErrorKind, Reader, Record};
use serde::Serialize;
use serde_json::Value;

use crate::arena::{Arena, ArenaKey, SparseMap};
use crate::define_key;
use crate::error::{Result, StoreError};
use crate::key::{CiKey, normalize};

/// A container the store can dispatch a record body to.
pub trait RecordList {
    /// Decode one record body and store it under `id`, the record's NAME
    /// (empty when the record has none). Returns the key the record was
    /// stored under.
    fn load(&mut self, r: &mut Reader, id: &str) -> esm::Result<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, for inspection.
    fn to_json(&self) -> serde_json::Result<Value>;
}

fn not_found<T: Record>(id: impl Into<String>) -> StoreError {
    StoreError::NotFound {
        kind: T::TAG,
        id: id.into(),
    }
}

/// Records keyed by their lowercased id.
#[derive(Debug, Clone)]
pub struct RecList<T> {
    list: BTreeMap<String, T>,
}

impl<T> Default for RecList<T> {
    fn default() -> Self {
        Self {
            list: BTreeMap::new(),
        }
    }
}

impl<T: Record> RecList<T> {
    /// Insert or overwrite, returning the record previously stored for `id`.
    pub fn insert(&mut self, id: &str, record: T) -> Option<T> {
        self.list.insert(normalize(id), record)
    }

    pub fn search(&self, id: &str) -> Option<&T> {
        self.list.get(normalize(id).as_str())
    }

    pub fn find(&self, id: &str) -> Result<&T> {
        self.search(id).ok_or_else(|| not_found::<T>(id))
    }

    /// Records with their lowercased ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.list.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Take every record of `other`, overwriting ours.
    pub fn absorb(&mut self, other: Self) {
        self.list.extend(other.list);
    }
}

impl<T: Record + Serialize> RecordList for RecList<T> {
    fn load(&mut self, r: &mut Reader, id: &str) -> esm::Result<String> {
        let record = T::load(r)?;
        let key = normalize(id);
        self.list.insert(key.clone(), record);
        Ok(key)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.list)
    }
}

/// Records looked up case-insensitively but keyed by the id as written, for
/// ids that are shown to the player.
#[derive(Debug, Clone)]
pub struct RecListCaseSensitive<T> {
    list: BTreeMap<CiKey, T>,
}

impl<T> Default for RecListCaseSensitive<T> {
    fn default() -> Self {
        Self {
            list: BTreeMap::new(),
        }
    }
}

impl<T: Record> RecListCaseSensitive<T> {
    /// Insert or overwrite. The stored spelling is always the latest one.
    pub fn insert(&mut self, id: &str, record: T) -> Option<T> {
        let key = CiKey::new(id);
        let previous = self.list.remove(key.normalized());
        self.list.insert(key, record);
        previous
    }

    pub fn search(&self, id: &str) -> Option<&T> {
        self.list.get(normalize(id).as_str())
    }

    pub fn find(&self, id: &str) -> Result<&T> {
        self.search(id).ok_or_else(|| not_found::<T>(id))
    }

    /// Records with their original-case ids.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.list.iter().map(|(k, v)| (k.original(), v))
    }

    /// Take every record of `other`, along with its spelling of the id.
    pub fn absorb(&mut self, other: Self) {
        for (key, record) in other.list {
            self.list.remove(key.normalized());
            self.list.insert(key, record);
        }
    }
}

impl<T: Record + Serialize> RecordList for RecListCaseSensitive<T> {
    fn load(&mut self, r: &mut Reader, id: &str) -> esm::Result<String> {
        let record = T::load(r)?;
        self.insert(id, record);
        Ok(id.to_string())
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.list)
    }
}

/// A record that stores its own id.
pub trait SelfKeyed: Record {
    fn id(&self) -> &str;

    /// Adopt the NAME id read ahead of the record body.
    fn set_id(&mut self, id: &str);

    /// Take over whatever should survive from the record this one replaces.
    fn inherit(&mut self, _previous: Self) {}
}

impl SelfKeyed for Dialogue {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    /// Responses are added per file, so a topic redefined by a later file
    /// keeps the responses collected so far.
    fn inherit(&mut self, previous: Self) {
        let added = std::mem::replace(&mut self.infos, previous.infos);
        for info in added {
            self.add_info(info);
        }
    }
}

impl SelfKeyed for Script {
    fn id(&self) -> &str {
        Script::id(self)
    }

    fn set_id(&mut self, id: &str) {
        self.header.name = FixedString::from(id);
    }
}

impl SelfKeyed for StartScript {
    fn id(&self) -> &str {
        StartScript::id(self)
    }

    fn set_id(&mut self, id: &str) {
        self.data = id.to_string();
    }
}

/// Records keyed by the id they carry themselves.
#[derive(Debug, Clone)]
pub struct RecIdList<T> {
    list: BTreeMap<String, T>,
}

impl<T> Default for RecIdList<T> {
    fn default() -> Self {
        Self {
            list: BTreeMap::new(),
        }
    }
}

impl<T: SelfKeyed> RecIdList<T> {
    /// Insert or overwrite under the record's own id.
    pub fn insert(&mut self, mut record: T) -> String {
        let key = normalize(record.id());
        if let Some(previous) = self.list.remove(&key) {
            record.inherit(previous);
        }
        self.list.insert(key.clone(), record);
        key
    }

    pub fn search(&self, id: &str) -> Option<&T> {
        self.list.get(normalize(id).as_str())
    }

    pub fn search_mut(&mut self, id: &str) -> Option<&mut T> {
        self.list.get_mut(normalize(id).as_str())
    }

    pub fn find(&self, id: &str) -> Result<&T> {
        self.search(id).ok_or_else(|| not_found::<T>(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.list.values()
    }

    /// Take every record of `other`, each inheriting from the one it replaces.
    pub fn absorb(&mut self, other: Self) {
        for record in other.list.into_values() {
            self.insert(record);
        }
    }
}

impl<T: SelfKeyed + Serialize> RecordList for RecIdList<T> {
    fn load(&mut self, r: &mut Reader, id: &str) -> esm::Result<String> {
        let mut record = T::load(r)?;
        if !id.is_empty() {
            record.set_id(id);
        }
        Ok(self.insert(record))
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.list)
    }
}

/// A record identified by a small integer index.
pub trait Indexed: Record {
    /// Number of indices the game defines.
    const LENGTH: i32;

    fn index(&self) -> i32;
}

impl Indexed for Skill {
    const LENGTH: i32 = skil::LENGTH;

    fn index(&self) -> i32 {
        self.index
    }
}

impl Indexed for MagicEffect {
    const LENGTH: i32 = mgef::LENGTH;

    fn index(&self) -> i32 {
        self.index
    }
}

/// Records keyed by their own index.
#[derive(Debug, Clone)]
pub struct IndexedList<T> {
    list: BTreeMap<i32, T>,
}

impl<T> Default for IndexedList<T> {
    fn default() -> Self {
        Self {
            list: BTreeMap::new(),
        }
    }
}

impl<T: Indexed> IndexedList<T> {
    pub fn insert(&mut self, record: T) -> Option<T> {
        let index = record.index();
        if !(0..T::LENGTH).contains(&index) {
            log::warn!("{} index {index} outside 0..{}", T::TAG, T::LENGTH);
        }
        self.list.insert(index, record)
    }

    pub fn search(&self, index: i32) -> Option<&T> {
        self.list.get(&index)
    }

    pub fn find(&self, index: i32) -> Result<&T> {
        self.search(index)
            .ok_or_else(|| not_found::<T>(index.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.list.values()
    }

    /// Take every record of `other`. Its indices were checked on insert.
    pub fn absorb(&mut self, other: Self) {
        self.list.extend(other.list);
    }
}

impl<T: Indexed + Serialize> RecordList for IndexedList<T> {
    fn load(&mut self, r: &mut Reader, _id: &str) -> esm::Result<String> {
        let record = T::load(r)?;
        let index = record.index();
        self.insert(record);
        Ok(index.to_string())
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.list)
    }
}

define_key!(
    /// Index of a land texture as referenced from LAND VTEX data.
    LandTextureIndex
);

/// Land textures, stored densely by index.
#[derive(Debug, Clone, Default)]
pub struct LTexList {
    list: SparseMap<LandTextureIndex, LandTexture>,
}

impl LTexList {
    pub fn insert(&mut self, index: u32, texture: LandTexture) -> Option<LandTexture> {
        self.list.insert(LandTextureIndex::new(index), texture)
    }

    pub fn search(&self, index: u32) -> Option<&LandTexture> {
        self.list.get(LandTextureIndex::new(index))
    }

    pub fn find(&self, index: u32) -> Result<&LandTexture> {
        self.search(index)
            .ok_or_else(|| not_found::<LandTexture>(index.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &LandTexture)> {
        self.list.iter().map(|(k, v)| (k.index(), v))
    }

    pub fn absorb(&mut self, other: Self) {
        for (index, texture) in other.list.into_entries() {
            self.list.insert(index, texture);
        }
    }
}

impl RecordList for LTexList {
    fn load(&mut self, r: &mut Reader, _id: &str) -> esm::Result<String> {
        let texture = LandTexture::load(r)?;
        let index = u32::try_from(texture.index).map_err(|_| {
            r.fail(FormatErrorKind::Invalid(format!(
                "negative land texture index {}",
                texture.index
            )))
        })?;
        self.insert(index, texture);
        Ok(index.to_string())
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        let by_index: BTreeMap<u32, &LandTexture> = self.iter().collect();
        serde_json::to_value(by_index)
    }
}

/// How a cell, or something attached to one, is found: by name for
/// interiors, by grid position for exteriors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Interior(String),
    Exterior(i32, i32),
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKey::Interior(name) => write!(f, "{name:?}"),
            CellKey::Exterior(x, y) => write!(f, "({x}, {y})"),
        }
    }
}

/// A record stored under a [`CellKey`].
pub trait CellKeyed: Record {
    /// Adopt the NAME id read ahead of the record body.
    fn set_id(&mut self, _id: &str) {}

    fn cell_key(&self) -> CellKey;
}

impl CellKeyed for Cell {
    fn set_id(&mut self, id: &str) {
        self.name = id.to_string();
    }

    fn cell_key(&self) -> CellKey {
        if self.is_interior() {
            CellKey::Interior(self.name.clone())
        } else {
            let (x, y) = self.grid();
            CellKey::Exterior(x, y)
        }
    }
}

impl CellKeyed for Pathgrid {
    fn cell_key(&self) -> CellKey {
        if self.is_interior() {
            CellKey::Interior(self.cell.clone())
        } else {
            let (x, y) = self.grid();
            CellKey::Exterior(x, y)
        }
    }
}

define_key!(
    /// Slot of a cell in the store.
    CellId
);
define_key!(
    /// Slot of a path grid in the store.
    PathgridId
);

/// Records owned by an arena and indexed both by interior name and by
/// exterior grid position.
#[derive(Debug, Clone)]
pub struct CellKeyedList<K: ArenaKey, T> {
    arena: Arena<K, T>,
    interiors: BTreeMap<CiKey, K>,
    exteriors: BTreeMap<(i32, i32), K>,
}

pub type CellList = CellKeyedList<CellId, Cell>;
pub type PathgridList = CellKeyedList<PathgridId, Pathgrid>;

impl<K: ArenaKey, T> Default for CellKeyedList<K, T> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            interiors: BTreeMap::new(),
            exteriors: BTreeMap::new(),
        }
    }
}

impl<K: ArenaKey, T: CellKeyed> CellKeyedList<K, T> {
    /// Insert or overwrite. An overwritten record keeps its slot.
    pub fn insert(&mut self, record: T) -> K {
        match record.cell_key() {
            CellKey::Interior(name) => {
                let key = CiKey::new(&name);
                let slot = self.interiors.remove(key.normalized());
                let slot = self.arena.put(slot, record);
                self.interiors.insert(key, slot);
                slot
            }
            CellKey::Exterior(x, y) => {
                let slot = self.exteriors.get(&(x, y)).copied();
                let slot = self.arena.put(slot, record);
                self.exteriors.insert((x, y), slot);
                slot
            }
        }
    }

    pub fn get(&self, slot: K) -> Option<&T> {
        self.arena.get(slot)
    }

    pub fn search_int(&self, name: &str) -> Option<&T> {
        let slot = self.interiors.get(normalize(name).as_str())?;
        self.arena.get(*slot)
    }

    pub fn search_ext(&self, x: i32, y: i32) -> Option<&T> {
        let slot = self.exteriors.get(&(x, y))?;
        self.arena.get(*slot)
    }

    pub fn search(&self, key: &CellKey) -> Option<&T> {
        match key {
            CellKey::Interior(name) => self.search_int(name),
            CellKey::Exterior(x, y) => self.search_ext(*x, *y),
        }
    }

    pub fn find(&self, key: &CellKey) -> Result<&T> {
        self.search(key)
            .ok_or_else(|| StoreError::CellNotFound(key.clone()))
    }

    pub fn find_int(&self, name: &str) -> Result<&T> {
        self.find(&CellKey::Interior(name.to_string()))
    }

    pub fn find_ext(&self, x: i32, y: i32) -> Result<&T> {
        self.find(&CellKey::Exterior(x, y))
    }

    /// Interiors by name, in name order.
    pub fn interiors(&self) -> impl Iterator<Item = (&str, &T)> {
        self.interiors
            .iter()
            .map(|(name, slot)| (name.original(), &self.arena[*slot]))
    }

    /// Exteriors by grid position, in (x, y) order.
    pub fn exteriors(&self) -> impl Iterator<Item = ((i32, i32), &T)> {
        self.exteriors
            .iter()
            .map(|(grid, slot)| (*grid, &self.arena[*slot]))
    }

    /// All records in the order they were first loaded.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.arena.values()
    }

    /// Take every record of `other` in its load order. Records replacing
    /// ours keep our slots.
    pub fn absorb(&mut self, other: Self) {
        for record in other.arena.into_values() {
            self.insert(record);
        }
    }
}

impl<K: ArenaKey, T: CellKeyed + Serialize> RecordList for CellKeyedList<K, T> {
    fn load(&mut self, r: &mut Reader, id: &str) -> esm::Result<String> {
        let mut record = T::load(r)?;
        record.set_id(id);
        let key = record.cell_key();
        self.insert(record);
        Ok(match key {
            CellKey::Interior(name) => name,
            CellKey::Exterior(x, y) => format!("{x},{y}"),
        })
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.arena.values().collect::<Vec<_>>())
    }
}

/// Terrain tiles keyed by exterior grid position.
#[derive(Debug, Clone, Default)]
pub struct LandList {
    list: BTreeMap<(i32, i32), Land>,
}

impl LandList {
    pub fn insert(&mut self, land: Land) -> Option<Land> {
        self.list.insert(land.grid(), land)
    }

    pub fn search(&self, x: i32, y: i32) -> Option<&Land> {
        self.list.get(&(x, y))
    }

    pub fn search_mut(&mut self, x: i32, y: i32) -> Option<&mut Land> {
        self.list.get_mut(&(x, y))
    }

    pub fn find(&self, x: i32, y: i32) -> Result<&Land> {
        self.search(x, y)
            .ok_or(StoreError::CellNotFound(CellKey::Exterior(x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Land> {
        self.list.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Land> {
        self.list.values_mut()
    }

    pub fn absorb(&mut self, other: Self) {
        self.list.extend(other.list);
    }
}

impl RecordList for LandList {
    fn load(&mut self, r: &mut Reader, _id: &str) -> esm::Result<String> {
        let land = Land::load(r)?;
        let (x, y) = land.grid();
        self.insert(land);
        Ok(format!("{x},{y}"))
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.list.values().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esm::records::cell::CellData;
    use esm::Tag;
    use esm::records::{Activator, Class, Static};

    fn activator(name: &str) -> Activator {
        Activator {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn rec_list_is_case_insensitive() {
        let mut list = RecList::default();
        list.insert("Furn_Bench", activator("Bench"));
        assert_eq!(list.search("furn_bench").map(|a| a.name.as_str()), Some("Bench"));
        assert_eq!(list.search("FURN_BENCH").map(|a| a.name.as_str()), Some("Bench"));
        assert_eq!(list.iter().next().map(|(k, _)| k), Some("furn_bench"));
    }

    #[test]
    fn find_reports_kind_and_id() {
        let list: RecList<Static> = RecList::default();
        assert!(list.search("ex_hlaalu_b_01").is_none());
        match list.find("ex_hlaalu_b_01") {
            Err(StoreError::NotFound { kind, id }) => {
                assert_eq!(kind, Tag::new(b"STAT"));
                assert_eq!(id, "ex_hlaalu_b_01");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn later_insert_wins() {
        let mut list = RecList::default();
        list.insert("chest", activator("Old"));
        let previous = list.insert("CHEST", activator("New"));
        assert_eq!(previous.map(|a| a.name), Some("Old".to_string()));
        assert_eq!(list.len(), 1);
        assert_eq!(list.find("chest").map(|a| a.name.as_str()).ok(), Some("New"));
    }

    #[test]
    fn case_sensitive_list_keeps_latest_spelling() {
        let mut list = RecListCaseSensitive::default();
        list.insert("acrobat", Class::default());
        list.insert("Acrobat", Class::default());
        assert_eq!(list.len(), 1);
        assert!(list.search("ACROBAT").is_some());
        let ids: Vec<&str> = list.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["Acrobat"]);
    }

    #[test]
    fn redefined_dialogue_keeps_responses() {
        let mut list = RecIdList::default();
        let mut first = Dialogue {
            id: "Greeting".to_string(),
            ..Default::default()
        };
        first.infos.push(esm::records::DialInfo {
            id: "1".to_string(),
            ..Default::default()
        });
        list.insert(first);

        let second = Dialogue {
            id: "greeting".to_string(),
            ..Default::default()
        };
        list.insert(second);

        let topic = list.search("GREETING").map(|d| (d.id.clone(), d.infos.len()));
        assert_eq!(topic, Some(("greeting".to_string(), 1)));
    }

    #[test]
    fn indexed_list_finds_by_index() {
        let mut list = IndexedList::default();
        list.insert(Skill {
            index: 8,
            ..Default::default()
        });
        assert_eq!(list.search(8).map(|s| s.name()), Some(Some("Athletics")));
        assert!(matches!(list.find(9), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn cells_are_keyed_by_name_or_grid() {
        let mut cells = CellList::default();
        cells.insert(Cell {
            name: "Arrille's Tradehouse".to_string(),
            data: CellData {
                flags: Cell::INTERIOR,
                ..Default::default()
            },
            ..Default::default()
        });
        cells.insert(Cell {
            data: CellData {
                flags: 0,
                grid_x: -2,
                grid_y: -9,
            },
            ..Default::default()
        });

        assert!(cells.search_int("arrille's tradehouse").is_some());
        assert!(cells.search_ext(-2, -9).is_some());
        assert!(cells.search_ext(0, 0).is_none());
        assert!(matches!(
            cells.find_ext(5, 5),
            Err(StoreError::CellNotFound(CellKey::Exterior(5, 5)))
        ));
    }

    #[test]
    fn overwritten_cell_keeps_its_slot() {
        let mut cells = CellList::default();
        let exterior = |region: &str| Cell {
            data: CellData {
                flags: 0,
                grid_x: 1,
                grid_y: 2,
            },
            region: region.to_string(),
            ..Default::default()
        };
        let a = cells.insert(exterior("Bitter Coast Region"));
        let b = cells.insert(exterior("Ascadian Isles Region"));
        assert_eq!(a, b);
        assert_eq!(RecordList::len(&cells), 1);
        assert_eq!(
            cells.get(a).map(|c| c.region.as_str()),
            Some("Ascadian Isles Region")
        );
    }

    #[test]
    fn absorbed_records_override_in_load_order() {
        let exterior = |x: i32, region: &str| Cell {
            data: CellData {
                flags: 0,
                grid_x: x,
                grid_y: 0,
            },
            region: region.to_string(),
            ..Default::default()
        };
        let mut cells = CellList::default();
        let kept = cells.insert(exterior(0, "Bitter Coast Region"));

        let mut later = CellList::default();
        later.insert(exterior(5, "West Gash Region"));
        later.insert(exterior(0, "Ascadian Isles Region"));
        cells.absorb(later);

        assert_eq!(RecordList::len(&cells), 2);
        assert_eq!(
            cells.get(kept).map(|c| c.region.as_str()),
            Some("Ascadian Isles Region")
        );
        assert!(cells.search_ext(5, 0).is_some());

        let mut classes = RecListCaseSensitive::default();
        classes.insert("acrobat", Class::default());
        let mut renamed = RecListCaseSensitive::default();
        renamed.insert("Acrobat", Class::default());
        classes.absorb(renamed);
        assert_eq!(classes.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec!["Acrobat"]);
    }

    #[test]
    fn land_textures_grow_on_demand() {
        let mut list = LTexList::default();
        list.insert(
            12,
            LandTexture {
                index: 12,
                texture: "tx_sand_01.dds".to_string(),
            },
        );
        assert_eq!(RecordList::len(&list), 1);
        assert!(list.search(3).is_none());
        assert_eq!(
            list.find(12).map(|t| t.texture.as_str()).ok(),
            Some("tx_sand_01.dds")
        );
    }
}
