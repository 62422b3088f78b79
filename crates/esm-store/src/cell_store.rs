//! Objects placed in one cell, resolved against the store.
//!
//! Selecting a cell only looks it up; its references are decoded when
//! [`CellStore::load_refs`] or [`CellStore::for_each`] first needs them,
//! by resuming a reader at the position the cell record saved.

use esm::Tag;
use esm::records::cell::Position;
use esm::records::*;

use crate::error::{Result, StoreError};
use crate::reclist::{CellKey, RecList};
use crate::store::{Lists, Store};

/// Category of a placed object, in visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RefKind {
    Activator,
    Potion,
    Apparatus,
    Armor,
    Book,
    Clothing,
    Container,
    Creature,
    Door,
    Ingredient,
    CreatureList,
    ItemList,
    Light,
    Lockpick,
    Miscellaneous,
    Npc,
    Probe,
    Repair,
    Static,
    Weapon,
}

impl RefKind {
    pub const ALL: [RefKind; 20] = [
        RefKind::Activator,
        RefKind::Potion,
        RefKind::Apparatus,
        RefKind::Armor,
        RefKind::Book,
        RefKind::Clothing,
        RefKind::Container,
        RefKind::Creature,
        RefKind::Door,
        RefKind::Ingredient,
        RefKind::CreatureList,
        RefKind::ItemList,
        RefKind::Light,
        RefKind::Lockpick,
        RefKind::Miscellaneous,
        RefKind::Npc,
        RefKind::Probe,
        RefKind::Repair,
        RefKind::Static,
        RefKind::Weapon,
    ];

    /// The category for records of kind `tag`, if such records can be placed.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        Some(match tag.as_bytes() {
            b"ACTI" => RefKind::Activator,
            b"ALCH" => RefKind::Potion,
            b"APPA" => RefKind::Apparatus,
            b"ARMO" => RefKind::Armor,
            b"BOOK" => RefKind::Book,
            b"CLOT" => RefKind::Clothing,
            b"CONT" => RefKind::Container,
            b"CREA" => RefKind::Creature,
            b"DOOR" => RefKind::Door,
            b"INGR" => RefKind::Ingredient,
            b"LEVC" => RefKind::CreatureList,
            b"LEVI" => RefKind::ItemList,
            b"LIGH" => RefKind::Light,
            b"LOCK" => RefKind::Lockpick,
            b"MISC" => RefKind::Miscellaneous,
            b"NPC_" => RefKind::Npc,
            b"PROB" => RefKind::Probe,
            b"REPA" => RefKind::Repair,
            b"STAT" => RefKind::Static,
            b"WEAP" => RefKind::Weapon,
            _ => return None,
        })
    }
}

/// Per-instance state that can change at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct RefData {
    pub enabled: bool,
    pub count: i32,
    pub position: Position,
    pub lock_level: i32,
}

impl RefData {
    fn new(cell_ref: &CellRef) -> Self {
        Self {
            enabled: true,
            count: 1,
            position: cell_ref.pos.clone(),
            lock_level: cell_ref.lock_level.unwrap_or(0),
        }
    }
}

/// A reference paired with the base record it places.
#[derive(Debug, Clone)]
pub struct LiveCellRef<'s, T> {
    pub base: &'s T,
    pub cell_ref: CellRef,
    pub data: RefData,
}

impl<'s, T> LiveCellRef<'s, T> {
    pub fn new(base: &'s T, cell_ref: CellRef) -> Self {
        let data = RefData::new(&cell_ref);
        Self {
            base,
            cell_ref,
            data,
        }
    }
}

/// The references of one category in a cell, in file order.
#[derive(Debug, Clone)]
pub struct CellRefList<'s, T> {
    pub list: Vec<LiveCellRef<'s, T>>,
}

impl<T> Default for CellRefList<'_, T> {
    fn default() -> Self {
        Self { list: Vec::new() }
    }
}

impl<'s, T> CellRefList<'s, T> {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiveCellRef<'s, T>> {
        self.list.iter()
    }

    /// First reference to base record `id`.
    pub fn find(&self, id: &str) -> Option<&LiveCellRef<'s, T>> {
        self.list
            .iter()
            .find(|live| live.cell_ref.ref_id.eq_ignore_ascii_case(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut LiveCellRef<'s, T>> {
        self.list
            .iter_mut()
            .find(|live| live.cell_ref.ref_id.eq_ignore_ascii_case(id))
    }
}

/// A placed object of any category, as seen by [`CellStore::for_each`].
#[derive(Clone, Copy)]
pub struct ObjectRef<'a> {
    pub kind: RefKind,
    pub base: &'a dyn BaseObject,
    pub cell_ref: &'a CellRef,
    pub data: &'a RefData,
}

fn place<'s, T: Record>(list: &mut CellRefList<'s, T>, source: &'s RecList<T>, cell_ref: CellRef) -> bool {
    match source.search(&cell_ref.ref_id) {
        Some(base) => {
            list.list.push(LiveCellRef::new(base, cell_ref));
            true
        }
        None => false,
    }
}

fn visit_list<'a, T: BaseObject + 'a>(
    list: &'a CellRefList<'_, T>,
    kind: RefKind,
    f: &mut dyn FnMut(ObjectRef<'_>) -> bool,
) -> bool {
    list.list.iter().all(|live| {
        f(ObjectRef {
            kind,
            base: live.base,
            cell_ref: &live.cell_ref,
            data: &live.data,
        })
    })
}

macro_rules! cell_ref_lists {
    ($($field:ident: $ty:ty => $kind:ident),* $(,)?) => {
        /// One reference list per [`RefKind`].
        #[derive(Debug, Clone)]
        pub struct CellRefLists<'s> {
            $(pub $field: CellRefList<'s, $ty>,)*
        }

        impl Default for CellRefLists<'_> {
            fn default() -> Self {
                Self {
                    $($field: CellRefList::default(),)*
                }
            }
        }

        impl<'s> CellRefLists<'s> {
            /// Total number of references.
            pub fn len(&self) -> usize {
                0 $(+ self.$field.len())*
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Number of references in one category.
            pub fn count(&self, kind: RefKind) -> usize {
                match kind {
                    $(RefKind::$kind => self.$field.len(),)*
                }
            }

            fn place(&mut self, kind: RefKind, lists: &'s Lists, cell_ref: CellRef) -> bool {
                match kind {
                    $(RefKind::$kind => place(&mut self.$field, &lists.$field, cell_ref),)*
                }
            }

            fn visit(&self, f: &mut dyn FnMut(ObjectRef<'_>) -> bool) -> bool {
                $(
                    if !visit_list(&self.$field, RefKind::$kind, f) {
                        return false;
                    }
                )*
                true
            }
        }
    };
}

cell_ref_lists! {
    activators: Activator => Activator,
    potions: Potion => Potion,
    appas: Apparatus => Apparatus,
    armors: Armor => Armor,
    books: Book => Book,
    clothes: Clothing => Clothing,
    containers: Container => Container,
    creatures: Creature => Creature,
    doors: Door => Door,
    ingreds: Ingredient => Ingredient,
    creature_lists: CreatureLevList => CreatureList,
    item_lists: ItemLevList => ItemList,
    lights: Light => Light,
    lockpicks: Lockpick => Lockpick,
    misc_items: Miscellaneous => Miscellaneous,
    npcs: Npc => Npc,
    probes: Probe => Probe,
    repairs: Repair => Repair,
    statics: Static => Static,
    weapons: Weapon => Weapon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The cell is selected but its references have not been read.
    Unloaded,
    Loaded,
}

/// The contents of one cell. Borrows the store, which must outlive it.
pub struct CellStore<'s> {
    store: &'s Store,
    cell: Option<&'s Cell>,
    state: LoadState,
    refs: CellRefLists<'s>,
    unresolved: usize,
}

impl<'s> CellStore<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self {
            store,
            cell: None,
            state: LoadState::Unloaded,
            refs: CellRefLists::default(),
            unresolved: 0,
        }
    }

    /// Select the interior cell `name`. References are not read yet.
    pub fn load_int(&mut self, name: &str) -> Result<()> {
        let cell = self.store.cells().find_int(name)?;
        self.select(cell);
        Ok(())
    }

    /// Select the exterior cell at grid `(x, y)`. References are not read yet.
    pub fn load_ext(&mut self, x: i32, y: i32) -> Result<()> {
        let cell = self.store.cells().find_ext(x, y)?;
        self.select(cell);
        Ok(())
    }

    /// Select the cell found by `key`.
    pub fn load(&mut self, key: &CellKey) -> Result<()> {
        let cell = self.store.cells().find(key)?;
        self.select(cell);
        Ok(())
    }

    fn select(&mut self, cell: &'s Cell) {
        self.cell = Some(cell);
        self.state = LoadState::Unloaded;
        self.refs = CellRefLists::default();
        self.unresolved = 0;
    }

    /// Read and resolve the selected cell's references, once.
    ///
    /// A reference to an id the store does not know, or to a record that
    /// cannot be placed, is logged and left out. A malformed reference
    /// fails the whole call and leaves the cell unloaded.
    pub fn load_refs(&mut self) -> Result<()> {
        let cell = self.cell.ok_or(StoreError::NoCell)?;
        if self.state == LoadState::Loaded {
            return Ok(());
        }
        if let Err(e) = self.read_refs(cell) {
            self.refs = CellRefLists::default();
            self.unresolved = 0;
            return Err(e);
        }
        self.state = LoadState::Loaded;
        log::debug!(
            "cell {}: {} references, {} unresolved",
            describe(cell),
            self.refs.len(),
            self.unresolved
        );
        Ok(())
    }

    fn read_refs(&mut self, cell: &'s Cell) -> Result<()> {
        let Some(mut r) = cell.ref_reader() else {
            return Ok(());
        };
        while let Some(cell_ref) = CellRef::load_next(&mut r)? {
            self.insert(cell, cell_ref);
        }
        Ok(())
    }

    fn insert(&mut self, cell: &Cell, cell_ref: CellRef) {
        if cell_ref.deleted {
            log::debug!("cell {}: skipping deleted reference {}", describe(cell), cell_ref.ref_id);
            return;
        }
        let store = self.store;
        let Some(tag) = store.find_kind(&cell_ref.ref_id) else {
            log::warn!(
                "cell {}: reference {} has no base record",
                describe(cell),
                cell_ref.ref_id
            );
            self.unresolved += 1;
            return;
        };
        let Some(kind) = RefKind::from_tag(tag) else {
            log::warn!(
                "cell {}: reference {} is a {tag}, which cannot be placed",
                describe(cell),
                cell_ref.ref_id
            );
            self.unresolved += 1;
            return;
        };
        let id = cell_ref.ref_id.clone();
        if !self.refs.place(kind, store.lists(), cell_ref) {
            log::warn!("cell {}: {tag} {id} is missing from the store", describe(cell));
            self.unresolved += 1;
        }
    }

    /// Call `f` for every placed object, category by category in
    /// [`RefKind::ALL`] order, reading references first if needed. Stops
    /// early when `f` returns `false`; the result says whether every
    /// object was visited.
    pub fn for_each<F>(&mut self, mut f: F) -> Result<bool>
    where
        F: FnMut(ObjectRef<'_>) -> bool,
    {
        self.load_refs()?;
        Ok(self.refs.visit(&mut f))
    }

    pub fn cell(&self) -> Option<&'s Cell> {
        self.cell
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn refs(&self) -> &CellRefLists<'s> {
        &self.refs
    }

    pub fn refs_mut(&mut self) -> &mut CellRefLists<'s> {
        &mut self.refs
    }

    /// References left out because their base record could not be found.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }
}

fn describe(cell: &Cell) -> String {
    if cell.is_interior() {
        format!("{:?}", cell.name)
    } else {
        let (x, y) = cell.grid();
        format!("({x}, {y})")
    }
}
