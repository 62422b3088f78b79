//! The record store: one keyed container per record kind.

use std::collections::{BTreeMap, HashMap};

use esm::records::*;
use esm::{Reader, Record, Tag};

use crate::config::{LoadOrder, StoreConfig};
use crate::error::Result;
use crate::key::normalize;
use crate::reclist::{
    CellList, IndexedList, LTexList, LandList, PathgridList, RecIdList, RecList, RecListCaseSensitive,
    RecordList,
};

macro_rules! lists {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// Every record container, one field per record kind.
        #[derive(Debug, Default)]
        pub struct Lists {
            $(pub $field: $ty,)*
        }

        impl Lists {
            /// Move in every record of `other`, as though its file had been
            /// loaded after ours.
            fn absorb(&mut self, other: Lists) {
                $(self.$field.absorb(other.$field);)*
            }
        }
    };
}

lists! {
    activators: RecList<Activator>,
    potions: RecList<Potion>,
    appas: RecList<Apparatus>,
    armors: RecList<Armor>,
    body_parts: RecList<BodyPart>,
    books: RecList<Book>,
    birth_signs: RecListCaseSensitive<BirthSign>,
    cells: CellList,
    classes: RecListCaseSensitive<Class>,
    clothes: RecList<Clothing>,
    containers: RecList<Container>,
    creatures: RecList<Creature>,
    dialogs: RecIdList<Dialogue>,
    doors: RecList<Door>,
    enchants: RecList<Enchantment>,
    factions: RecListCaseSensitive<Faction>,
    globals: RecListCaseSensitive<Global>,
    game_settings: RecListCaseSensitive<GameSetting>,
    ingreds: RecList<Ingredient>,
    lands: LandList,
    creature_lists: RecList<CreatureLevList>,
    item_lists: RecList<ItemLevList>,
    lights: RecList<Light>,
    lockpicks: RecList<Lockpick>,
    land_textures: LTexList,
    magic_effects: IndexedList<MagicEffect>,
    misc_items: RecList<Miscellaneous>,
    npcs: RecList<Npc>,
    pathgrids: PathgridList,
    probes: RecList<Probe>,
    races: RecListCaseSensitive<Race>,
    regions: RecListCaseSensitive<Region>,
    repairs: RecList<Repair>,
    scripts: RecIdList<Script>,
    skills: IndexedList<Skill>,
    sound_gens: RecList<SoundGenerator>,
    sounds: RecList<Sound>,
    spells: RecListCaseSensitive<Spell>,
    start_scripts: RecIdList<StartScript>,
    statics: RecList<Static>,
    weapons: RecList<Weapon>,
}

/// How the dispatch table reaches one container inside [`Lists`].
#[derive(Clone, Copy)]
struct Slot {
    get: fn(&Lists) -> &dyn RecordList,
    get_mut: fn(&mut Lists) -> &mut dyn RecordList,
}

macro_rules! register {
    ($dispatch:ident, $($ty:ty => $field:ident),* $(,)?) => {
        $(
            $dispatch.insert(
                <$ty as Record>::TAG,
                Slot {
                    get: |l| &l.$field,
                    get_mut: |l| &mut l.$field,
                },
            );
        )*
    };
}

fn dispatch_table() -> HashMap<Tag, Slot> {
    let mut dispatch = HashMap::new();
    register!(dispatch,
        Activator => activators,
        Potion => potions,
        Apparatus => appas,
        Armor => armors,
        BodyPart => body_parts,
        Book => books,
        BirthSign => birth_signs,
        Cell => cells,
        Class => classes,
        Clothing => clothes,
        Container => containers,
        Creature => creatures,
        Dialogue => dialogs,
        Door => doors,
        Enchantment => enchants,
        Faction => factions,
        Global => globals,
        GameSetting => game_settings,
        Ingredient => ingreds,
        Land => lands,
        CreatureLevList => creature_lists,
        ItemLevList => item_lists,
        Light => lights,
        Lockpick => lockpicks,
        LandTexture => land_textures,
        MagicEffect => magic_effects,
        Miscellaneous => misc_items,
        Npc => npcs,
        Pathgrid => pathgrids,
        Probe => probes,
        Race => races,
        Region => regions,
        Repair => repairs,
        Script => scripts,
        Skill => skills,
        SoundGenerator => sound_gens,
        Sound => sounds,
        Spell => spells,
        StartScript => start_scripts,
        Static => statics,
        Weapon => weapons,
    );
    dispatch
}

/// Records decoded from one file, held back until the whole file has loaded.
#[derive(Default)]
struct PendingFile {
    lists: Lists,
    ids: HashMap<String, Tag>,
    skipped: BTreeMap<Tag, usize>,
    /// Key of the topic that INFO records are currently attached to.
    last_dialogue: Option<String>,
    count: usize,
}

impl PendingFile {
    fn skip(&mut self, r: &mut Reader, tag: Tag) -> esm::Result<()> {
        *self.skipped.entry(tag).or_default() += 1;
        r.skip_record()
    }

    fn load_info(&mut self, r: &mut Reader) -> esm::Result<()> {
        let dialogue = self
            .last_dialogue
            .as_deref()
            .and_then(|key| self.lists.dialogs.search_mut(key));
        let Some(dialogue) = dialogue else {
            log::warn!("{}: INFO record without a preceding DIAL", r.name());
            *self.skipped.entry(DialInfo::TAG).or_default() += 1;
            return r.skip_record();
        };
        let info = DialInfo::load(r)?;
        dialogue.add_info(info);
        if r.has_more_subs() {
            r.skip_record()?;
        }
        Ok(())
    }
}

/// All records loaded from a set of content files.
///
/// Records are dispatched by tag to the matching container. Ids that came
/// with a NAME are also entered into a flat index, so the kind of a record
/// can be found from its id alone (as cell references need).
pub struct Store {
    lists: Lists,
    dispatch: HashMap<Tag, Slot>,
    /// Lowercased id to the tag of the record that defined it last.
    all: HashMap<String, Tag>,
    skipped: BTreeMap<Tag, usize>,
    config: StoreConfig,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            lists: Lists::default(),
            dispatch: dispatch_table(),
            all: HashMap::new(),
            skipped: BTreeMap::new(),
            config,
        }
    }

    /// Load each file of `order` in turn.
    pub fn load_all(order: &LoadOrder, config: &StoreConfig) -> Result<Self> {
        let mut store = Self::with_config(config.clone());
        let mut loaded: Vec<String> = Vec::new();

        for path in order.paths() {
            log::info!("loading {}", path.display());
            let mut r = Reader::open(&path)?;
            for master in &r.header().masters {
                if !loaded.iter().any(|name| name.eq_ignore_ascii_case(&master.name)) {
                    log::warn!("{}: master {} is not loaded before it", r.name(), master.name);
                }
            }
            store.load(&mut r)?;
            loaded.push(r.name().to_string());
        }

        if config.load_land_data {
            store.load_land_data()?;
        }
        Ok(store)
    }

    /// Load every remaining record from `r`.
    ///
    /// Nothing from the file reaches the store until all of it has been
    /// read. On a structural error the store is left as it was.
    pub fn load(&mut self, r: &mut Reader) -> esm::Result<()> {
        // A topic's responses never continue into the next file.
        let mut file = PendingFile::default();
        self.read_file(r, &mut file)?;

        log::debug!(
            "{}: loaded {} records, {} skipped",
            r.name(),
            file.count,
            file.skipped.values().sum::<usize>()
        );
        self.lists.absorb(file.lists);
        self.all.extend(file.ids);
        for (tag, skipped) in file.skipped {
            *self.skipped.entry(tag).or_default() += skipped;
        }
        Ok(())
    }

    fn read_file(&self, r: &mut Reader, file: &mut PendingFile) -> esm::Result<()> {
        while r.has_more_recs() {
            let tag = r.get_rec_name()?;
            r.get_rec_header()?;

            if self.config.skips(tag) {
                file.skip(r, tag)?;
                continue;
            }
            if tag == DialInfo::TAG {
                file.load_info(r)?;
                file.count += 1;
                continue;
            }
            let Some(slot) = self.dispatch.get(&tag) else {
                log::warn!("{}: skipping unknown record {tag}", r.name());
                file.skip(r, tag)?;
                continue;
            };

            let id = if r.is_next_sub(Tag::NAME)? {
                Some(r.get_h_string()?)
            } else {
                None
            };
            let key = (slot.get_mut)(&mut file.lists).load(r, id.as_deref().unwrap_or(""))?;
            if r.has_more_subs() {
                log::debug!("{}: skipping trailing subrecords of {tag} {key:?}", r.name());
                r.skip_record()?;
            }

            if tag == Dialogue::TAG {
                file.last_dialogue = Some(key);
            }
            if let Some(id) = id {
                file.ids.insert(normalize(&id), tag);
            }
            file.count += 1;
        }
        Ok(())
    }

    /// Decode the terrain of every loaded LAND record.
    pub fn load_land_data(&mut self) -> esm::Result<()> {
        for land in self.lists.lands.iter_mut() {
            land.load_data(Land::DATA_ALL)?;
        }
        Ok(())
    }

    pub fn lists(&self) -> &Lists {
        &self.lists
    }

    pub fn lists_mut(&mut self) -> &mut Lists {
        &mut self.lists
    }

    pub fn cells(&self) -> &CellList {
        &self.lists.cells
    }

    /// The tag of the record that last defined `id`.
    pub fn find_kind(&self, id: &str) -> Option<Tag> {
        self.all.get(&normalize(id)).copied()
    }

    /// The container for record kind `tag`.
    pub fn list(&self, tag: Tag) -> Option<&dyn RecordList> {
        self.dispatch.get(&tag).map(|slot| (slot.get)(&self.lists))
    }

    /// Record counts per kind, for kinds with at least one record.
    pub fn counts(&self) -> BTreeMap<Tag, usize> {
        self.dispatch
            .iter()
            .map(|(tag, slot)| (*tag, (slot.get)(&self.lists).len()))
            .filter(|(_, len)| *len > 0)
            .collect()
    }

    /// Number of records skipped per tag: unknown kinds, kinds in the skip
    /// list and orphaned INFO records.
    pub fn skipped(&self) -> &BTreeMap<Tag, usize> {
        &self.skipped
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
