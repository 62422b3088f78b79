use esm::records::cell::{AmbientLight, CellData, Position};
use esm::records::dial::DialogueKind;
use esm::records::glob::VarType;
use esm::records::pgrd::PathgridData;
use esm::records::scpt::ScriptHeader;
use esm::records::*;
use esm::{Header, Reader, Record, Tag, Writer};
use esm_store::cell_store::LoadState;
use esm_store::{CellKey, CellStore, LoadOrder, RecordList, RefKind, Store, StoreConfig, StoreError};

/// Builds an in-memory content file record by record.
struct FileBuilder {
    w: Writer,
}

impl FileBuilder {
    fn new() -> Self {
        Self {
            w: Writer::new(&Header::default()),
        }
    }

    fn record<R: Record>(mut self, id: Option<&str>, record: &R) -> Self {
        self.w.write_record(id, record);
        self
    }

    fn cell(mut self, id: &str, cell: &Cell, refs: &[CellRef]) -> Self {
        self.w.start_record(Cell::TAG, 0);
        self.w.write_hn_c_string(Tag::NAME, id);
        cell.save(&mut self.w);
        for cref in refs {
            cref.save(&mut self.w);
        }
        self.w.end_record();
        self
    }

    /// A record with a hand-written body.
    fn raw(mut self, tag: &[u8; 4], body: impl FnOnce(&mut Writer)) -> Self {
        self.w.start_record(Tag::new(tag), 0);
        body(&mut self.w);
        self.w.end_record();
        self
    }

    fn bytes(self) -> Vec<u8> {
        self.w.finish()
    }

    fn reader(self, name: &str) -> Reader {
        Reader::from_bytes(name, self.bytes()).unwrap()
    }
}

fn activator(name: &str) -> Activator {
    Activator {
        model: "f\\furn.nif".into(),
        name: name.into(),
        script: String::new(),
    }
}

fn stat(model: &str) -> Static {
    Static {
        model: model.into(),
    }
}

fn door(name: &str) -> Door {
    Door {
        model: "d\\door.nif".into(),
        name: name.into(),
        ..Default::default()
    }
}

fn interior() -> Cell {
    Cell {
        data: CellData {
            flags: Cell::INTERIOR,
            ..Default::default()
        },
        ambient: Some(AmbientLight::default()),
        ..Default::default()
    }
}

fn exterior(x: i32, y: i32) -> Cell {
    Cell {
        data: CellData {
            flags: 0,
            grid_x: x,
            grid_y: y,
        },
        region: "Bitter Coast Region".into(),
        ..Default::default()
    }
}

fn cell_ref(num: u32, id: &str) -> CellRef {
    CellRef {
        ref_num: num,
        ref_id: id.into(),
        scale: 1.0,
        pos: Position {
            pos: [num as f32, 0.0, 0.0],
            rot: [0.0; 3],
        },
        ..Default::default()
    }
}

fn load(builder: FileBuilder) -> Store {
    let mut store = Store::new();
    store.load(&mut builder.reader("test.esp")).unwrap();
    store
}

#[test]
fn records_dispatch_by_tag() {
    let store = load(
        FileBuilder::new()
            .record(Some("Furn_Chair"), &activator("Chair"))
            .record(Some("ex_hlaalu_b_01"), &stat("x\\ex_hlaalu_b_01.nif"))
            .record(
                Some("GameHour"),
                &Global {
                    kind: VarType::Float,
                    value: 9.0,
                },
            )
            .record(Some("Acrobat"), &Class::default())
            .record(Some("iMaxLevel"), &GameSetting::Int(250)),
    );

    let lists = store.lists();
    assert_eq!(lists.activators.find("furn_chair").unwrap().name, "Chair");
    assert!(lists.statics.search("EX_HLAALU_B_01").is_some());
    assert_eq!(lists.globals.find("gamehour").unwrap().value, 9.0);
    assert_eq!(lists.game_settings.search("IMAXLEVEL").and_then(|g| g.as_int()), Some(250));

    // Case-preserving containers report the id as written.
    let classes: Vec<&str> = lists.classes.iter().map(|(id, _)| id).collect();
    assert_eq!(classes, vec!["Acrobat"]);

    let counts = store.counts();
    assert_eq!(counts.get(&Activator::TAG), Some(&1));
    assert_eq!(counts.get(&Static::TAG), Some(&1));
    assert_eq!(counts.get(&Weapon::TAG), None);
    assert_eq!(store.list(Activator::TAG).map(|l| l.len()), Some(1));
}

#[test]
fn global_index_knows_every_named_id() {
    let store = load(
        FileBuilder::new()
            .record(Some("Furn_Chair"), &activator("Chair"))
            .record(Some("door_a"), &door("Door")),
    );
    assert_eq!(store.find_kind("FURN_CHAIR"), Some(Activator::TAG));
    assert_eq!(store.find_kind("Door_A"), Some(Door::TAG));
    assert_eq!(store.find_kind("nothing"), None);
}

#[test]
fn later_files_override_earlier_ones() {
    let mut store = Store::new();
    let base = FileBuilder::new()
        .record(Some("chair"), &activator("Old Chair"))
        .record(Some("thing"), &stat("x\\thing.nif"));
    let plugin = FileBuilder::new()
        .record(Some("CHAIR"), &activator("New Chair"))
        .record(Some("thing"), &activator("Thing"));

    store.load(&mut base.reader("Morrowind.esm")).unwrap();
    store.load(&mut plugin.reader("plugin.esp")).unwrap();

    let lists = store.lists();
    assert_eq!(lists.activators.find("chair").unwrap().name, "New Chair");
    assert_eq!(lists.activators.iter().count(), 2);
    // The index follows the record that defined the id last.
    assert_eq!(store.find_kind("thing"), Some(Activator::TAG));
}

#[test]
fn unknown_records_are_skipped_and_counted() {
    let store = load(
        FileBuilder::new()
            .record(Some("before"), &activator("Before"))
            .raw(b"TES4", |w| {
                w.write_hn_c_string(Tag::NAME, "whatever");
                w.write_hn_bytes(Tag::new(b"XXXX"), &[1, 2, 3, 4, 5]);
            })
            .raw(b"TES4", |w| w.write_bytes(&[0; 3]))
            .record(Some("after"), &activator("After")),
    );

    assert!(store.lists().activators.search("before").is_some());
    assert!(store.lists().activators.search("after").is_some());
    assert_eq!(store.skipped().get(&Tag::new(b"TES4")), Some(&2));
    assert_eq!(store.find_kind("whatever"), None);
}

#[test]
fn skip_list_drops_whole_kinds() {
    let mut store = Store::with_config(StoreConfig::from_skip_list(&["STAT"]));
    let file = FileBuilder::new()
        .record(Some("rock"), &stat("x\\rock.nif"))
        .record(Some("chair"), &activator("Chair"));
    store.load(&mut file.reader("test.esp")).unwrap();

    assert!(store.lists().statics.search("rock").is_none());
    assert!(store.lists().activators.search("chair").is_some());
    assert_eq!(store.skipped().get(&Static::TAG), Some(&1));
}

#[test]
fn info_records_attach_to_the_preceding_topic() {
    let info = |id: &str, response: &str| DialInfo {
        id: id.into(),
        response: response.into(),
        ..Default::default()
    };
    let topic = Dialogue {
        kind: DialogueKind::Topic,
        ..Default::default()
    };

    let mut store = Store::new();
    let base = FileBuilder::new()
        .record(Some("Background"), &topic)
        .record(None, &info("1", "I was born here."))
        .record(None, &info("2", "Nothing to tell."))
        .record(Some("Little Secret"), &topic)
        .record(None, &info("3", "Hush."));
    store.load(&mut base.reader("Morrowind.esm")).unwrap();

    let dialogs = &store.lists().dialogs;
    let background = dialogs.find("background").unwrap();
    assert_eq!(background.id, "Background");
    let responses: Vec<&str> = background.infos.iter().map(|i| i.response.as_str()).collect();
    assert_eq!(responses, vec!["I was born here.", "Nothing to tell."]);
    assert_eq!(dialogs.find("little secret").unwrap().infos.len(), 1);

    // A plugin that starts with a response has nothing to attach it to.
    let plugin = FileBuilder::new()
        .record(None, &info("4", "Orphan."))
        .record(Some("background"), &topic)
        .record(None, &info("2", "Changed my mind."));
    store.load(&mut plugin.reader("plugin.esp")).unwrap();

    assert_eq!(store.skipped().get(&DialInfo::TAG), Some(&1));
    let background = store.lists().dialogs.find("Background").unwrap();
    let responses: Vec<&str> = background.infos.iter().map(|i| i.response.as_str()).collect();
    assert_eq!(responses, vec!["I was born here.", "Changed my mind."]);
}

#[test]
fn self_keyed_records_use_their_own_ids() {
    let store = load(
        FileBuilder::new()
            .record(
                None,
                &Script {
                    header: ScriptHeader {
                        name: "LeverScript".into(),
                        ..Default::default()
                    },
                    text: "begin LeverScript\nend".into(),
                    ..Default::default()
                },
            )
            .record(
                None,
                &StartScript {
                    data: "1480693964641513648".into(),
                    script: "Main".into(),
                },
            ),
    );

    let lists = store.lists();
    assert_eq!(lists.scripts.find("leverscript").unwrap().id(), "LeverScript");
    assert_eq!(lists.start_scripts.find("1480693964641513648").unwrap().script, "Main");
    // Neither record carries a NAME, so neither is in the global index.
    assert_eq!(store.find_kind("leverscript"), None);
}

#[test]
fn indexed_records_are_found_by_index() {
    let store = load(
        FileBuilder::new()
            .record(
                None,
                &Skill {
                    index: 8,
                    description: "Run and jump.".into(),
                    ..Default::default()
                },
            )
            .record(
                None,
                &LandTexture {
                    index: 5,
                    texture: "tx_ash_01.dds".into(),
                },
            ),
    );

    let lists = store.lists();
    assert_eq!(lists.skills.find(8).unwrap().name(), Some("Athletics"));
    assert!(matches!(lists.skills.find(9), Err(StoreError::NotFound { .. })));
    assert_eq!(lists.land_textures.find(5).unwrap().texture, "tx_ash_01.dds");
    assert!(lists.land_textures.search(4).is_none());
}

#[test]
fn cells_and_path_grids_are_keyed_by_name_or_grid() {
    let grid = |x: i32, y: i32, cell: &str| Pathgrid {
        data: PathgridData {
            x,
            y,
            ..Default::default()
        },
        cell: cell.into(),
        ..Default::default()
    };
    let store = load(
        FileBuilder::new()
            .cell("Seyda Neen, Arrille's Tradehouse", &interior(), &[])
            .cell("", &exterior(-2, -9), &[])
            .record(None, &grid(0, 0, "Seyda Neen, Arrille's Tradehouse"))
            .record(None, &grid(-2, -9, "Seyda Neen")),
    );

    let cells = store.cells();
    let tradehouse = cells.search_int("seyda neen, arrille's tradehouse").unwrap();
    assert_eq!(tradehouse.name, "Seyda Neen, Arrille's Tradehouse");
    assert_eq!(cells.search_ext(-2, -9).unwrap().region, "Bitter Coast Region");
    assert!(cells.search_ext(0, 0).is_none());
    assert_eq!(store.find_kind("seyda neen, arrille's tradehouse"), Some(Cell::TAG));

    let grids = &store.lists().pathgrids;
    assert!(grids.search_int("Seyda Neen, Arrille's Tradehouse").is_some());
    assert_eq!(grids.search_ext(-2, -9).unwrap().cell, "Seyda Neen");
}

#[test]
fn land_data_loads_on_request() {
    let mut land = Land {
        x: 1,
        y: 2,
        data_types: Land::DATA_VCLR,
        ..Default::default()
    };
    land.land_data = Some(land::LandData {
        colours: vec![7; land::LAND_NUM_VERTS * 3],
        loaded: Land::DATA_VCLR,
        ..Default::default()
    });

    let mut store = load(FileBuilder::new().record(None, &land));
    let loaded = store.lists().lands.find(1, 2).unwrap();
    assert!(!loaded.is_data_loaded(Land::DATA_VCLR));

    store.load_land_data().unwrap();
    let loaded = store.lists().lands.find(1, 2).unwrap();
    assert!(loaded.is_data_loaded(Land::DATA_VCLR));
    assert_eq!(loaded.land_data.as_ref().unwrap().colours[0], 7);
    assert!(matches!(
        store.lists().lands.find(0, 0),
        Err(StoreError::CellNotFound(CellKey::Exterior(0, 0)))
    ));
}

#[test]
fn structural_errors_abort_the_file() {
    let mut store = Store::new();
    // STAT without its mandatory MODL.
    let file = FileBuilder::new().raw(b"STAT", |w| {
        w.write_hn_c_string(Tag::NAME, "broken");
        w.write_hn_c_string(Tag::new(b"FNAM"), "Broken");
    });
    let err = store.load(&mut file.reader("broken.esp")).unwrap_err();
    assert!(err.format_kind().is_some(), "{err}");
}

#[test]
fn a_broken_file_leaves_the_store_untouched() {
    let mut store = Store::new();
    let base = FileBuilder::new().record(Some("chair"), &activator("Old Chair"));
    store.load(&mut base.reader("Morrowind.esm")).unwrap();

    let plugin = FileBuilder::new()
        .record(Some("chair"), &activator("New Chair"))
        .record(Some("lamp"), &activator("Lamp"))
        .raw(b"TES4", |w| w.write_bytes(&[0; 4]))
        .raw(b"STAT", |w| {
            w.write_hn_c_string(Tag::NAME, "broken");
            w.write_hn_c_string(Tag::new(b"FNAM"), "Broken");
        });
    let err = store.load(&mut plugin.reader("plugin.esp")).unwrap_err();
    assert!(err.format_kind().is_some(), "{err}");

    let lists = store.lists();
    assert_eq!(lists.activators.find("chair").unwrap().name, "Old Chair");
    assert!(lists.activators.search("lamp").is_none());
    assert_eq!(store.find_kind("lamp"), None);
    assert_eq!(store.find_kind("broken"), None);
    assert!(store.skipped().is_empty());

    // The store still takes later files.
    let fixed = FileBuilder::new().record(Some("lamp"), &activator("Lamp"));
    store.load(&mut fixed.reader("fixed.esp")).unwrap();
    assert_eq!(store.find_kind("lamp"), Some(Activator::TAG));
}

#[test]
fn cell_references_load_lazily() {
    let mut store = Store::new();
    let mut w = Writer::new(&Header::default());
    w.start_record(Cell::TAG, 0);
    w.write_hn_c_string(Tag::NAME, "");
    exterior(3, 4).save(&mut w);
    // A reference whose NAME is missing.
    w.write_hnt(Tag::new(b"FRMR"), &1u32);
    w.write_hn_c_string(Tag::new(b"JUNK"), "x");
    w.end_record();
    store
        .load(&mut Reader::from_bytes("lazy.esp", w.finish()).unwrap())
        .unwrap();

    let mut cell = CellStore::new(&store);
    cell.load_ext(3, 4).unwrap();
    assert_eq!(cell.state(), LoadState::Unloaded);

    let err = cell.load_refs().unwrap_err();
    assert!(matches!(err, StoreError::Esm(_)), "{err}");
    assert_eq!(cell.state(), LoadState::Unloaded);
    assert!(cell.refs().is_empty());
}

#[test]
fn selecting_a_missing_cell_fails() {
    let store = load(FileBuilder::new().cell("Balmora", &interior(), &[]));
    let mut cell = CellStore::new(&store);

    assert!(matches!(cell.load_refs(), Err(StoreError::NoCell)));
    assert!(matches!(
        cell.load_int("Vivec"),
        Err(StoreError::CellNotFound(CellKey::Interior(name))) if name == "Vivec"
    ));
    assert!(matches!(
        cell.load_ext(10, 10),
        Err(StoreError::CellNotFound(CellKey::Exterior(10, 10)))
    ));
    cell.load_int("BALMORA").unwrap();
    cell.load_refs().unwrap();
    assert!(cell.refs().is_empty());
}

#[test]
fn unresolved_references_are_skipped() {
    let store = load(
        FileBuilder::new()
            .record(Some("chair"), &activator("Chair"))
            .record(
                Some("GameHour"),
                &Global {
                    kind: VarType::Float,
                    value: 9.0,
                },
            )
            .cell(
                "Balmora",
                &interior(),
                &[
                    cell_ref(1, "chair"),
                    cell_ref(2, "from_an_unloaded_plugin"),
                    cell_ref(3, "GameHour"),
                    CellRef {
                        deleted: true,
                        ..cell_ref(4, "chair")
                    },
                    cell_ref(5, "CHAIR"),
                ],
            ),
    );

    let mut cell = CellStore::new(&store);
    cell.load_int("balmora").unwrap();
    cell.load_refs().unwrap();

    let chairs: Vec<u32> = cell.refs().activators.iter().map(|l| l.cell_ref.ref_num).collect();
    assert_eq!(chairs, vec![1, 5]);
    assert_eq!(cell.unresolved(), 2);
    assert_eq!(cell.refs().len(), 2);

    let live = cell.refs().activators.find("chair").unwrap();
    assert_eq!(live.base.name, "Chair");
    assert!(live.data.enabled);
    assert_eq!(live.data.position.pos[0], 1.0);
}

#[test]
fn for_each_visits_categories_in_order() {
    let store = load(
        FileBuilder::new()
            .record(Some("chair"), &activator("Chair"))
            .record(Some("rock"), &stat("x\\rock.nif"))
            .record(Some("door_a"), &door("Door"))
            .cell(
                "",
                &exterior(0, 1),
                &[
                    cell_ref(1, "rock"),
                    cell_ref(2, "door_a"),
                    cell_ref(3, "chair"),
                    cell_ref(4, "rock"),
                ],
            ),
    );

    let mut cell = CellStore::new(&store);
    cell.load_ext(0, 1).unwrap();

    let mut seen = Vec::new();
    let complete = cell
        .for_each(|obj| {
            seen.push((obj.kind, obj.cell_ref.ref_num, obj.base.model().to_string()));
            true
        })
        .unwrap();
    assert!(complete);
    assert_eq!(cell.state(), LoadState::Loaded);
    assert_eq!(
        seen,
        vec![
            (RefKind::Activator, 3, "f\\furn.nif".to_string()),
            (RefKind::Door, 2, "d\\door.nif".to_string()),
            (RefKind::Static, 1, "x\\rock.nif".to_string()),
            (RefKind::Static, 4, "x\\rock.nif".to_string()),
        ]
    );
    assert_eq!(cell.refs().count(RefKind::Static), 2);

    let mut visited = 0;
    let complete = cell
        .for_each(|_| {
            visited += 1;
            visited < 2
        })
        .unwrap();
    assert!(!complete);
    assert_eq!(visited, 2);
}

#[test]
fn load_all_follows_the_load_order() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    std::fs::write(
        dir.join("Base.esm"),
        FileBuilder::new()
            .record(Some("chair"), &activator("Old Chair"))
            .bytes(),
    )
    .unwrap();
    std::fs::write(
        dir.join("Plugin.esp"),
        FileBuilder::new()
            .record(Some("chair"), &activator("New Chair"))
            .bytes(),
    )
    .unwrap();

    let order = LoadOrder::new(dir, ["Base.esm", "Plugin.esp"]);
    let store = Store::load_all(&order, &StoreConfig::default()).unwrap();
    assert_eq!(store.lists().activators.find("chair").unwrap().name, "New Chair");

    let reversed = LoadOrder::new(dir, ["Plugin.esp", "Base.esm"]);
    let store = Store::load_all(&reversed, &StoreConfig::default()).unwrap();
    assert_eq!(store.lists().activators.find("chair").unwrap().name, "Old Chair");

    let missing = LoadOrder::new(dir, ["Missing.esp"]);
    assert!(matches!(
        Store::load_all(&missing, &StoreConfig::default()),
        Err(StoreError::Esm(esm::Error::Io { .. }))
    ));
}
