use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use esm::records::BaseObject;
use esm::{FileType, Reader, Tag};
use esm_store::{CellStore, LoadOrder, RecordList, Store, StoreConfig};

#[derive(Parser)]
#[command(name = "esmtool", about = "Inspect TES3 content files")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the file header and the number of records of each kind.
    Info {
        /// Path to an .esm, .esp or .ess file.
        file: PathBuf,
    },
    /// Decode every record of a file and print it.
    Dump {
        /// Path to an .esm, .esp or .ess file.
        file: PathBuf,
        /// Only print records with this tag (e.g. "NPC_").
        #[arg(long)]
        tag: Option<String>,
        /// Print full records as JSON instead of ids.
        #[arg(long)]
        json: bool,
    },
    /// Load a load order and list the objects placed in one cell.
    Cell {
        /// Path to the load order manifest.
        #[arg(default_value = "load_order.json")]
        manifest: PathBuf,
        /// Interior cell name.
        #[arg(long, conflicts_with = "grid", required_unless_present = "grid")]
        name: Option<String>,
        /// Exterior cell grid position.
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        grid: Option<Vec<i32>>,
        /// Record tags to skip while loading (e.g. "LAND").
        #[arg(long = "skip")]
        skip: Vec<String>,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

fn parse_tag(name: &str) -> Result<Tag> {
    let Ok(bytes) = <&[u8; 4]>::try_from(name.as_bytes()) else {
        bail!("record tags are four characters long: {name:?}");
    };
    Ok(Tag::new(bytes))
}

fn open(file: &Path) -> Result<Reader> {
    Reader::open(file).with_context(|| format!("failed to open content file: {}", file.display()))
}

fn cmd_info(file: &Path) -> Result<()> {
    let mut r = open(file)?;
    let header = r.header().clone();
    let kind = match header.file_type() {
        FileType::Esp => "plugin",
        FileType::Esm => "master",
        FileType::Ess => "savegame",
        FileType::Other(_) => "unknown",
    };

    println!("File:        {} ({kind}, {:?})", r.name(), r.special());
    println!("Version:     {:.1}", header.version());
    println!("Author:      {}", header.data.author);
    println!("Description: {}", header.data.description);
    println!("Records:     {}", header.data.record_count);
    if !header.masters.is_empty() {
        println!("Masters:");
        for master in &header.masters {
            println!("  - {} ({} bytes)", master.name, master.size);
        }
    }
    if let Some(save) = &header.save {
        println!("Player:      {} in {}", save.data.player, save.data.cell);
    }

    let mut counts: BTreeMap<Tag, usize> = BTreeMap::new();
    while r.has_more_recs() {
        let tag = r.get_rec_name()?;
        r.get_rec_header()?;
        r.skip_record()?;
        *counts.entry(tag).or_default() += 1;
    }
    println!("Record kinds:");
    for (tag, count) in &counts {
        println!("  {tag}  {count}");
    }
    Ok(())
}

fn cmd_dump(file: &Path, tag: Option<&str>, json: bool) -> Result<()> {
    let filter = tag.map(parse_tag).transpose()?;
    let mut r = open(file)?;
    let mut store = Store::new();
    store
        .load(&mut r)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let tags: Vec<Tag> = match filter {
        Some(tag) => vec![tag],
        None => store.counts().into_keys().collect(),
    };
    for tag in tags {
        let Some(list) = store.list(tag) else {
            bail!("no decoder for {tag} records");
        };
        let records = list.to_json()?;
        if json {
            let mut by_tag = serde_json::Map::new();
            by_tag.insert(tag.as_string(), records);
            println!("{}", serde_json::to_string_pretty(&by_tag)?);
            continue;
        }
        println!("{tag} ({} records)", list.len());
        match records {
            serde_json::Value::Object(map) => {
                for id in map.keys() {
                    println!("  {id}");
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    println!("  {item}");
                }
            }
            other => println!("  {other}"),
        }
    }

    for (tag, count) in store.skipped() {
        println!("skipped {count} {tag} records");
    }
    Ok(())
}

fn cmd_cell(manifest: &Path, name: Option<&str>, grid: Option<&[i32]>, skip: &[String]) -> Result<()> {
    let order = LoadOrder::from_file(manifest)
        .with_context(|| format!("failed to read load order: {}", manifest.display()))?;
    let skip: Vec<&str> = skip.iter().map(String::as_str).collect();
    for tag in &skip {
        parse_tag(tag)?;
    }
    let config = StoreConfig::from_skip_list(&skip);
    let store = Store::load_all(&order, &config).context("failed to load content files")?;

    let mut cell = CellStore::new(&store);
    match (name, grid) {
        (Some(name), _) => cell.load_int(name)?,
        (None, Some(&[x, y])) => cell.load_ext(x, y)?,
        _ => bail!("give either --name or --grid X Y"),
    }

    cell.for_each(|obj| {
        let [x, y, z] = obj.data.position.pos;
        println!(
            "{:>8}  {:<14} {:<32} ({x:.0}, {y:.0}, {z:.0})  {}",
            obj.cell_ref.ref_num,
            format!("{:?}", obj.kind),
            obj.cell_ref.ref_id,
            obj.base.model()
        );
        true
    })?;

    let refs = cell.refs();
    println!("{} references, {} unresolved", refs.len(), cell.unresolved());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Command::Info { file } => cmd_info(file),
        Command::Dump { file, tag, json } => cmd_dump(file, tag.as_deref(), *json),
        Command::Cell {
            manifest,
            name,
            grid,
            skip,
        } => cmd_cell(manifest, name.as_deref(), grid.as_deref(), skip),
    }
}
