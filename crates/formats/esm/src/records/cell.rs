//! Cells and the references placed in them.
//!
//! Loading a [`Cell`] reads only its header subrecords. The reader context
//! just past them is kept so the reference list can be decoded later with
//! [`CellRef::load_next`].

use serde::Serialize;

use crate::error::{FormatErrorKind, Result};
use crate::fixed_field;
use crate::reader::{Context, Reader};
use crate::records::Record;
use crate::records::ai::{DNAM, DODT};
use crate::records::sub::{ANAM, BNAM, CNAM, DATA, FLTV, INDX, INTV, NAME};
use crate::tag::Tag;
use crate::writer::Writer;

pub const AMBI: Tag = Tag::new(b"AMBI");
pub const RGNN: Tag = Tag::new(b"RGNN");
pub const NAM5: Tag = Tag::new(b"NAM5");
pub const WHGT: Tag = Tag::new(b"WHGT");
pub const FRMR: Tag = Tag::new(b"FRMR");
pub const NAM0: Tag = Tag::new(b"NAM0");
pub const MVRF: Tag = Tag::new(b"MVRF");
pub const CNDT: Tag = Tag::new(b"CNDT");
pub const XSCL: Tag = Tag::new(b"XSCL");
pub const XSOL: Tag = Tag::new(b"XSOL");
pub const XCHG: Tag = Tag::new(b"XCHG");
pub const NAM9: Tag = Tag::new(b"NAM9");
pub const KNAM: Tag = Tag::new(b"KNAM");
pub const TNAM: Tag = Tag::new(b"TNAM");
pub const UNAM: Tag = Tag::new(b"UNAM");

fixed_field! {
    /// Position and rotation (radians) of a placed object.
    pub struct Position {
        pub pos: [f32; 3],
        pub rot: [f32; 3],
    }
}

fixed_field! {
    /// CELL DATA (12 bytes).
    pub struct CellData {
        pub flags: i32,
        pub grid_x: i32,
        pub grid_y: i32,
    }
}

fixed_field! {
    /// Interior lighting (AMBI, 16 bytes). Colours are packed RGBA.
    pub struct AmbientLight {
        pub ambient: i32,
        pub sunlight: i32,
        pub fog: i32,
        pub fog_density: f32,
    }
}

/// How an interior cell stores its water level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum WaterLevel {
    /// INTV, used by older plugins.
    Int(i32),
    /// WHGT.
    Float(f32),
}

impl WaterLevel {
    pub fn value(self) -> f32 {
        match self {
            Self::Int(v) => v as f32,
            Self::Float(v) => v,
        }
    }
}

/// A map cell: an interior identified by name, or a 8192-unit exterior
/// square identified by grid coordinates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cell {
    /// Interior name. Exteriors may carry a region-like display name.
    pub name: String,
    pub data: CellData,
    pub deleted: bool,
    pub water: Option<WaterLevel>,
    /// Exterior cells and quasi-exteriors.
    pub region: String,
    /// Only present in true interiors.
    pub ambient: Option<AmbientLight>,
    pub map_color: Option<i32>,
    /// Reader position at the start of the reference list.
    #[serde(skip)]
    pub context: Option<Context>,
}

impl Cell {
    pub const INTERIOR: i32 = 0x01;
    pub const HAS_WATER: i32 = 0x02;
    pub const NO_SLEEP: i32 = 0x04;
    /// Interior that behaves as an exterior (sky, weather).
    pub const QUASI_EX: i32 = 0x80;

    pub fn is_interior(&self) -> bool {
        self.data.flags & Self::INTERIOR != 0
    }

    pub fn is_quasi_exterior(&self) -> bool {
        self.data.flags & Self::QUASI_EX != 0
    }

    pub fn grid(&self) -> (i32, i32) {
        (self.data.grid_x, self.data.grid_y)
    }

    /// A reader positioned on this cell's first reference.
    pub fn ref_reader(&self) -> Option<Reader> {
        self.context.as_ref().map(Reader::resume)
    }
}

impl Record for Cell {
    const TAG: Tag = Tag::new(b"CELL");

    fn load(r: &mut Reader) -> Result<Self> {
        let mut cell = Cell {
            deleted: r.skip_deleted()?,
            data: r.get_hnt(DATA)?,
            ..Default::default()
        };

        if cell.is_interior() {
            if r.is_next_sub(INTV)? {
                cell.water = Some(WaterLevel::Int(r.get_ht()?));
            } else if r.is_next_sub(WHGT)? {
                cell.water = Some(WaterLevel::Float(r.get_ht()?));
            }

            if cell.is_quasi_exterior() {
                cell.region = r.get_hno_string(RGNN)?;
            } else {
                cell.ambient = Some(r.get_hnt(AMBI)?);
            }
        } else {
            cell.region = r.get_hno_string(RGNN)?;
            cell.map_color = r.get_hnot(NAM5)?;
        }

        // References are decoded later from here.
        cell.context = Some(r.get_context());
        r.skip_record()?;
        Ok(cell)
    }

    fn save(&self, w: &mut Writer) {
        if self.deleted {
            w.write_hnt(Tag::DELE, &0i32);
        }
        w.write_hnt(DATA, &self.data);
        if self.is_interior() {
            match self.water {
                Some(WaterLevel::Int(v)) => w.write_hnt(INTV, &v),
                Some(WaterLevel::Float(v)) => w.write_hnt(WHGT, &v),
                None => {}
            }
            if self.is_quasi_exterior() {
                w.write_hno_c_string(RGNN, &self.region);
            } else if let Some(ambient) = &self.ambient {
                w.write_hnt(AMBI, ambient);
            }
        } else {
            w.write_hno_c_string(RGNN, &self.region);
            w.write_hnot(NAM5, &self.map_color);
        }
    }
}

/// Door teleport target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoorDest {
    pub pos: Position,
    /// Destination interior, empty for exterior targets.
    pub cell: String,
}

/// One placed instance of a base record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellRef {
    /// Unique reference number within the content file.
    pub ref_num: u32,
    /// Base record id.
    pub ref_id: String,
    pub scale: f32,
    pub owner: String,
    pub global: String,
    pub soul: String,
    pub faction: String,
    pub faction_rank: Option<i32>,
    pub charge: Option<f32>,
    pub health: Option<i32>,
    pub uses: Option<i32>,
    pub door_dest: Option<DoorDest>,
    pub lock_level: Option<i32>,
    pub key: String,
    pub trap: String,
    pub reference_blocked: Option<u8>,
    pub deleted: bool,
    pub pos: Position,
}

impl CellRef {
    /// Decode the next reference of a cell, or `None` once the cell's record
    /// is exhausted.
    ///
    /// The leading NAM0 reference count is advisory and only skipped. Moved
    /// reference markers (MVRF with its CNAM or CNDT target) are skipped too.
    pub fn load_next(r: &mut Reader) -> Result<Option<Self>> {
        loop {
            match r.peek_sub_name()? {
                None => return Ok(None),
                Some(tag) if tag == NAM0 => {
                    r.get_sub_name()?;
                    r.skip_h_sub_size(4)?;
                }
                Some(tag) if tag == MVRF => {
                    r.get_sub_name()?;
                    r.skip_h_sub()?;
                    if r.is_next_sub(CNAM)? || r.is_next_sub(CNDT)? {
                        r.skip_h_sub()?;
                    }
                }
                Some(_) => break,
            }
        }

        let mut cref = CellRef {
            ref_num: r.get_hnt(FRMR)?,
            ref_id: r.get_hn_string(NAME)?,
            scale: 1.0,
            ..Default::default()
        };

        loop {
            let tag = r.get_sub_name()?;
            match tag.as_bytes() {
                b"XSCL" => cref.scale = r.get_ht()?,
                b"ANAM" => cref.owner = r.get_h_string()?,
                b"BNAM" => cref.global = r.get_h_string()?,
                b"XSOL" => cref.soul = r.get_h_string()?,
                b"CNAM" => cref.faction = r.get_h_string()?,
                b"INDX" => cref.faction_rank = Some(r.get_ht()?),
                b"XCHG" => cref.charge = Some(r.get_ht()?),
                b"INTV" => cref.health = Some(r.get_ht()?),
                b"NAM9" => cref.uses = Some(r.get_ht()?),
                b"DODT" => {
                    let pos = r.get_ht()?;
                    let cell = r.get_hno_string(DNAM)?;
                    cref.door_dest = Some(DoorDest { pos, cell });
                }
                b"FLTV" => cref.lock_level = Some(r.get_ht()?),
                b"KNAM" => cref.key = r.get_h_string()?,
                b"TNAM" => cref.trap = r.get_h_string()?,
                b"UNAM" => cref.reference_blocked = Some(r.get_ht()?),
                b"DELE" => {
                    r.skip_h_sub()?;
                    cref.deleted = true;
                }
                b"DATA" => {
                    cref.pos = r.get_ht()?;
                    break;
                }
                _ => {
                    log::debug!("{}: skipping {tag} in reference {}", r.name(), cref.ref_id);
                    r.skip_h_sub()?;
                }
            }
            if !r.has_more_subs() {
                return Err(r.fail(FormatErrorKind::UnexpectedSubrecord {
                    expected: DATA,
                    found: Tag::default(),
                }));
            }
        }

        Ok(Some(cref))
    }

    pub fn save(&self, w: &mut Writer) {
        w.write_hnt(FRMR, &self.ref_num);
        w.write_hn_c_string(NAME, &self.ref_id);
        if self.scale != 1.0 {
            w.write_hnt(XSCL, &self.scale);
        }
        w.write_hno_c_string(ANAM, &self.owner);
        w.write_hno_c_string(BNAM, &self.global);
        w.write_hno_c_string(XSOL, &self.soul);
        w.write_hno_c_string(CNAM, &self.faction);
        w.write_hnot(INDX, &self.faction_rank);
        w.write_hnot(XCHG, &self.charge);
        w.write_hnot(INTV, &self.health);
        w.write_hnot(NAM9, &self.uses);
        if let Some(dest) = &self.door_dest {
            w.write_hnt(DODT, &dest.pos);
            w.write_hno_c_string(DNAM, &dest.cell);
        }
        w.write_hnot(FLTV, &self.lock_level);
        w.write_hno_c_string(KNAM, &self.key);
        w.write_hno_c_string(TNAM, &self.trap);
        w.write_hnot(UNAM, &self.reference_blocked);
        if self.deleted {
            w.write_hnt(Tag::DELE, &0i32);
        }
        w.write_hnt(DATA, &self.pos);
    }
}
