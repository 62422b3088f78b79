//! Exterior terrain.
//!
//! Terrain data is large, so loading a [`Land`] only records which data
//! blocks are present and where they start. [`Land::load_data`] decodes
//! them on demand.

use serde::Serialize;

use crate::cursor::{ByteWriter, Cursor};
use crate::error::{FormatErrorKind, Result};
use crate::reader::{Context, Reader};
use crate::records::Record;
use crate::records::sub::{DATA, INTV};
use crate::tag::Tag;
use crate::writer::Writer;

const VNML: Tag = Tag::new(b"VNML");
const VHGT: Tag = Tag::new(b"VHGT");
const WNAM: Tag = Tag::new(b"WNAM");
const VCLR: Tag = Tag::new(b"VCLR");
const VTEX: Tag = Tag::new(b"VTEX");

/// Vertices per side of a land tile.
pub const LAND_SIZE: usize = 65;
pub const LAND_NUM_VERTS: usize = LAND_SIZE * LAND_SIZE;
/// Texture slots per side.
pub const LAND_TEXTURE_SIZE: usize = 16;
pub const LAND_NUM_TEXTURES: usize = LAND_TEXTURE_SIZE * LAND_TEXTURE_SIZE;
/// Global map heights per tile (9 x 9).
pub const GLOBAL_MAP_LOD_SIZE: usize = 81;
/// Height deltas are stored in units of 8.
pub const HEIGHT_SCALE: f32 = 8.0;

const VHGT_SIZE: usize = 4 + LAND_NUM_VERTS + 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LandData {
    /// Absolute heights in row order.
    pub heights: Vec<f32>,
    pub min_height: f32,
    pub max_height: f32,
    /// Vertex normals, three components per vertex.
    pub normals: Vec<i8>,
    /// Vertex colours, RGB per vertex.
    pub colours: Vec<u8>,
    /// Land texture indices in row order (1-based, 0 = default texture).
    pub textures: Vec<u16>,
    /// Which `DATA_*` blocks have been decoded.
    pub loaded: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Land {
    pub x: i32,
    pub y: i32,
    pub flags: i32,
    pub deleted: bool,
    /// Which `DATA_*` blocks the record contains.
    pub data_types: i32,
    /// Low resolution heights for the world map.
    pub wnam: Vec<i8>,
    #[serde(skip)]
    pub context: Option<Context>,
    pub land_data: Option<LandData>,
}

impl PartialEq for Land {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.flags == other.flags
            && self.deleted == other.deleted
            && self.data_types == other.data_types
            && self.wnam == other.wnam
            && self.land_data == other.land_data
    }
}

impl Land {
    pub const DATA_VNML: i32 = 0x01;
    pub const DATA_VHGT: i32 = 0x02;
    pub const DATA_WNAM: i32 = 0x04;
    pub const DATA_VCLR: i32 = 0x08;
    pub const DATA_VTEX: i32 = 0x10;
    pub const DATA_ALL: i32 = 0x1f;

    pub fn grid(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Whether every block in `mask` that the record has is decoded.
    pub fn is_data_loaded(&self, mask: i32) -> bool {
        let wanted = mask & self.data_types;
        self.land_data
            .as_ref()
            .is_some_and(|d| d.loaded & wanted == wanted)
    }

    /// Decode the blocks in `mask` from the saved reader position.
    ///
    /// Blocks that are already decoded or absent from the record are left
    /// alone. Records built in memory have no saved position and are
    /// unaffected.
    pub fn load_data(&mut self, mask: i32) -> Result<()> {
        if self.is_data_loaded(mask) {
            return Ok(());
        }
        let Some(ctx) = &self.context else {
            return Ok(());
        };
        let mut r = Reader::resume(ctx);
        let wanted = mask & self.data_types;
        let data = self.land_data.get_or_insert_with(LandData::default);

        if r.is_next_sub(VNML)? {
            if wanted & Self::DATA_VNML != 0 && data.loaded & Self::DATA_VNML == 0 {
                let bytes = r.get_h_bytes_exact(LAND_NUM_VERTS * 3)?;
                data.normals = bytes.into_iter().map(|b| b as i8).collect();
                data.loaded |= Self::DATA_VNML;
            } else {
                r.skip_h_sub()?;
            }
        }

        if r.is_next_sub(VHGT)? {
            if wanted & Self::DATA_VHGT != 0 && data.loaded & Self::DATA_VHGT == 0 {
                let bytes = r.get_h_bytes_exact(VHGT_SIZE)?;
                decode_heights(&bytes, data).map_err(|e| {
                    r.fail(FormatErrorKind::Decode(e.to_string()))
                })?;
                data.loaded |= Self::DATA_VHGT;
            } else {
                r.skip_h_sub()?;
            }
        }

        // WNAM is decoded eagerly by `load`.
        if r.is_next_sub(WNAM)? {
            r.skip_h_sub()?;
            data.loaded |= wanted & Self::DATA_WNAM;
        }

        if r.is_next_sub(VCLR)? {
            if wanted & Self::DATA_VCLR != 0 && data.loaded & Self::DATA_VCLR == 0 {
                data.colours = r.get_h_bytes_exact(LAND_NUM_VERTS * 3)?;
                data.loaded |= Self::DATA_VCLR;
            } else {
                r.skip_h_sub()?;
            }
        }

        if r.is_next_sub(VTEX)? {
            if wanted & Self::DATA_VTEX != 0 && data.loaded & Self::DATA_VTEX == 0 {
                let bytes = r.get_h_bytes_exact(LAND_NUM_TEXTURES * 2)?;
                let mut c = Cursor::new(&bytes);
                let mut blocks = Vec::with_capacity(LAND_NUM_TEXTURES);
                for _ in 0..LAND_NUM_TEXTURES {
                    blocks.push(c.read_u16().map_err(|e| {
                        r.fail(FormatErrorKind::Decode(e.to_string()))
                    })?);
                }
                data.textures = transpose_textures(&blocks);
                data.loaded |= Self::DATA_VTEX;
            } else {
                r.skip_h_sub()?;
            }
        }

        Ok(())
    }

    /// Drop decoded terrain data.
    pub fn unload_data(&mut self) {
        self.land_data = None;
    }
}

fn decode_heights(bytes: &[u8], data: &mut LandData) -> Result<()> {
    let mut c = Cursor::new(bytes);
    let offset = c.read_f32()?;
    let deltas = c.read_bytes(LAND_NUM_VERTS)?;

    data.heights = vec![0.0; LAND_NUM_VERTS];
    data.min_height = f32::MAX;
    data.max_height = f32::MIN;

    let mut row_offset = offset;
    for y in 0..LAND_SIZE {
        row_offset += deltas[y * LAND_SIZE] as i8 as f32;
        let mut col_offset = row_offset;
        for x in 0..LAND_SIZE {
            if x > 0 {
                col_offset += deltas[y * LAND_SIZE + x] as i8 as f32;
            }
            let height = col_offset * HEIGHT_SCALE;
            data.heights[y * LAND_SIZE + x] = height;
            data.min_height = data.min_height.min(height);
            data.max_height = data.max_height.max(height);
        }
    }
    Ok(())
}

fn encode_heights(heights: &[f32]) -> Vec<u8> {
    fn delta(diff: f32) -> u8 {
        let d = diff / HEIGHT_SCALE;
        let rounded = if d >= 0.0 { d + 0.5 } else { d - 0.5 };
        (rounded as i8) as u8
    }

    let mut w = ByteWriter::with_capacity(VHGT_SIZE);
    let first = heights.first().copied().unwrap_or(0.0);
    w.write_f32(first / HEIGHT_SCALE);

    let mut prev_row = first;
    for y in 0..LAND_SIZE {
        let start = heights.get(y * LAND_SIZE).copied().unwrap_or(0.0);
        w.write_u8(delta(start - prev_row));
        prev_row = start;
        let mut prev = start;
        for x in 1..LAND_SIZE {
            let h = heights.get(y * LAND_SIZE + x).copied().unwrap_or(0.0);
            w.write_u8(delta(h - prev));
            prev = h;
        }
    }
    w.write_bytes(&[0, 0, 0]);
    w.into_bytes()
}

/// Textures are stored as 16 blocks of 4 x 4; convert to plain row order.
fn transpose_textures(blocks: &[u16]) -> Vec<u16> {
    let mut out = vec![0u16; LAND_NUM_TEXTURES];
    let mut read = 0;
    for y1 in 0..4 {
        for x1 in 0..4 {
            for y2 in 0..4 {
                for x2 in 0..4 {
                    out[(y1 * 4 + y2) * LAND_TEXTURE_SIZE + x1 * 4 + x2] = blocks[read];
                    read += 1;
                }
            }
        }
    }
    out
}

fn untranspose_textures(rows: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(LAND_NUM_TEXTURES);
    for y1 in 0..4 {
        for x1 in 0..4 {
            for y2 in 0..4 {
                for x2 in 0..4 {
                    let i = (y1 * 4 + y2) * LAND_TEXTURE_SIZE + x1 * 4 + x2;
                    out.push(rows.get(i).copied().unwrap_or(0));
                }
            }
        }
    }
    out
}

impl Record for Land {
    const TAG: Tag = Tag::new(b"LAND");

    fn load(r: &mut Reader) -> Result<Self> {
        let mut land = Land::default();
        let mut has_location = false;

        while let Some(tag) = r.peek_sub_name()? {
            if tag == INTV {
                r.get_sub_name()?;
                let [x, y] = r.get_ht::<[i32; 2]>()?;
                land.x = x;
                land.y = y;
                has_location = true;
            } else if tag == DATA {
                r.get_sub_name()?;
                land.flags = r.get_ht()?;
            } else if tag == Tag::DELE {
                r.get_sub_name()?;
                r.skip_h_sub()?;
                land.deleted = true;
            } else {
                break;
            }
        }

        if !has_location {
            return Err(r.fail(FormatErrorKind::UnexpectedSubrecord {
                expected: INTV,
                found: r.cached_sub().unwrap_or_default(),
            }));
        }

        land.context = Some(r.get_context());

        while r.peek_sub_name()?.is_some() {
            let tag = r.get_sub_name()?;
            match tag.as_bytes() {
                b"VNML" => {
                    r.skip_h_sub()?;
                    land.data_types |= Self::DATA_VNML;
                }
                b"VHGT" => {
                    r.skip_h_sub()?;
                    land.data_types |= Self::DATA_VHGT;
                }
                b"WNAM" => {
                    let bytes = r.get_h_bytes_exact(GLOBAL_MAP_LOD_SIZE)?;
                    land.wnam = bytes.into_iter().map(|b| b as i8).collect();
                    land.data_types |= Self::DATA_WNAM;
                }
                b"VCLR" => {
                    r.skip_h_sub()?;
                    land.data_types |= Self::DATA_VCLR;
                }
                b"VTEX" => {
                    r.skip_h_sub()?;
                    land.data_types |= Self::DATA_VTEX;
                }
                _ => {
                    return Err(r.fail(FormatErrorKind::Invalid(format!(
                        "unknown land subrecord {tag}"
                    ))));
                }
            }
        }

        Ok(land)
    }

    /// Terrain blocks are only written once decoded, so call
    /// [`Land::load_data`] with [`Land::DATA_ALL`] before saving a loaded tile.
    fn save(&self, w: &mut Writer) {
        w.start_sub_record(INTV);
        w.write_t(&self.x);
        w.write_t(&self.y);
        w.end_sub_record();
        w.write_hnt(DATA, &self.flags);

        if self.deleted {
            w.write_hn_bytes(Tag::DELE, &[0, 0, 0, 0]);
            return;
        }

        let data = self.land_data.as_ref();
        let has = |flag: i32| {
            self.data_types & flag != 0 && data.is_some_and(|d| d.loaded & flag != 0)
        };

        if let Some(d) = data {
            if has(Self::DATA_VNML) {
                let bytes: Vec<u8> = d.normals.iter().map(|&n| n as u8).collect();
                w.write_hn_bytes(VNML, &bytes);
            }
            if has(Self::DATA_VHGT) {
                w.write_hn_bytes(VHGT, &encode_heights(&d.heights));
            }
        }
        if self.data_types & Self::DATA_WNAM != 0 && !self.wnam.is_empty() {
            let bytes: Vec<u8> = self.wnam.iter().map(|&h| h as u8).collect();
            w.write_hn_bytes(WNAM, &bytes);
        }
        if let Some(d) = data {
            if has(Self::DATA_VCLR) {
                w.write_hn_bytes(VCLR, &d.colours);
            }
            if has(Self::DATA_VTEX) {
                let mut bytes = ByteWriter::with_capacity(LAND_NUM_TEXTURES * 2);
                for t in untranspose_textures(&d.textures) {
                    bytes.write_u16(t);
                }
                w.write_hn_bytes(VTEX, bytes.as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_transpose_is_reversible() {
        let rows: Vec<u16> = (0..LAND_NUM_TEXTURES as u16).collect();
        let blocks = untranspose_textures(&rows);
        // First block holds the top-left 4 x 4 square.
        assert_eq!(&blocks[..5], &[0, 1, 2, 3, 16]);
        assert_eq!(transpose_textures(&blocks), rows);
    }

    #[test]
    fn heights_survive_delta_encoding() {
        let heights: Vec<f32> = (0..LAND_NUM_VERTS)
            .map(|i| ((i % 7) as f32 - 3.0) * HEIGHT_SCALE)
            .collect();
        let bytes = encode_heights(&heights);
        assert_eq!(bytes.len(), VHGT_SIZE);

        let mut data = LandData::default();
        decode_heights(&bytes, &mut data).unwrap();
        assert_eq!(data.heights, heights);
        assert_eq!(data.min_height, -3.0 * HEIGHT_SCALE);
        assert_eq!(data.max_height, 3.0 * HEIGHT_SCALE);
    }
}
