//! AI navigation graph of a cell.

use serde::Serialize;

use crate::cursor::{ByteWriter, Cursor};
use crate::error::{FormatErrorKind, Result};
use crate::field::FixedField;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{DATA, NAME};
use crate::tag::Tag;
use crate::writer::Writer;

const PGRP: Tag = Tag::new(b"PGRP");
const PGRC: Tag = Tag::new(b"PGRC");

fixed_field! {
    pub struct PathgridData {
        /// Grid of the exterior cell; both zero for interiors.
        pub x: i32,
        pub y: i32,
        /// Granularity used by the editor's automatic point generation.
        pub granularity: i16,
        pub point_count: i16,
    }
}

fixed_field! {
    /// One navigation node (16 bytes).
    pub struct Point {
        pub x: i32,
        pub y: i32,
        pub z: i32,
        pub autogenerated: u8,
        pub connection_count: u8,
        pub unknown: i16,
    }
}

/// A directed edge between two points, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pathgrid {
    pub data: PathgridData,
    /// Name of the cell this grid belongs to.
    pub cell: String,
    pub points: Vec<Point>,
    pub edges: Vec<Edge>,
}

impl Pathgrid {
    /// Interiors are stored with grid (0, 0).
    pub fn is_interior(&self) -> bool {
        self.data.x == 0 && self.data.y == 0
    }

    pub fn grid(&self) -> (i32, i32) {
        (self.data.x, self.data.y)
    }
}

impl Record for Pathgrid {
    const TAG: Tag = Tag::new(b"PGRD");

    fn load(r: &mut Reader) -> Result<Self> {
        let data: PathgridData = r.get_hnt_sized(DATA, 12)?;
        let cell = r.get_hn_string(NAME)?;

        let mut points = Vec::new();
        if r.is_next_sub(PGRP)? {
            let bytes = r.get_h_bytes()?;
            if bytes.len() != data.point_count.max(0) as usize * Point::SIZE {
                return Err(r.fail(FormatErrorKind::SubSizeMismatch {
                    expected: data.point_count.max(0) as usize * Point::SIZE,
                    found: bytes.len(),
                }));
            }
            let mut c = Cursor::new(&bytes);
            while !c.is_empty() {
                points.push(Point::decode(&mut c)?);
            }
        }

        // Edges are listed per point, in point order, `connection_count` each.
        let mut edges = Vec::new();
        if r.is_next_sub(PGRC)? {
            let bytes = r.get_h_bytes()?;
            if bytes.len() % 4 != 0 {
                return Err(r.fail(FormatErrorKind::Invalid(format!(
                    "edge list of {} bytes",
                    bytes.len()
                ))));
            }
            let mut c = Cursor::new(&bytes);
            'points: for (from, point) in points.iter().enumerate() {
                for _ in 0..point.connection_count {
                    if c.is_empty() {
                        break 'points;
                    }
                    edges.push(Edge {
                        from: from as u32,
                        to: c.read_u32()?,
                    });
                }
            }
        }

        Ok(Self {
            data,
            cell,
            points,
            edges,
        })
    }

    fn save(&self, w: &mut Writer) {
        let mut data = self.data.clone();
        data.point_count = self.points.len() as i16;
        w.write_hnt(DATA, &data);
        w.write_hn_c_string(NAME, &self.cell);

        if !self.points.is_empty() {
            let mut bytes = ByteWriter::with_capacity(self.points.len() * Point::SIZE);
            for point in &self.points {
                point.encode(&mut bytes);
            }
            w.write_hn_bytes(PGRP, bytes.as_bytes());
        }

        if !self.edges.is_empty() {
            let mut bytes = ByteWriter::with_capacity(self.edges.len() * 4);
            for edge in &self.edges {
                bytes.write_u32(edge.to);
            }
            w.write_hn_bytes(PGRC, bytes.as_bytes());
        }
    }
}
