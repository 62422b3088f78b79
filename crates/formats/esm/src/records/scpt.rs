//! Scripts and start scripts. Both carry their own id in the record body.

use serde::Serialize;

use crate::error::Result;
use crate::field::FixedString;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{DATA, NAME};
use crate::tag::Tag;
use crate::text;
use crate::writer::Writer;

const SCHD: Tag = Tag::new(b"SCHD");
const SCVR: Tag = Tag::new(b"SCVR");
const SCDT: Tag = Tag::new(b"SCDT");
const SCTX: Tag = Tag::new(b"SCTX");

fixed_field! {
    /// SCHD (52 bytes).
    pub struct ScriptHeader {
        pub name: FixedString<32>,
        pub num_shorts: i32,
        pub num_longs: i32,
        pub num_floats: i32,
        /// Size of the compiled bytecode.
        pub data_size: i32,
        /// Size of the variable name table.
        pub string_table_size: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Script {
    pub header: ScriptHeader,
    /// Local variable names: shorts, then longs, then floats.
    pub variables: Vec<String>,
    /// Compiled bytecode.
    #[serde(skip)]
    pub bytecode: Vec<u8>,
    /// Source text.
    pub text: String,
}

impl Script {
    pub fn id(&self) -> &str {
        self.header.name.as_str()
    }
}

impl Record for Script {
    const TAG: Tag = Tag::new(b"SCPT");

    fn load(r: &mut Reader) -> Result<Self> {
        let header: ScriptHeader = r.get_hnt_sized(SCHD, 52)?;

        let variables = if r.is_next_sub(SCVR)? {
            let table = r.get_h_bytes()?;
            table
                .split(|&b| b == 0)
                .filter(|name| !name.is_empty())
                .map(text::decode)
                .collect()
        } else {
            Vec::new()
        };

        let bytecode = if r.is_next_sub(SCDT)? {
            r.get_h_bytes()?
        } else {
            Vec::new()
        };
        let text = r.get_hno_string(SCTX)?;

        Ok(Self {
            header,
            variables,
            bytecode,
            text,
        })
    }

    fn save(&self, w: &mut Writer) {
        let mut table = Vec::new();
        for var in &self.variables {
            table.extend(text::encode(var));
            table.push(0);
        }
        let mut header = self.header.clone();
        header.data_size = self.bytecode.len() as i32;
        header.string_table_size = table.len() as i32;

        w.write_hnt(SCHD, &header);
        if !table.is_empty() {
            w.write_hn_bytes(SCVR, &table);
        }
        if !self.bytecode.is_empty() {
            w.write_hn_bytes(SCDT, &self.bytecode);
        }
        w.write_hno_string(SCTX, &self.text);
    }
}

/// Script started when the game loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StartScript {
    /// Record id; usually a numeric string.
    pub data: String,
    pub script: String,
}

impl StartScript {
    pub fn id(&self) -> &str {
        &self.data
    }
}

impl Record for StartScript {
    const TAG: Tag = Tag::new(b"SSCR");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            data: r.get_hn_string(DATA)?,
            script: r.get_hn_string(NAME)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_string(DATA, &self.data);
        w.write_hn_c_string(NAME, &self.script);
    }
}
