//! Dialogue topics and their responses.
//!
//! An INFO record has no NAME id of its own. It belongs to the DIAL record
//! loaded immediately before it.

use serde::Serialize;

use crate::error::{FormatErrorKind, Result};
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{ANAM, BNAM, CNAM, DATA, FLTV, FNAM, INTV, NAME, RNAM, SNAM};
use crate::tag::Tag;
use crate::writer::Writer;

const INAM: Tag = Tag::new(b"INAM");
const PNAM: Tag = Tag::new(b"PNAM");
const NNAM: Tag = Tag::new(b"NNAM");
const ONAM: Tag = Tag::new(b"ONAM");
const DNAM: Tag = Tag::new(b"DNAM");
const SCVR: Tag = Tag::new(b"SCVR");
const QSTN: Tag = Tag::new(b"QSTN");
const QSTF: Tag = Tag::new(b"QSTF");
const QSTR: Tag = Tag::new(b"QSTR");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DialogueKind {
    Topic,
    Voice,
    Greeting,
    Persuasion,
    Journal,
    Other(u8),
}

impl DialogueKind {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Topic,
            1 => Self::Voice,
            2 => Self::Greeting,
            3 => Self::Persuasion,
            4 => Self::Journal,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> u8 {
        match self {
            Self::Topic => 0,
            Self::Voice => 1,
            Self::Greeting => 2,
            Self::Persuasion => 3,
            Self::Journal => 4,
            Self::Other(raw) => raw,
        }
    }
}

/// A dialogue topic, greeting group or journal quest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dialogue {
    pub id: String,
    pub kind: DialogueKind,
    /// Responses in file order.
    pub infos: Vec<DialInfo>,
}

impl Default for Dialogue {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: DialogueKind::Topic,
            infos: Vec::new(),
        }
    }
}

impl Dialogue {
    /// Add a response, replacing an earlier one with the same id.
    pub fn add_info(&mut self, info: DialInfo) {
        match self.infos.iter_mut().find(|i| i.id == info.id) {
            Some(existing) => *existing = info,
            None => self.infos.push(info),
        }
    }
}

impl Record for Dialogue {
    const TAG: Tag = Tag::new(b"DIAL");

    /// DATA is one byte in most files and four bytes in some older ones.
    fn load(r: &mut Reader) -> Result<Self> {
        r.get_sub_name_is(DATA)?;
        r.get_sub_header()?;
        let kind = match r.sub_size() {
            1 => r.get_t::<u8>()?,
            4 => r.get_t::<i32>()? as u8,
            found => {
                return Err(r.fail(FormatErrorKind::SubSizeMismatch {
                    expected: 1,
                    found,
                }));
            }
        };
        Ok(Self {
            kind: DialogueKind::from_raw(kind),
            ..Default::default()
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hnt(DATA, &self.kind.to_raw());
    }
}

fixed_field! {
    /// INFO DATA (12 bytes).
    pub struct InfoData {
        /// Journal index for journal entries.
        pub unknown1: i32,
        pub disposition: i32,
        pub rank: i8,
        /// 0 = male, 1 = female, -1 = any.
        pub gender: i8,
        pub pc_rank: i8,
        pub unknown2: i8,
    }
}

/// The value a select rule compares against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SelectValue {
    Int(i32),
    Float(f32),
}

/// One condition that must hold for a response to be chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectRule {
    /// Encoded rule: index, function kind, function and comparison, then the variable name.
    pub rule: String,
    pub value: SelectValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum QuestStatus {
    #[default]
    None,
    /// QSTN: names the quest.
    Name,
    /// QSTF: finishes the quest.
    Finished,
    /// QSTR: restarts the quest.
    Restart,
}

/// A single response line belonging to a [`Dialogue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DialInfo {
    pub id: String,
    /// Previous and next response ids; responses form a linked list.
    pub prev: String,
    pub next: String,
    pub data: InfoData,
    pub actor: String,
    pub race: String,
    pub class: String,
    pub npc_faction: String,
    pub cell: String,
    pub pc_faction: String,
    pub sound: String,
    pub response: String,
    pub selects: Vec<SelectRule>,
    pub result_script: String,
    pub quest_status: QuestStatus,
}

impl Record for DialInfo {
    const TAG: Tag = Tag::new(b"INFO");

    fn load(r: &mut Reader) -> Result<Self> {
        let mut info = DialInfo {
            id: r.get_hn_string(INAM)?,
            prev: r.get_hn_string(PNAM)?,
            next: r.get_hn_string(NNAM)?,
            ..Default::default()
        };

        // Some plugins end the record right after NNAM.
        if r.peek_sub_name()?.is_none() {
            return Ok(info);
        }

        info.data = r.get_hnt(DATA)?;
        info.actor = r.get_hno_string(ONAM)?;
        info.race = r.get_hno_string(RNAM)?;
        info.class = r.get_hno_string(CNAM)?;
        info.npc_faction = r.get_hno_string(FNAM)?;
        info.cell = r.get_hno_string(ANAM)?;
        info.pc_faction = r.get_hno_string(DNAM)?;
        info.sound = r.get_hno_string(SNAM)?;
        info.response = r.get_hno_string(NAME)?;

        while r.is_next_sub(SCVR)? {
            let rule = r.get_h_string()?;
            let value = match r.get_sub_name()?.as_bytes() {
                b"INTV" => SelectValue::Int(r.get_ht()?),
                b"FLTV" => SelectValue::Float(r.get_ht()?),
                _ => {
                    return Err(r.fail(FormatErrorKind::UnexpectedSubrecord {
                        expected: INTV,
                        found: r.sub_name(),
                    }));
                }
            };
            info.selects.push(SelectRule { rule, value });
        }

        info.result_script = r.get_hno_string(BNAM)?;

        if let Some(tag) = r.peek_sub_name()? {
            let status = if tag == QSTN {
                QuestStatus::Name
            } else if tag == QSTF {
                QuestStatus::Finished
            } else if tag == QSTR {
                QuestStatus::Restart
            } else {
                QuestStatus::None
            };
            if status != QuestStatus::None {
                r.get_sub_name()?;
                r.skip_h_sub()?;
                info.quest_status = status;
            }
        }

        Ok(info)
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(INAM, &self.id);
        w.write_hn_c_string(PNAM, &self.prev);
        w.write_hn_c_string(NNAM, &self.next);
        w.write_hnt(DATA, &self.data);
        w.write_hno_c_string(ONAM, &self.actor);
        w.write_hno_c_string(RNAM, &self.race);
        w.write_hno_c_string(CNAM, &self.class);
        w.write_hno_c_string(FNAM, &self.npc_faction);
        w.write_hno_c_string(ANAM, &self.cell);
        w.write_hno_c_string(DNAM, &self.pc_faction);
        w.write_hno_c_string(SNAM, &self.sound);
        w.write_hno_string(NAME, &self.response);
        for select in &self.selects {
            w.write_hn_c_string(SCVR, &select.rule);
            match select.value {
                SelectValue::Int(v) => w.write_hnt(INTV, &v),
                SelectValue::Float(v) => w.write_hnt(FLTV, &v),
            }
        }
        w.write_hno_string(BNAM, &self.result_script);
        let marker = match self.quest_status {
            QuestStatus::None => None,
            QuestStatus::Name => Some(QSTN),
            QuestStatus::Finished => Some(QSTF),
            QuestStatus::Restart => Some(QSTR),
        };
        if let Some(tag) = marker {
            w.write_hnt(tag, &1u8);
        }
    }
}
