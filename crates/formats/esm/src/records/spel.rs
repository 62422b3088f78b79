use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::effects::EffectList;
use crate::records::sub::FNAM;
use crate::tag::Tag;
use crate::writer::Writer;

const SPDT: Tag = Tag::new(b"SPDT");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpellKind {
    Spell,
    Ability,
    Blight,
    Disease,
    Curse,
    Power,
}

impl SpellKind {
    pub fn from_raw(raw: i32) -> Option<Self> {
        use SpellKind::*;
        const ALL: [SpellKind; 6] = [Spell, Ability, Blight, Disease, Curse, Power];
        usize::try_from(raw).ok().and_then(|i| ALL.get(i).copied())
    }
}

fixed_field! {
    pub struct SpellData {
        pub kind: i32,
        pub cost: i32,
        pub flags: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Spell {
    pub name: String,
    pub data: SpellData,
    pub effects: EffectList,
}

impl Spell {
    pub const AUTOCALC: i32 = 0x01;
    pub const PC_START: i32 = 0x02;
    pub const ALWAYS: i32 = 0x04;

    pub fn kind(&self) -> Option<SpellKind> {
        SpellKind::from_raw(self.data.kind)
    }
}

impl Record for Spell {
    const TAG: Tag = Tag::new(b"SPEL");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            name: r.get_hno_string(FNAM)?,
            data: r.get_hnt_sized(SPDT, 12)?,
            effects: EffectList::load(r)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hno_c_string(FNAM, &self.name);
        w.write_hnt(SPDT, &self.data);
        self.effects.save(w);
    }
}
