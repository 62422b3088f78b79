use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::parts::PartReferenceList;
use crate::records::sub::{ENAM, FNAM, ITEX, MODL, SCRI};
use crate::tag::Tag;
use crate::writer::Writer;

const AODT: Tag = Tag::new(b"AODT");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArmorKind {
    Helmet,
    Cuirass,
    LeftPauldron,
    RightPauldron,
    Greaves,
    Boots,
    LeftGauntlet,
    RightGauntlet,
    Shield,
    LeftBracer,
    RightBracer,
}

impl ArmorKind {
    pub fn from_raw(raw: i32) -> Option<Self> {
        use ArmorKind::*;
        const ALL: [ArmorKind; 11] = [
            Helmet, Cuirass, LeftPauldron, RightPauldron, Greaves, Boots, LeftGauntlet,
            RightGauntlet, Shield, LeftBracer, RightBracer,
        ];
        usize::try_from(raw).ok().and_then(|i| ALL.get(i).copied())
    }
}

fixed_field! {
    pub struct ArmorData {
        pub kind: i32,
        pub weight: f32,
        pub value: i32,
        pub health: i32,
        pub enchant: i32,
        pub armor: i32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Armor {
    pub model: String,
    pub name: String,
    pub script: String,
    pub data: ArmorData,
    pub icon: String,
    pub parts: PartReferenceList,
    pub enchant: String,
}

impl Armor {
    pub fn kind(&self) -> Option<ArmorKind> {
        ArmorKind::from_raw(self.data.kind)
    }
}

impl Record for Armor {
    const TAG: Tag = Tag::new(b"ARMO");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            model: r.get_hn_string(MODL)?,
            name: r.get_hn_string(FNAM)?,
            script: r.get_hno_string(SCRI)?,
            data: r.get_hnt(AODT)?,
            icon: r.get_hno_string(ITEX)?,
            parts: PartReferenceList::load(r)?,
            enchant: r.get_hno_string(ENAM)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(MODL, &self.model);
        w.write_hn_c_string(FNAM, &self.name);
        w.write_hno_c_string(SCRI, &self.script);
        w.write_hnt(AODT, &self.data);
        w.write_hno_c_string(ITEX, &self.icon);
        self.parts.save(w);
        w.write_hno_c_string(ENAM, &self.enchant);
    }
}
