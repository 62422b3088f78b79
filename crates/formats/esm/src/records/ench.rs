use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::effects::EffectList;
use crate::tag::Tag;
use crate::writer::Writer;

const ENDT: Tag = Tag::new(b"ENDT");

fixed_field! {
    pub struct EnchantmentData {
        /// 0 = cast once, 1 = cast when strikes, 2 = cast when used, 3 = constant effect.
        pub kind: i32,
        pub cost: i32,
        pub charge: i32,
        pub auto_calc: i32,
    }
}

/// Enchantment applied to items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enchantment {
    pub data: EnchantmentData,
    pub effects: EffectList,
}

impl Record for Enchantment {
    const TAG: Tag = Tag::new(b"ENCH");

    fn load(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            data: r.get_hnt_sized(ENDT, 16)?,
            effects: EffectList::load(r)?,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hnt(ENDT, &self.data);
        self.effects.save(w);
    }
}
