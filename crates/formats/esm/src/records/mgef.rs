use serde::Serialize;

use crate::error::Result;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{DESC, INDX, ITEX};
use crate::tag::Tag;
use crate::writer::Writer;

const MEDT: Tag = Tag::new(b"MEDT");
const PTEX: Tag = Tag::new(b"PTEX");
const BSND: Tag = Tag::new(b"BSND");
const CSND: Tag = Tag::new(b"CSND");
const HSND: Tag = Tag::new(b"HSND");
const ASND: Tag = Tag::new(b"ASND");
const CVFX: Tag = Tag::new(b"CVFX");
const BVFX: Tag = Tag::new(b"BVFX");
const HVFX: Tag = Tag::new(b"HVFX");
const AVFX: Tag = Tag::new(b"AVFX");

/// Number of hardcoded magic effects.
pub const LENGTH: i32 = 143;

fixed_field! {
    /// MEDT (36 bytes).
    pub struct MagicEffectData {
        /// Skill index of the school.
        pub school: i32,
        pub base_cost: f32,
        pub flags: i32,
        /// Glow colour for enchanted items.
        pub red: i32,
        pub green: i32,
        pub blue: i32,
        pub speed: f32,
        pub size: f32,
        pub size_cap: f32,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MagicEffect {
    pub index: i32,
    pub data: MagicEffectData,
    pub icon: String,
    pub particle: String,
    pub bolt_sound: String,
    pub cast_sound: String,
    pub hit_sound: String,
    pub area_sound: String,
    pub casting: String,
    pub bolt: String,
    pub hit: String,
    pub area: String,
    pub description: String,
}

impl MagicEffect {
    pub const TARGET_SKILL: i32 = 0x1;
    pub const TARGET_ATTRIBUTE: i32 = 0x2;
    pub const NO_DURATION: i32 = 0x4;
    pub const NO_MAGNITUDE: i32 = 0x8;
    pub const HARMFUL: i32 = 0x10;
    pub const CONTINUOUS_VFX: i32 = 0x20;
    pub const CAST_SELF: i32 = 0x40;
    pub const CAST_TOUCH: i32 = 0x80;
    pub const CAST_TARGET: i32 = 0x100;
    pub const ALLOW_SPELLMAKING: i32 = 0x200;
    pub const ALLOW_ENCHANTING: i32 = 0x400;
    pub const NEGATIVE_LIGHT: i32 = 0x800;
}

impl Record for MagicEffect {
    const TAG: Tag = Tag::new(b"MGEF");

    fn load(r: &mut Reader) -> Result<Self> {
        let mut effect = MagicEffect {
            index: r.get_hnt(INDX)?,
            data: r.get_hnt_sized(MEDT, 36)?,
            ..Default::default()
        };

        while r.peek_sub_name()?.is_some() {
            let tag = r.get_sub_name()?;
            let slot = match tag.as_bytes() {
                b"ITEX" => &mut effect.icon,
                b"PTEX" => &mut effect.particle,
                b"BSND" => &mut effect.bolt_sound,
                b"CSND" => &mut effect.cast_sound,
                b"HSND" => &mut effect.hit_sound,
                b"ASND" => &mut effect.area_sound,
                b"CVFX" => &mut effect.casting,
                b"BVFX" => &mut effect.bolt,
                b"HVFX" => &mut effect.hit,
                b"AVFX" => &mut effect.area,
                b"DESC" => &mut effect.description,
                _ => {
                    log::debug!("{}: skipping {tag} in magic effect {}", r.name(), effect.index);
                    r.skip_h_sub()?;
                    continue;
                }
            };
            *slot = r.get_h_string()?;
        }

        Ok(effect)
    }

    fn save(&self, w: &mut Writer) {
        w.write_hnt(INDX, &self.index);
        w.write_hnt(MEDT, &self.data);
        w.write_hno_c_string(ITEX, &self.icon);
        w.write_hno_c_string(PTEX, &self.particle);
        w.write_hno_c_string(BSND, &self.bolt_sound);
        w.write_hno_c_string(CSND, &self.cast_sound);
        w.write_hno_c_string(HSND, &self.hit_sound);
        w.write_hno_c_string(ASND, &self.area_sound);
        w.write_hno_c_string(CVFX, &self.casting);
        w.write_hno_c_string(BVFX, &self.bolt);
        w.write_hno_c_string(HVFX, &self.hit);
        w.write_hno_c_string(AVFX, &self.area);
        w.write_hno_string(DESC, &self.description);
    }
}
