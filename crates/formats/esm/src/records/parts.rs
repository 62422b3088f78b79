use serde::Serialize;

use crate::error::Result;
use crate::reader::Reader;
use crate::records::sub::{BNAM, CNAM, INDX};
use crate::writer::Writer;

/// Body part slot for worn items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum PartSlot {
    Head = 0,
    Hair = 1,
    Neck = 2,
    Cuirass = 3,
    Groin = 4,
    Skirt = 5,
    RightHand = 6,
    LeftHand = 7,
    RightWrist = 8,
    LeftWrist = 9,
    Shield = 10,
    RightForearm = 11,
    LeftForearm = 12,
    RightUpperArm = 13,
    LeftUpperArm = 14,
    RightFoot = 15,
    LeftFoot = 16,
    RightAnkle = 17,
    LeftAnkle = 18,
    RightKnee = 19,
    LeftKnee = 20,
    RightUpperLeg = 21,
    LeftUpperLeg = 22,
    RightPauldron = 23,
    LeftPauldron = 24,
    Weapon = 25,
    Tail = 26,
}

impl PartSlot {
    pub fn from_index(index: u8) -> Option<Self> {
        use PartSlot::*;
        const ALL: [PartSlot; 27] = [
            Head, Hair, Neck, Cuirass, Groin, Skirt, RightHand, LeftHand, RightWrist, LeftWrist,
            Shield, RightForearm, LeftForearm, RightUpperArm, LeftUpperArm, RightFoot, LeftFoot,
            RightAnkle, LeftAnkle, RightKnee, LeftKnee, RightUpperLeg, LeftUpperLeg,
            RightPauldron, LeftPauldron, Weapon, Tail,
        ];
        ALL.get(index as usize).copied()
    }
}

/// Which body part meshes replace a slot when the item is worn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartReference {
    /// Raw slot index, see [`PartSlot`].
    pub part: u8,
    pub male: String,
    pub female: String,
}

impl PartReference {
    pub fn slot(&self) -> Option<PartSlot> {
        PartSlot::from_index(self.part)
    }
}

/// Body part slot to mesh mapping for armor and clothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartReferenceList {
    pub parts: Vec<PartReference>,
}

impl PartReferenceList {
    pub fn load(r: &mut Reader) -> Result<Self> {
        let mut parts = Vec::new();
        while r.is_next_sub(INDX)? {
            let part = r.get_ht::<u8>()?;
            let male = r.get_hno_string(BNAM)?;
            let female = r.get_hno_string(CNAM)?;
            parts.push(PartReference { part, male, female });
        }
        Ok(Self { parts })
    }

    pub fn save(&self, w: &mut Writer) {
        for part in &self.parts {
            w.write_hnt(INDX, &part.part);
            w.write_hno_c_string(BNAM, &part.male);
            w.write_hno_c_string(CNAM, &part.female);
        }
    }
}
