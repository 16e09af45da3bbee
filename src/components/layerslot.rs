//! Body and equipment layer slots of a composite.
//!
//! The discriminant of each slot is the layer type id used by direction
//! descriptors and doubles as an index into per-slot arrays.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LayerSlot {
    #[serde(rename = "HD")]
    Head = 0,
    #[serde(rename = "TR")]
    Torso = 1,
    #[serde(rename = "LG")]
    Legs = 2,
    #[serde(rename = "RA")]
    RightArm = 3,
    #[serde(rename = "LA")]
    LeftArm = 4,
    #[serde(rename = "RH")]
    RightHand = 5,
    #[serde(rename = "LH")]
    LeftHand = 6,
    #[serde(rename = "SH")]
    Shield = 7,
    #[serde(rename = "S1")]
    Special1 = 8,
    #[serde(rename = "S2")]
    Special2 = 9,
    #[serde(rename = "S3")]
    Special3 = 10,
    #[serde(rename = "S4")]
    Special4 = 11,
    #[serde(rename = "S5")]
    Special5 = 12,
    #[serde(rename = "S6")]
    Special6 = 13,
    #[serde(rename = "S7")]
    Special7 = 14,
    #[serde(rename = "S8")]
    Special8 = 15,
}

impl LayerSlot {
    /// Total number of layer slots.
    pub const COUNT: usize = 16;

    /// All slots in type id order.
    pub const ALL: [LayerSlot; Self::COUNT] = [
        Self::Head,
        Self::Torso,
        Self::Legs,
        Self::RightArm,
        Self::LeftArm,
        Self::RightHand,
        Self::LeftHand,
        Self::Shield,
        Self::Special1,
        Self::Special2,
        Self::Special3,
        Self::Special4,
        Self::Special5,
        Self::Special6,
        Self::Special7,
        Self::Special8,
    ];

    /// Convert a descriptor layer type id. Returns None if out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Two-letter key used in layer directory and file names.
    pub fn key(self) -> &'static str {
        match self {
            Self::Head => "HD",
            Self::Torso => "TR",
            Self::Legs => "LG",
            Self::RightArm => "RA",
            Self::LeftArm => "LA",
            Self::RightHand => "RH",
            Self::LeftHand => "LH",
            Self::Shield => "SH",
            Self::Special1 => "S1",
            Self::Special2 => "S2",
            Self::Special3 => "S3",
            Self::Special4 => "S4",
            Self::Special5 => "S5",
            Self::Special6 => "S6",
            Self::Special7 => "S7",
            Self::Special8 => "S8",
        }
    }
}
