use crate::types::{FanMode, HvacMode};

// Single source of truth for both lookup directions. STBY only appears on
// reads; commanding Off goes through the dedicated turn-off call.
const MODE_CODES: &[(HvacMode, &str)] = &[
    (HvacMode::Off, "STBY"),
    (HvacMode::Cool, "COOL"),
    (HvacMode::FanOnly, "FAN"),
    (HvacMode::Dry, "DRY"),
    (HvacMode::Heat, "HEAT"),
    (HvacMode::HeatCool, "AUTO"),
];

// FanMode::Off is deliberately absent: it is the off sentinel, not a speed
// the device accepts.
const FAN_CODES: &[(FanMode, &str)] = &[
    (FanMode::Low, "LOW"),
    (FanMode::Medium, "MED"),
    (FanMode::High, "HIGH"),
    (FanMode::Auto, "AUTO"),
];

impl HvacMode {
    pub fn from_remote_code(code: &str) -> Option<Self> {
        MODE_CODES.iter().find(|(_, c)| *c == code).map(|(m, _)| *m)
    }

    pub fn remote_code(self) -> Option<&'static str> {
        MODE_CODES.iter().find(|(m, _)| *m == self).map(|(_, c)| *c)
    }
}

impl FanMode {
    pub fn from_remote_code(code: &str) -> Option<Self> {
        FAN_CODES.iter().find(|(_, c)| *c == code).map(|(m, _)| *m)
    }

    pub fn remote_code(self) -> Option<&'static str> {
        FAN_CODES.iter().find(|(m, _)| *m == self).map(|(_, c)| *c)
    }
}

/// Label reported (and accepted) when no preset is active.
pub const PRESET_NONE: &str = "None";

const PRESET_COMPONENTS: &[(&str, u8)] = &[
    ("Shabat", PresetFlags::SHABAT),
    ("Sleep", PresetFlags::SLEEP),
    ("IFeel", PresetFlags::IFEEL),
];

/// Independent device features packed as bit flags by the cloud service.
/// The three flags combine freely into eight observable states, each with
/// a canonical label ("Shabat, Sleep" for 0x3, "None" for 0x0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresetFlags {
    bits: u8,
}

impl PresetFlags {
    pub const SHABAT: u8 = 0x1;
    pub const SLEEP: u8 = 0x2;
    pub const IFEEL: u8 = 0x4;

    const ALL: u8 = Self::SHABAT | Self::SLEEP | Self::IFEEL;

    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Bits outside the three known flags mean a vendor feature this
    /// adapter does not understand.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !Self::ALL == 0).then_some(Self { bits })
    }

    pub fn bits(self) -> u8 {
        self.bits
    }

    pub fn shabat(self) -> bool {
        self.bits & Self::SHABAT != 0
    }

    pub fn sleep(self) -> bool {
        self.bits & Self::SLEEP != 0
    }

    pub fn ifeel(self) -> bool {
        self.bits & Self::IFEEL != 0
    }

    /// Canonical label: set component names in table order, comma joined.
    pub fn label(self) -> String {
        if self.bits == 0 {
            return PRESET_NONE.to_string();
        }
        PRESET_COMPONENTS
            .iter()
            .filter(|(_, bit)| self.bits & bit != 0)
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Decompose a requested label into flags by case-insensitive substring
    /// containment of each component name. A label that names no component
    /// and is not "None" has no remote encoding.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.trim().eq_ignore_ascii_case(PRESET_NONE) {
            return Some(Self::empty());
        }
        let lowered = label.to_lowercase();
        let mut bits = 0;
        for (name, bit) in PRESET_COMPONENTS {
            if lowered.contains(&name.to_lowercase()) {
                bits |= bit;
            }
        }
        (bits != 0).then_some(Self { bits })
    }
}

/// All eight preset labels, in bit order, for the advertised choice list.
pub fn preset_labels() -> Vec<String> {
    (0..=PresetFlags::ALL)
        .filter_map(PresetFlags::from_bits)
        .map(PresetFlags::label)
        .collect()
}
