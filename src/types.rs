use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacMode {
    Off,
    Cool,
    FanOnly,
    Dry,
    Heat,
    HeatCool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    Off,
    Auto,
    Low,
    Medium,
    High,
}

/// Modes advertised to the host. `Off` is reachable through `turn_off`.
pub const HVAC_MODES: &[HvacMode] = &[
    HvacMode::Off,
    HvacMode::Cool,
    HvacMode::FanOnly,
    HvacMode::Dry,
    HvacMode::Heat,
    HvacMode::HeatCool,
];

/// Fan speeds advertised to the host. `Off` is a read-only sentinel.
pub const FAN_MODES: &[FanMode] = &[
    FanMode::Off,
    FanMode::Auto,
    FanMode::Low,
    FanMode::Medium,
    FanMode::High,
];

/// Snapshot of the remote device, as reported by the cloud service.
/// Replaced wholesale on every poll; mode and fan speed stay in the
/// vendor's coded vocabulary until a read accessor translates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub is_on: bool,
    pub current_temp: Option<f64>,
    pub target_temp: Option<f64>,
    pub ac_mode: String,
    pub fan_speed: String,
    pub preset_bits: u8,
}

/// Credentials and addressing for one physical unit, passed through to the
/// remote handle untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceIdentity {
    pub imei: String,
    pub token: String,
    pub ac_id: String,
}
