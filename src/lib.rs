mod adapter;
mod error;
mod logger;
mod mapping;
mod remote;
mod types;

pub use adapter::{
    ClimateAdapter, ClimateAdapterBuilder, MAX_TEMP, MIN_TEMP, TARGET_TEMP_STEP,
};
pub use error::{Error, Result};
pub use logger::CommandLogMode;
pub use mapping::{PRESET_NONE, PresetFlags, preset_labels};
pub use remote::{OperationPatch, RemoteDevice, Session};
pub use types::*;
