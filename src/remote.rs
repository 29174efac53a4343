use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::Result;
use crate::types::DeviceStatus;

/// Receipt for a cloud authentication. The remote handle keeps the live
/// credential itself; the adapter holds the receipt to govern renewal
/// cadence from its creation time.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    created: Instant,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            created: Instant::now(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }
}

/// Partial operation change in the vendor's vocabulary. Absent fields are
/// left untouched by the cloud service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ac_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_temp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shabat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifeel: Option<bool>,
}

/// Narrow interface to the vendor cloud client. Turning the unit off is a
/// distinct remote call from changing its mode, per the cloud API.
#[allow(async_fn_in_trait)]
pub trait RemoteDevice {
    async fn renew_session(&mut self) -> Result<Session>;
    async fn fetch_status(&mut self) -> Result<DeviceStatus>;
    async fn modify_operation(&mut self, patch: &OperationPatch) -> Result<()>;
    async fn turn_off(&mut self) -> Result<()>;
}
