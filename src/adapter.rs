use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, trace};

use crate::logger::{CommandLogMode, CommandLogger};
use crate::mapping::{PRESET_NONE, PresetFlags, preset_labels};
use crate::remote::{OperationPatch, RemoteDevice, Session};
use crate::types::{DeviceIdentity, DeviceStatus, FAN_MODES, FanMode, HVAC_MODES, HvacMode};
use crate::{Error, Result};

/// Setpoint bounds and step advertised to the host, degrees Celsius.
pub const MIN_TEMP: i32 = 16;
pub const MAX_TEMP: i32 = 30;
pub const TARGET_TEMP_STEP: i32 = 1;

const DEFAULT_SESSION_INTERVAL: Duration = Duration::from_secs(20);
const DEFAULT_CONVERGENCE_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_CONVERGENCE_POLLS: u32 = 2;

pub struct ClimateAdapterBuilder<D> {
    name: String,
    identity: DeviceIdentity,
    device: D,
    session_interval: Duration,
    convergence_delay: Duration,
    convergence_polls: u32,
    log_mode: Option<CommandLogMode>,
    log_path: Option<String>,
}

impl<D: RemoteDevice> ClimateAdapterBuilder<D> {
    pub fn new(name: impl Into<String>, identity: DeviceIdentity, device: D) -> Self {
        Self {
            name: name.into(),
            identity,
            device,
            session_interval: DEFAULT_SESSION_INTERVAL,
            convergence_delay: DEFAULT_CONVERGENCE_DELAY,
            convergence_polls: DEFAULT_CONVERGENCE_POLLS,
            log_mode: None,
            log_path: None,
        }
    }

    /// Maximum session age before the next remote call forces a renewal.
    pub fn session_interval(mut self, interval: Duration) -> Self {
        self.session_interval = interval;
        self
    }

    /// Delay between and count of the post-command convergence polls.
    pub fn convergence(mut self, delay: Duration, polls: u32) -> Self {
        self.convergence_delay = delay;
        self.convergence_polls = polls;
        self
    }

    pub fn command_log(mut self, mode: CommandLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> ClimateAdapter<D> {
        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => {
                Some(CommandLogger::new(mode, &path).expect("failed to open command log"))
            }
            _ => None,
        };

        ClimateAdapter {
            name: self.name,
            identity: self.identity,
            device: self.device,
            session: None,
            session_interval: self.session_interval,
            status: None,
            convergence_delay: self.convergence_delay,
            convergence_polls: self.convergence_polls,
            logger,
        }
    }
}

/// One entity per physical unit: owns the remote handle, the session
/// receipt and the last fetched status. The host serializes calls, so
/// there is no interior locking.
pub struct ClimateAdapter<D: RemoteDevice> {
    name: String,
    identity: DeviceIdentity,
    device: D,
    session: Option<Session>,
    session_interval: Duration,
    status: Option<DeviceStatus>,
    convergence_delay: Duration,
    convergence_polls: u32,
    logger: Option<CommandLogger>,
}

impl<D: RemoteDevice> ClimateAdapter<D> {
    pub fn builder(
        name: impl Into<String>,
        identity: DeviceIdentity,
        device: D,
    ) -> ClimateAdapterBuilder<D> {
        ClimateAdapterBuilder::new(name, identity, device)
    }

    // -- Identity and capabilities --

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> String {
        format!("{}_climate", self.name)
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        HVAC_MODES
    }

    pub fn fan_modes(&self) -> &'static [FanMode] {
        FAN_MODES
    }

    pub fn preset_modes(&self) -> Vec<String> {
        preset_labels()
    }

    // -- Read accessors --

    /// Latest fetched snapshot, raw vendor vocabulary. `None` until the
    /// first successful refresh.
    pub fn status(&self) -> Option<&DeviceStatus> {
        self.status.as_ref()
    }

    pub fn is_on(&self) -> Option<bool> {
        self.status.as_ref().map(|s| s.is_on)
    }

    /// Whole degrees; reported whether the unit is on or off.
    pub fn current_temperature(&self) -> Option<i32> {
        self.status.as_ref()?.current_temp.map(|t| t as i32)
    }

    pub fn target_temperature(&self) -> Option<i32> {
        self.status.as_ref()?.target_temp.map(|t| t as i32)
    }

    /// `Ok(None)` until a status has been fetched; `Off` while the unit is
    /// powered down, whatever the stale payload carries.
    pub fn hvac_mode(&self) -> Result<Option<HvacMode>> {
        let Some(status) = &self.status else {
            return Ok(None);
        };
        if !status.is_on {
            return Ok(Some(HvacMode::Off));
        }
        match HvacMode::from_remote_code(&status.ac_mode) {
            Some(mode) => Ok(Some(mode)),
            None => Err(Error::UnknownRemoteCode {
                field: "ac_mode",
                code: status.ac_mode.clone(),
            }),
        }
    }

    pub fn fan_mode(&self) -> Result<Option<FanMode>> {
        let Some(status) = &self.status else {
            return Ok(None);
        };
        if !status.is_on {
            return Ok(Some(FanMode::Off));
        }
        match FanMode::from_remote_code(&status.fan_speed) {
            Some(fan) => Ok(Some(fan)),
            None => Err(Error::UnknownRemoteCode {
                field: "fan_speed",
                code: status.fan_speed.clone(),
            }),
        }
    }

    /// Canonical preset label; "None" while the unit is off or no preset
    /// is active.
    pub fn preset_mode(&self) -> Result<Option<String>> {
        let Some(status) = &self.status else {
            return Ok(None);
        };
        if !status.is_on {
            return Ok(Some(PRESET_NONE.to_string()));
        }
        match PresetFlags::from_bits(status.preset_bits) {
            Some(flags) => Ok(Some(flags.label())),
            None => Err(Error::UnknownRemoteCode {
                field: "preset_bits",
                code: status.preset_bits.to_string(),
            }),
        }
    }

    // -- Polling --

    /// Fetch a fresh snapshot, renewing the session first when stale. The
    /// previous snapshot is replaced wholesale, never merged.
    pub async fn refresh(&mut self) -> Result<()> {
        self.renew_session_if_stale().await?;
        let status = self.device.fetch_status().await?;
        trace!(ac_id = %self.identity.ac_id, is_on = status.is_on, "status updated");
        if let Some(ref mut logger) = self.logger {
            logger.log_status(&status);
        }
        self.status = Some(status);
        Ok(())
    }

    // -- Commands --

    /// Set the target temperature, whole degrees Celsius.
    pub async fn set_target_temperature(&mut self, temp: i32) -> Result<()> {
        debug!(temp, "setting target temperature");
        let patch = OperationPatch {
            target_temp: Some(temp),
            ..Default::default()
        };
        self.issue("set_target_temperature", patch).await
    }

    /// Switch operating mode. `Off` routes to the dedicated power-off call.
    pub async fn set_hvac_mode(&mut self, mode: HvacMode) -> Result<()> {
        if mode == HvacMode::Off {
            debug!("turning off for hvac mode off");
            return self.turn_off().await;
        }
        let code = mode.remote_code().ok_or_else(|| Error::Unmapped {
            field: "hvac_mode",
            value: format!("{mode:?}"),
        })?;
        debug!(?mode, code, "setting hvac mode");
        let patch = OperationPatch {
            ac_mode: Some(code.to_string()),
            ..Default::default()
        };
        self.issue("set_hvac_mode", patch).await
    }

    pub async fn set_fan_mode(&mut self, fan: FanMode) -> Result<()> {
        let code = fan.remote_code().ok_or_else(|| Error::Unmapped {
            field: "fan_mode",
            value: format!("{fan:?}"),
        })?;
        debug!(?fan, code, "setting fan mode");
        let patch = OperationPatch {
            fan_speed: Some(code.to_string()),
            ..Default::default()
        };
        self.issue("set_fan_mode", patch).await
    }

    /// Apply a preset by label. All three flags go out explicitly so a
    /// composite label replaces the previous combination outright.
    pub async fn set_preset_mode(&mut self, label: &str) -> Result<()> {
        let flags = PresetFlags::from_label(label).ok_or_else(|| Error::Unmapped {
            field: "preset_mode",
            value: label.to_string(),
        })?;
        debug!(label, bits = flags.bits(), "setting preset");
        self.issue("set_preset_mode", preset_patch(flags)).await
    }

    /// Power the unit down. Distinct remote call from a mode change.
    pub async fn turn_off(&mut self) -> Result<()> {
        self.renew_session_if_stale().await?;
        debug!(ac_id = %self.identity.ac_id, "turning off");
        if let Some(ref mut logger) = self.logger {
            logger.log_command("turn_off", None);
        }
        self.device.turn_off().await?;
        self.converge().await
    }

    // -- Helpers --

    async fn issue(&mut self, action: &str, patch: OperationPatch) -> Result<()> {
        self.renew_session_if_stale().await?;
        if let Some(ref mut logger) = self.logger {
            logger.log_command(action, Some(&patch));
        }
        self.device.modify_operation(&patch).await?;
        self.converge().await
    }

    async fn renew_session_if_stale(&mut self) -> Result<()> {
        let stale = match &self.session {
            Some(session) => session.age() > self.session_interval,
            None => true,
        };
        if stale {
            debug!(ac_id = %self.identity.ac_id, "renewing session");
            let session = self.device.renew_session().await?;
            if let Some(ref mut logger) = self.logger {
                logger.log_session_renewal();
            }
            self.session = Some(session);
        }
        Ok(())
    }

    /// Best-effort convergence: the cloud service confirms nothing
    /// synchronously, so wait out its propagation lag and re-poll a couple
    /// of times. Poll failures propagate.
    async fn converge(&mut self) -> Result<()> {
        for _ in 0..self.convergence_polls {
            sleep(self.convergence_delay).await;
            self.refresh().await?;
        }
        Ok(())
    }
}

fn preset_patch(flags: PresetFlags) -> OperationPatch {
    OperationPatch {
        shabat: Some(flags.shabat()),
        sleep: Some(flags.sleep()),
        ifeel: Some(flags.ifeel()),
        ..Default::default()
    }
}
