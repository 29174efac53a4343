use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::remote::OperationPatch;
use crate::types::DeviceStatus;

pub enum CommandLogMode {
    /// Commands only.
    Commands,
    /// Commands plus fetched status snapshots and session renewals.
    Full,
}

pub(crate) struct CommandLogger {
    mode: CommandLogMode,
    file: File,
}

impl CommandLogger {
    pub fn new(mode: CommandLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { mode, file })
    }

    pub fn log_command(&mut self, action: &str, patch: Option<&OperationPatch>) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "action": action,
            "patch": patch,
        });
        self.write_line(&entry);
    }

    pub fn log_status(&mut self, status: &DeviceStatus) {
        if let CommandLogMode::Commands = self.mode {
            return;
        }
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "status",
            "body": status,
        });
        self.write_line(&entry);
    }

    // The token itself never reaches the log.
    pub fn log_session_renewal(&mut self) {
        if let CommandLogMode::Commands = self.mode {
            return;
        }
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "session",
            "event": "renewed",
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
