use std::time::Duration;

use electra_ac::{
    ClimateAdapter, DeviceIdentity, DeviceStatus, FanMode, HvacMode, OperationPatch, RemoteDevice,
    Result, Session,
};

/// In-memory stand-in for the cloud client: applies patches to its own
/// status after a short lag, like the real service does.
struct SimulatedDevice {
    status: DeviceStatus,
    pending: Option<OperationPatch>,
}

impl SimulatedDevice {
    fn new() -> Self {
        Self {
            status: DeviceStatus {
                is_on: false,
                current_temp: Some(27.0),
                target_temp: Some(24.0),
                ac_mode: "STBY".into(),
                fan_speed: "AUTO".into(),
                preset_bits: 0,
            },
            pending: None,
        }
    }
}

impl RemoteDevice for SimulatedDevice {
    async fn renew_session(&mut self) -> Result<Session> {
        Ok(Session::new("sim-sid"))
    }

    async fn fetch_status(&mut self) -> Result<DeviceStatus> {
        if let Some(patch) = self.pending.take() {
            self.status.is_on = true;
            if let Some(mode) = patch.ac_mode {
                self.status.ac_mode = mode;
            }
            if let Some(fan) = patch.fan_speed {
                self.status.fan_speed = fan;
            }
            if let Some(temp) = patch.target_temp {
                self.status.target_temp = Some(temp as f64);
            }
            let mut bits = self.status.preset_bits;
            for (flag, bit) in [(patch.shabat, 1u8), (patch.sleep, 2), (patch.ifeel, 4)] {
                match flag {
                    Some(true) => bits |= bit,
                    Some(false) => bits &= !bit,
                    None => {}
                }
            }
            self.status.preset_bits = bits;
        }
        Ok(self.status.clone())
    }

    async fn modify_operation(&mut self, patch: &OperationPatch) -> Result<()> {
        self.pending = Some(patch.clone());
        Ok(())
    }

    async fn turn_off(&mut self) -> Result<()> {
        self.pending = None;
        self.status.is_on = false;
        self.status.ac_mode = "STBY".into();
        Ok(())
    }
}

fn print_state<D: RemoteDevice>(adapter: &ClimateAdapter<D>) {
    println!(
        "[{}] on: {:?} | mode: {:?} | fan: {:?} | preset: {:?} | {:?} -> {:?}\u{00b0}C",
        adapter.name(),
        adapter.is_on(),
        adapter.hvac_mode().ok(),
        adapter.fan_mode().ok(),
        adapter.preset_mode().ok(),
        adapter.current_temperature(),
        adapter.target_temperature(),
    );
}

#[tokio::main]
async fn main() -> electra_ac::Result<()> {
    tracing_subscriber::fmt::init();

    let identity = DeviceIdentity {
        imei: "2b9500000000000000000000".into(),
        token: "demo-token".into(),
        ac_id: "1".into(),
    };
    let mut adapter = ClimateAdapter::builder("demo", identity, SimulatedDevice::new())
        .convergence(Duration::from_millis(200), 2)
        .build();

    adapter.refresh().await?;
    print_state(&adapter);

    println!("-> cool to 22\u{00b0}C, high fan, sleep preset");
    adapter.set_hvac_mode(HvacMode::Cool).await?;
    adapter.set_target_temperature(22).await?;
    adapter.set_fan_mode(FanMode::High).await?;
    adapter.set_preset_mode("Sleep").await?;
    print_state(&adapter);

    println!("-> off");
    adapter.turn_off().await?;
    print_state(&adapter);

    Ok(())
}
