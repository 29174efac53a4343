use std::sync::{Arc, Mutex};
use std::time::Duration;

use electra_ac::{
    ClimateAdapter, DeviceIdentity, DeviceStatus, Error, FanMode, HvacMode, OperationPatch,
    RemoteDevice, Result, Session,
};

#[derive(Default)]
struct CallLog {
    renews: u32,
    fetches: u32,
    modifies: Vec<OperationPatch>,
    turn_offs: u32,
}

#[derive(Clone)]
struct MockDevice {
    calls: Arc<Mutex<CallLog>>,
    status: Arc<Mutex<DeviceStatus>>,
    fail_renew: bool,
    fail_fetch: bool,
    fail_modify: bool,
}

impl MockDevice {
    fn new(status: DeviceStatus) -> Self {
        Self {
            calls: Arc::new(Mutex::new(CallLog::default())),
            status: Arc::new(Mutex::new(status)),
            fail_renew: false,
            fail_fetch: false,
            fail_modify: false,
        }
    }
}

impl RemoteDevice for MockDevice {
    async fn renew_session(&mut self) -> Result<Session> {
        self.calls.lock().unwrap().renews += 1;
        if self.fail_renew {
            return Err(Error::Auth("token rejected".into()));
        }
        Ok(Session::new("sid-1"))
    }

    async fn fetch_status(&mut self) -> Result<DeviceStatus> {
        self.calls.lock().unwrap().fetches += 1;
        if self.fail_fetch {
            return Err(Error::Network("gateway timeout".into()));
        }
        Ok(self.status.lock().unwrap().clone())
    }

    async fn modify_operation(&mut self, patch: &OperationPatch) -> Result<()> {
        self.calls.lock().unwrap().modifies.push(patch.clone());
        if self.fail_modify {
            return Err(Error::Network("gateway timeout".into()));
        }
        Ok(())
    }

    async fn turn_off(&mut self) -> Result<()> {
        self.calls.lock().unwrap().turn_offs += 1;
        Ok(())
    }
}

fn identity() -> DeviceIdentity {
    DeviceIdentity {
        imei: "2b9500000000000000000000".into(),
        token: "secret-token".into(),
        ac_id: "77".into(),
    }
}

fn cooling_status() -> DeviceStatus {
    DeviceStatus {
        is_on: true,
        current_temp: Some(26.0),
        target_temp: Some(23.0),
        ac_mode: "COOL".into(),
        fan_speed: "AUTO".into(),
        preset_bits: 0,
    }
}

fn adapter(device: MockDevice) -> ClimateAdapter<MockDevice> {
    ClimateAdapter::builder("living_room", identity(), device).build()
}

#[tokio::test]
async fn refresh_translates_snapshot() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = adapter(device.clone());

    adapter.refresh().await.expect("refresh should succeed");

    assert_eq!(adapter.hvac_mode().unwrap(), Some(HvacMode::Cool));
    assert_eq!(adapter.fan_mode().unwrap(), Some(FanMode::Auto));
    assert_eq!(adapter.preset_mode().unwrap().as_deref(), Some("None"));
    assert_eq!(adapter.current_temperature(), Some(26));
    assert_eq!(adapter.target_temperature(), Some(23));

    let calls = device.calls.lock().unwrap();
    assert_eq!(calls.renews, 1);
    assert_eq!(calls.fetches, 1);
}

#[tokio::test(start_paused = true)]
async fn set_hvac_mode_sends_remote_code_and_converges() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = adapter(device.clone());

    adapter
        .set_hvac_mode(HvacMode::Heat)
        .await
        .expect("command should succeed");

    let calls = device.calls.lock().unwrap();
    assert_eq!(calls.renews, 1);
    assert_eq!(calls.modifies.len(), 1);
    assert_eq!(calls.modifies[0].ac_mode.as_deref(), Some("HEAT"));
    assert_eq!(calls.modifies[0].fan_speed, None);
    assert_eq!(calls.fetches, 2, "two convergence polls expected");
    assert_eq!(calls.turn_offs, 0);
}

#[tokio::test(start_paused = true)]
async fn set_hvac_mode_off_routes_to_turn_off() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = adapter(device.clone());

    adapter.set_hvac_mode(HvacMode::Off).await.unwrap();

    let calls = device.calls.lock().unwrap();
    assert_eq!(calls.turn_offs, 1);
    assert!(calls.modifies.is_empty());
    assert_eq!(calls.fetches, 2);
}

#[tokio::test]
async fn fan_off_is_unmapped_and_issues_no_remote_call() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = adapter(device.clone());

    let err = adapter.set_fan_mode(FanMode::Off).await.unwrap_err();
    assert!(matches!(err, Error::Unmapped { field: "fan_mode", .. }));

    let calls = device.calls.lock().unwrap();
    assert_eq!(calls.renews, 0);
    assert!(calls.modifies.is_empty());
    assert_eq!(calls.fetches, 0);
}

#[tokio::test]
async fn unknown_preset_label_is_unmapped() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = adapter(device.clone());

    let err = adapter.set_preset_mode("Turbo").await.unwrap_err();
    assert!(matches!(err, Error::Unmapped { field: "preset_mode", .. }));
    assert_eq!(device.calls.lock().unwrap().renews, 0);
}

#[tokio::test(start_paused = true)]
async fn preset_label_decomposes_into_flags() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = adapter(device.clone());

    adapter.set_preset_mode("Shabat, Sleep").await.unwrap();

    let calls = device.calls.lock().unwrap();
    assert_eq!(calls.modifies.len(), 1);
    let patch = &calls.modifies[0];
    assert_eq!(patch.shabat, Some(true));
    assert_eq!(patch.sleep, Some(true));
    assert_eq!(patch.ifeel, Some(false));
    assert_eq!(patch.ac_mode, None);
}

#[tokio::test(start_paused = true)]
async fn session_renewed_once_then_skipped_within_interval() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = adapter(device.clone());

    adapter.refresh().await.unwrap();
    adapter.refresh().await.unwrap();
    assert_eq!(device.calls.lock().unwrap().renews, 1);

    // age == interval is not yet stale
    tokio::time::advance(Duration::from_secs(20)).await;
    adapter.refresh().await.unwrap();
    assert_eq!(device.calls.lock().unwrap().renews, 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    adapter.refresh().await.unwrap();
    assert_eq!(device.calls.lock().unwrap().renews, 2);
}

#[tokio::test(start_paused = true)]
async fn convergence_polls_check_session_staleness() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = ClimateAdapter::builder("living_room", identity(), device.clone())
        .session_interval(Duration::from_secs(1))
        .convergence(Duration::from_secs(2), 2)
        .build();

    adapter.set_target_temperature(22).await.unwrap();

    // one renewal for the command, one per poll after the 2s waits
    let calls = device.calls.lock().unwrap();
    assert_eq!(calls.renews, 3);
    assert_eq!(calls.fetches, 2);
}

#[tokio::test(start_paused = true)]
async fn convergence_waits_the_configured_delay() {
    let device = MockDevice::new(cooling_status());
    let mut adapter = ClimateAdapter::builder("living_room", identity(), device.clone())
        .convergence(Duration::from_secs(3), 2)
        .build();

    let start = tokio::time::Instant::now();
    adapter.set_target_temperature(22).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn convergence_picks_up_post_command_state() {
    let device = MockDevice::new(DeviceStatus {
        is_on: false,
        ..cooling_status()
    });
    let mut adapter = adapter(device.clone());

    adapter.refresh().await.unwrap();
    assert_eq!(adapter.hvac_mode().unwrap(), Some(HvacMode::Off));

    // the service flips the unit on before the convergence polls land
    *device.status.lock().unwrap() = DeviceStatus {
        ac_mode: "HEAT".into(),
        ..cooling_status()
    };
    adapter.set_hvac_mode(HvacMode::Heat).await.unwrap();

    assert_eq!(adapter.hvac_mode().unwrap(), Some(HvacMode::Heat));
}

#[tokio::test]
async fn fetch_failure_propagates_and_keeps_cache_empty() {
    let mut device = MockDevice::new(cooling_status());
    device.fail_fetch = true;
    let mut adapter = adapter(device.clone());

    let err = adapter.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert!(adapter.status().is_none());
    assert!(matches!(adapter.hvac_mode(), Ok(None)));
}

#[tokio::test]
async fn auth_failure_propagates_from_renewal() {
    let mut device = MockDevice::new(cooling_status());
    device.fail_renew = true;
    let mut adapter = adapter(device.clone());

    let err = adapter.set_hvac_mode(HvacMode::Cool).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));

    let calls = device.calls.lock().unwrap();
    assert!(calls.modifies.is_empty(), "no mutation after failed renewal");
    assert_eq!(calls.fetches, 0);
}

#[tokio::test]
async fn modify_failure_propagates_and_skips_convergence() {
    let mut device = MockDevice::new(cooling_status());
    device.fail_modify = true;
    let mut adapter = adapter(device.clone());

    let err = adapter.set_target_temperature(22).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));

    let calls = device.calls.lock().unwrap();
    assert_eq!(calls.modifies.len(), 1);
    assert_eq!(calls.fetches, 0, "no convergence after a failed command");
}
