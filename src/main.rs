//! Stabilization and navigation control core entry point.
//!
//! Wires a [`ControlCore`] running at a fixed 400 Hz against a simulated
//! IMU/GPS/barometer/obstacle feed, and a read-only telemetry WebSocket
//! alongside it. Swapping [`sim::ImuBusSim`]/[`sim::NullPwmSink`]/
//! [`sim::NullGpio`] for real peripheral drivers is the only change needed
//! to run this against actual silicon — `ControlCore` itself never changes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drone_stab_core::config::{Config, DT, LOOP_HZ};
use drone_stab_core::control::ControlCore;
use drone_stab_core::ingest::{IngestHandle, SystemState};
use drone_stab_core::sim::gps::{BaroFeedSim, GpsFeedSim, ObstacleFeedSim};
use drone_stab_core::sim::{ImuBusSim, NullGpio, NullPwmSink};
use drone_stab_core::telemetry::{self, FlightTelemetry, TelemetryServer};
use drone_stab_core::types::FlightMode;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drone_stab_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!("starting stabilization and navigation control core");

    let config = Config::default();
    let state = SystemState::new();
    let handle = IngestHandle::new(state.clone());

    let mut imu_bus = ImuBusSim::new();
    imu_bus.init().map_err(anyhow::Error::from)?;

    handle.set_home(37.0, -122.0, 0.0);
    handle.set_flight_mode(FlightMode::Stabilize);

    let (telemetry_tx, _rx) = broadcast::channel::<FlightTelemetry>(100);
    let telemetry_tx = Arc::new(telemetry_tx);

    let control_handle = {
        let state = state.clone();
        let gains = config.gains;
        tokio::spawn(async move {
            let mut core = ControlCore::new(&gains);
            let mut pwm = NullPwmSink::default();
            let mut gpio = NullGpio::default();
            let mut ticker = tokio::time::interval(Duration::from_micros((DT * 1_000_000.0) as u64));
            // §4.K: absolute wake-up schedule, no catch-up on overrun — a
            // late tick fires once immediately and the schedule re-anchors
            // to the next boundary, instead of bursting through every
            // missed tick.
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                core.tick(&state, &mut imu_bus, &mut pwm, &mut gpio, DT);
            }
        })
    };

    let gps_handle = {
        let handle = handle.clone();
        tokio::spawn(async move {
            let mut gps = GpsFeedSim::new(37.0, -122.0);
            let mut baro = BaroFeedSim::new(0.0);
            let obstacle = ObstacleFeedSim::clear();
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            loop {
                ticker.tick().await;
                gps.step(&handle);
                baro.step(&handle, state.command_snapshot().throttle_us, 1.0);
                obstacle.push(&handle);
            }
        })
    };

    let publish_handle = {
        let handle = handle.clone();
        let tx = telemetry_tx.clone();
        tokio::spawn(telemetry::server::publish_loop(handle, tx, 10))
    };

    let server_handle = {
        let server = TelemetryServer::new(config.telemetry_port, telemetry_tx.clone());
        tokio::spawn(async move {
            if let Err(e) = server.run().await {
                error!("telemetry server error: {e}");
            }
        })
    };

    info!("control loop running at {LOOP_HZ} Hz, telemetry on ws://127.0.0.1:{}", config.telemetry_port);

    tokio::select! {
        res = control_handle => {
            if let Err(e) = res {
                error!("control loop task panicked: {e}");
            }
        }
        res = gps_handle => {
            if let Err(e) = res {
                error!("sensor feed task panicked: {e}");
            }
        }
        res = publish_handle => {
            if let Err(e) = res {
                error!("telemetry publish task panicked: {e}");
            }
        }
        res = server_handle => {
            if let Err(e) = res {
                error!("telemetry server task panicked: {e}");
            }
        }
    }

    info!("shutting down");
    Ok(())
}
