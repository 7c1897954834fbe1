//! Read-only telemetry: a `FlightTelemetry` snapshot broadcast over
//! WebSocket to any connected client. Strictly downstream of the control
//! loop — nothing in here can feed back into `ControlCore` (§9 design
//! notes: the telemetry feed is an observer, never a controller).

pub mod server;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::IngestHandle;
use crate::types::{FlightMode, GPSSample, IMUSample, MotorOutputs};

pub use server::TelemetryServer;

/// One telemetry frame, serialized as JSON over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightTelemetry {
    pub armed: bool,
    pub mode: FlightMode,
    pub imu: IMUSample,
    pub gps: GPSSample,
    pub motors: MotorOutputs,
    pub timestamp: DateTime<Utc>,
}

impl FlightTelemetry {
    /// Capture the current snapshot through the ingest API's read side.
    pub fn snapshot(handle: &IngestHandle, now: DateTime<Utc>) -> Self {
        Self {
            armed: handle.is_armed(),
            mode: handle.mode(),
            imu: handle.get_imu(),
            gps: handle.get_gps(),
            motors: handle.get_motors(),
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::SystemState;

    #[test]
    fn snapshot_reflects_ingest_state() {
        let state = SystemState::new();
        let handle = IngestHandle::new(state.clone());
        handle.arm();
        handle.set_flight_mode(FlightMode::Stabilize);

        let snap = FlightTelemetry::snapshot(&handle, Utc::now());
        assert!(snap.armed);
        assert_eq!(snap.mode, FlightMode::Stabilize);
    }
}
