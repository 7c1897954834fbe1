//! Host-in-the-loop simulation: drop-in implementations of the `hal`
//! capability traits so the exact same [`crate::control::ControlCore`] runs
//! against synthetic sensors on a development machine (§9 design notes).
//!
//! Nothing under this module is reachable from the control path at
//! compile time — `ControlCore::tick` only ever sees `&mut dyn ImuBus`/
//! `&mut dyn PwmSink`/`&mut dyn Gpio`, so swapping these out for real
//! silicon is a construction-site change, not a control-logic one.

pub mod gps;
pub mod imu;
pub mod testing;

pub use gps::{BaroFeedSim, GpsFeedSim, ObstacleFeedSim};
pub use imu::{FailingImuBus, ImuBusSim};
pub use testing::{NullGpio, NullImuBus, NullPwmSink};
