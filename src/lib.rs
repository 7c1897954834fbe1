//! Real-time stabilization and navigation control core for an autonomous
//! multirotor flight computer.
//!
//! The crate is split the way the control loop itself is: pure, directly
//! testable math ([`geo`], [`pid`], [`estimator`]) at the bottom, the
//! cascaded controllers and arbitration logic in [`control`], the
//! thread-safe producer/consumer boundary in [`ingest`], hardware capability
//! contracts in [`hal`], and host-in-the-loop implementations of those
//! contracts in [`sim`]. [`telemetry`] is a read-only observer bolted on
//! the side; it never influences [`control::ControlCore`].

pub mod config;
pub mod control;
pub mod error;
pub mod estimator;
pub mod geo;
pub mod hal;
pub mod ingest;
pub mod pid;
pub mod sim;
pub mod telemetry;
pub mod types;
