//! Grani Hardware Abstraction Layer
//!
//! This crate describes *where* a circuit runs: the physical qubits of a
//! device, which of them can interact directly, and how long each event
//! takes. The scheduling back end consumes these descriptions; nothing here
//! depends on the front end.
//!
//! # Core Components
//!
//! - **Topology**: [`ConnectivityGraph`] over [`PhysicalQubit`]s, with
//!   factories for common layouts ([`ConnectivityGraph::linear`],
//!   [`ConnectivityGraph::ring`], [`ConnectivityGraph::grid`],
//!   [`ConnectivityGraph::full`])
//! - **Configuration**: [`HardwareConfiguration`], a named device
//!   description loadable from JSON
//! - **Timing**: the [`LatencyModel`] trait with [`ConstantLatency`] and
//!   [`PerKindLatency`] implementations
//!
//! # Example: Describing a Device
//!
//! ```rust
//! use grani_hal::{ConnectivityGraph, HardwareConfiguration, PhysicalQubit};
//!
//! let config = HardwareConfiguration::new("line-3", ConnectivityGraph::linear(3));
//! assert!(config.connectivity.is_adjacent(PhysicalQubit(0), PhysicalQubit(1)));
//! assert!(!config.connectivity.is_adjacent(PhysicalQubit(0), PhysicalQubit(2)));
//! ```

pub mod config;
pub mod connectivity;
pub mod error;
pub mod latency;

pub use config::HardwareConfiguration;
pub use connectivity::{Channel, ConnectivityGraph, PhysicalQubit};
pub use error::{HalError, HalResult};
pub use latency::{ConstantLatency, LatencyModel, PerKindLatency};
