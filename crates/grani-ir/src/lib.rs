//! Grani Circuit Intermediate Representation
//!
//! This crate provides the event-based circuit model shared by the whole
//! Grani compilation stack: the front end lowers OpenQASM onto it, and the
//! scheduling back end consumes it.
//!
//! # Overview
//!
//! A [`Circuit`] owns named quantum/classical registers and one
//! [`LinearSchedule`] — an append-only list of [`Event`]s in program order.
//! Qubits and classical bits are plain value types ([`QubitId`], [`CbitId`])
//! addressing a circuit-global index space; register membership is a range
//! lookup, not a back-pointer.
//!
//! # Core Components
//!
//! - **Identity**: [`QubitId`], [`CbitId`], [`RegisterId`]
//! - **Registers**: [`QuantumRegister`], [`ClassicalRegister`]
//! - **Events**: [`Event`] (gate, controlled gate, measurement, reset,
//!   barrier, conditional) with [`GateOp`] payloads
//! - **Schedule**: [`LinearSchedule`] inside a [`Circuit`]
//!
//! # Example: Building a Bell Pair
//!
//! ```rust
//! use grani_ir::{Circuit, Event, GateOp, QubitId};
//!
//! let mut circuit = Circuit::new("bell");
//! circuit.add_qreg("q", 2).unwrap();
//! circuit.add_creg("c", 2).unwrap();
//!
//! circuit.append(Event::gate(GateOp::named("h"), [QubitId(0)]));
//! circuit.append(Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]));
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.schedule().len(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod event;
pub mod register;

pub use circuit::{Circuit, LinearSchedule};
pub use error::{IrError, IrResult};
pub use event::{Event, GateOp};
pub use register::{CbitId, ClassicalRegister, QuantumRegister, QubitId, RegisterId};
