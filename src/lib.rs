//! # Rusty FPGA Library
//!
//! A tri-state netlist simulator for redstone-style logic blocks written in Rust.
//!
//! This library provides:
//! - A parser for the line-oriented `NETLIST ... $END` text format
//! - HIGH / LOW / UNDEFINED gate semantics for AND, OR, XOR and NOR
//! - Fixed-budget relaxation that settles combinational logic and simple latches
//! - Nested blocks usable as elements of larger netlists
//! - JSON-configurable test benches and a static connectivity report

pub mod block;
pub mod component;
pub mod components;
pub mod connection;
pub mod netlist;
pub mod parser;
pub mod pin;
pub mod system_config;
pub mod types;

// Re-export commonly used items for easier importing
pub use block::CircuitBlock;
pub use component::{Component, Element};
pub use components::gates::{Gate, GateKind, NorPolicy};
pub use components::ElementFactory;
pub use connection::{ConnectivityReport, ConnectivityWarning};
pub use netlist::{Model, Net, Netlist};
pub use parser::{parse, FormatError};
pub use pin::{PinMap, PinTable, Voltage};
pub use types::Direction;
