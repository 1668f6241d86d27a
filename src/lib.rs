//! Incremental multi-protocol matcher and collector for timing-based RF/IR
//! remote-control and sensor signals.
//!
//! A transmitter that drives a single digital line (a 433 MHz OOK receiver,
//! an IR photodiode) encodes information purely in the durations between
//! level changes. This crate turns that stream of durations into named
//! packets, matching several protocols at once without buffering a whole
//! packet before knowing whether it's valid, and without any heap
//! allocation.
//!
//! - [`Protocol`]/[`Symbol`] ([`protocols`] for a bundled table) describe an
//!   alphabet of timing patterns.
//! - [`Parser`] feeds one duration at a time to every configured protocol and
//!   calls back with each completed packet.
//! - [`RingBuffer`] and [`Collector`] sit between an edge interrupt and the
//!   parser, so the interrupt handler only has to record a timestamp delta.

#![no_std]

#[cfg(test)]
extern crate std;

mod collector;
mod diagnostics;
mod error;
mod matcher;
mod parser;
mod protocol;
pub mod protocols;
mod ring;
mod role;

pub use collector::{Collector, InputPin, InterruptGuard, MicrosDelay, MonotonicMicros, OutputPin};
pub use diagnostics::{ProtocolDump, TableDump, TimingsDump};
pub use error::ConfigError;
pub use parser::{Parser, MAX_TIMING_BUFFER};
pub use protocol::{Protocol, Symbol, MAX_SEQ_LEN, MAX_SYMBOLS, MAX_TIME_LENGTH, PROTOCOL_NAME_LEN};
pub use ring::{RingBuffer, DEFAULT_RING_CAPACITY};
pub use role::SymbolRole;
