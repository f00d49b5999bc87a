//! # Shared test helpers
//!
//! Fixtures for the integration tests: a few user types declared through the
//! public macros, and a quiet simulation wrapper.

#![allow(dead_code)]

use ontarget::runner::sim::{simulate, Simulation};
use ontarget::{HarnessConfig, Registry};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    pub port: u8,
    pub number: u8,
}
ontarget::comparable_struct!(Pin { port, number });

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub led: Pin,
    pub button: Option<Pin>,
    pub baud: u32,
}
ontarget::comparable_struct!(Board { led, button, baud });

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Packet {
    Ping,
    Data { length: u8, checksum: u16 },
    Error(i32),
    /// Payload shapes differ between variants on purpose.
    Calibrate(Pin),
}
ontarget::comparable_enum!(Packet {
    Ping,
    Data { length, checksum },
    Error { 0 },
    Calibrate { 0 },
});

pub fn board() -> Board {
    Board {
        led: Pin { port: 1, number: 5 },
        button: Some(Pin { port: 0, number: 13 }),
        baud: 115_200,
    }
}

/// Colours and banner off.
pub fn quiet() -> HarnessConfig {
    HarnessConfig::new().with_colors(false).with_banner(false)
}

pub fn simulate_quiet(registry: Registry) -> Simulation {
    simulate(registry, quiet())
}
