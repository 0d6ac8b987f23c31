#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
pub mod logging;

pub mod clock;
pub mod config;
pub mod gnss;
pub mod lora;
pub mod telemetry;
pub mod tracker;

#[cfg(test)]
mod mock;
