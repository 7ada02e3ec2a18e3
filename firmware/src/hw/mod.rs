//! Hardware adapters for the STM32 target.

#![cfg(target_os = "none")]

pub mod coil;
