#![no_std]

// Shared logic for the Vetinari clock movement controller.
//
// This crate stays portable across MCU firmware and host tooling by avoiding
// the Rust standard library. All mutable state lives in context objects owned
// by the caller, so every component can be unit tested without a live
// hardware loop.

pub mod fault;
pub mod pattern;
pub mod rng;
pub mod scheduler;
pub mod telemetry;
