// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod core;
pub mod extract;
pub mod params;

pub mod index;
pub mod progress;
pub mod record;
pub mod runner;
pub mod store;
