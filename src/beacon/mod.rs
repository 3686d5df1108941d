//! Beacon scheduling

pub mod scheduler;

pub use scheduler::{BeaconScheduler, BeaconState};
