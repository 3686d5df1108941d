#![cfg_attr(not(test), no_std)]

pub mod aprs;
pub mod beacon;
pub mod config;
pub mod debug;
pub mod display;
pub mod gps;
pub mod lora;
pub mod tracker;
