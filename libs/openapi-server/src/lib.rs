//! Wire models for the device manager HTTP API

pub mod models;
