//! Device Manager Library
//!
//! Inventory of physical devices with lifecycle-aware update rules, served
//! over a small HTTP API.

pub mod app;
pub mod devices;
pub mod errors;
pub mod filesys;
pub mod logs;
pub mod models;
pub mod server;
pub mod storage;
pub mod utils;
