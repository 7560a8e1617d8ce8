//! Device lifecycle rules and the service that enforces them

pub mod error;
pub mod service;
pub mod validator;
