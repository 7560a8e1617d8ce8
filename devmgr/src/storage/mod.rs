pub mod device;
pub mod layout;
pub mod memory;
pub mod settings;
pub mod store;
