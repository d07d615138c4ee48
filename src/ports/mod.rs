//! Port traits decoupling the domain from infrastructure.

pub mod config_port;
pub mod export_port;
