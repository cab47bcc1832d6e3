//! CLI command implementations

mod config;
mod connect;
mod connectors;
mod login;
mod status;

pub use config::{config_get, config_set, config_show};
pub use connect::connect_command;
pub use connectors::connectors_command;
pub use login::login_command;
pub use status::status_command;
