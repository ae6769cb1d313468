pub mod config_store;
pub mod defaults;
pub mod files;
pub mod http_backend;
