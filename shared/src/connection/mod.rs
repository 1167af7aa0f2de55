pub mod connection;
pub mod connection_config;
pub mod counters;
pub mod error;
