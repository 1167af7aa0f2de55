pub mod arena;
pub mod error;
