pub mod common;
pub mod logger;
