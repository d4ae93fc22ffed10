pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod metrics;
pub mod rating;
pub mod render;

pub use error::{Error, Result};
