pub mod config;
pub mod error;
pub mod eval;

pub use config::Config;
pub use error::{RankevalError, Result};
