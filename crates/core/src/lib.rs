#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod scoring;
pub mod time;

pub use catalog::{CatalogError, QuestionCatalog};
pub use config::{ConfigError, ExamConfig};
pub use error::Error;
pub use scoring::{ExamResult, Tally};
pub use time::Clock;
