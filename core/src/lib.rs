pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod service;

pub use db::{Database, Session, StoreConfig};
pub use error::{DietError, Result};
pub use service::DietService;
