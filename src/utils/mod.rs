//! Utility modules: file loading and small numeric helpers

mod data_loader;
pub mod stats;

pub use data_loader::{DataLoader, FileInfo};
