pub mod aggregate;
pub mod classify;
pub mod config;
pub mod discover;
pub mod filter;
pub mod gather;
pub mod http_client;
pub mod output;
pub mod probe;
pub mod scan;
pub mod target;
pub mod utils;

// re-export the types most callers need
pub use crate::classify::Classification;
pub use crate::config::{ScanConfig, Wordlists};
pub use crate::output::ScanReport;
pub use crate::scan::Scanner;
