pub mod report;

pub use report::{write_json, HintFinding, ScanReport, ScanStats};
