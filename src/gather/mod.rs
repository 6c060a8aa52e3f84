pub mod candidates;
pub mod patterns;
pub mod scripts;

pub use candidates::{extract, extract_strings, Extraction};
pub use scripts::{fetch_text, scan_scripts, ScriptScan};
