//! Reporter module for output formatting

pub mod console;
pub mod json;
pub mod score_file;

pub use console::ConsoleReporter;
pub use json::{AnalysisOutput, JsonReporter};
pub use score_file::{score_file_path, write_score_file};
