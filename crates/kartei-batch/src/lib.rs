mod format;
mod runner;
mod xlsx;

pub use format::{BatchFormat, BatchRow, FormatError, parse};
pub use runner::{BatchOutcome, run_batch};
