//! Buffer analysis
//!
//! - [`scanner`]: user symbol extraction (tree-sitter, with a regex fallback)
//! - [`utils`]: identifier runs and offset validation around the cursor

pub mod scanner;
pub mod utils;

pub use scanner::{scan_with_regex, BufferScanner};
pub use utils::{current_word, validate_offset, word_range};
