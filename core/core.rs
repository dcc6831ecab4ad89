pub mod aggregate;
pub mod classify;
pub mod detect;
pub mod error;
pub mod rules;
pub mod transform;

pub use aggregate::{
    AggregationRequest, AggregationResult, FileError, MAX_OUTPUT_SIZE, NoProgress, Progress,
    aggregate,
};
pub use classify::{Classification, classify, file_type_label, is_binary_file};
pub use detect::{DetectedLanguage, LANGUAGE_DEFINITIONS, SPECIAL_FILES, detect_languages};
pub use error::{AppError, Result};
pub use rules::{DEFAULT_IGNORE_PATTERNS, IgnoreRuleSet};
