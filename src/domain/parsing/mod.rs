//! Recovery of structured data from free-form model output.

mod lenient_json;

pub use lenient_json::{
    extract_fenced_block, locate_delimited, parse_model_json, parse_model_json_or_else,
    parse_strict, scan_labelled_fields, strip_code_fences, JsonShape, ParseOutcome, RecoveryTier,
};
