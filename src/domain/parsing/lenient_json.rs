//! Layered parser for JSON embedded in model output.
//!
//! Model replies wrap JSON in commentary or code fences and are not
//! guaranteed to be well formed. Parsing runs in tiers, each usable on its
//! own:
//!
//! 1. [`strip_code_fences`] then [`locate_delimited`], then a strict parse
//! 2. [`extract_fenced_block`], a strict parse of the first fenced block
//! 3. a caller-supplied fallback, typically built on [`scan_labelled_fields`]
//!
//! The result says which tier produced the value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\s*```(?:json|JSON)?[ \t]*\r?\n?").expect("opening fence pattern is a valid regex")
});

static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```\s*\z").expect("closing fence pattern is a valid regex"));

static FENCED_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json|JSON)?\s*(\[[\s\S]*?\])\s*```").expect("fenced array pattern is a valid regex")
});

static FENCED_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json|JSON)?\s*(\{[\s\S]*?\})\s*```").expect("fenced object pattern is a valid regex")
});

static LABELLED_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:title|name|type)["']?[\s:]*["']?([^"'\n]+)["']?"#)
        .expect("labelled field pattern is a valid regex")
});

/// Top-level JSON shape expected from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn delimiters(&self) -> (char, char) {
        match self {
            JsonShape::Array => ('[', ']'),
            JsonShape::Object => ('{', '}'),
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            JsonShape::Array => value.is_array(),
            JsonShape::Object => value.is_object(),
        }
    }
}

/// Tier that recovered a value after the strict pass failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryTier {
    FencedBlock,
    Fallback,
}

/// Result of parsing model output.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The delimited JSON parsed as-is.
    Strict(Value),
    /// A later tier produced the value.
    Recovered { value: Value, tier: RecoveryTier },
    /// No tier produced a value.
    Failed { reason: String },
}

impl ParseOutcome {
    /// Returns the parsed value, if any tier succeeded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            ParseOutcome::Strict(value) | ParseOutcome::Recovered { value, .. } => Some(value),
            ParseOutcome::Failed { .. } => None,
        }
    }

    /// Consumes the outcome and returns the parsed value.
    pub fn into_value(self) -> Option<Value> {
        match self {
            ParseOutcome::Strict(value) | ParseOutcome::Recovered { value, .. } => Some(value),
            ParseOutcome::Failed { .. } => None,
        }
    }

    /// True when a fallback tier had to be used.
    pub fn is_recovered(&self) -> bool {
        matches!(self, ParseOutcome::Recovered { .. })
    }
}

/// Removes a code fence (```` ``` ```` or ```` ```json ````) wrapping the
/// whole text. Backticks elsewhere, including inside JSON strings, stay.
pub fn strip_code_fences(raw: &str) -> String {
    let opened = OPENING_FENCE.replace(raw, "");
    CLOSING_FENCE.replace(&opened, "").trim().to_string()
}

/// Slice from the first opening delimiter to the last closing one.
pub fn locate_delimited(text: &str, shape: JsonShape) -> Option<&str> {
    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Strict parse of a candidate, checking the top-level shape.
pub fn parse_strict(candidate: &str, shape: JsonShape) -> Result<Value, String> {
    let value: Value = serde_json::from_str(candidate).map_err(|e| e.to_string())?;
    if shape.matches(&value) {
        Ok(value)
    } else {
        Err(format!("expected a JSON {:?}", shape).to_lowercase())
    }
}

/// Strict parse of the first fenced block with the expected shape.
pub fn extract_fenced_block(raw: &str, shape: JsonShape) -> Option<Value> {
    let pattern = match shape {
        JsonShape::Array => &FENCED_ARRAY,
        JsonShape::Object => &FENCED_OBJECT,
    };
    pattern
        .captures_iter(raw)
        .filter_map(|captures| captures.get(1))
        .find_map(|block| parse_strict(block.as_str(), shape).ok())
}

/// Values of `title:`, `name:` or `type:` style labels, in order of appearance.
pub fn scan_labelled_fields(raw: &str) -> Vec<String> {
    LABELLED_FIELD
        .captures_iter(raw)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().trim().trim_end_matches(',').trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Runs the strict and fenced-block tiers.
pub fn parse_model_json(raw: &str, shape: JsonShape) -> ParseOutcome {
    parse_model_json_or_else(raw, shape, |_| None)
}

/// Runs every tier, ending with `fallback`.
pub fn parse_model_json_or_else<F>(raw: &str, shape: JsonShape, fallback: F) -> ParseOutcome
where
    F: FnOnce(&str) -> Option<Value>,
{
    let cleaned = strip_code_fences(raw);
    let strict_error = match locate_delimited(&cleaned, shape) {
        Some(candidate) => match parse_strict(candidate, shape) {
            Ok(value) => return ParseOutcome::Strict(value),
            Err(e) => e,
        },
        None => format!("no JSON {:?} found", shape).to_lowercase(),
    };

    if let Some(value) = extract_fenced_block(raw, shape) {
        return ParseOutcome::Recovered {
            value,
            tier: RecoveryTier::FencedBlock,
        };
    }

    if let Some(value) = fallback(raw) {
        return ParseOutcome::Recovered {
            value,
            tier: RecoveryTier::Fallback,
        };
    }

    ParseOutcome::Failed {
        reason: strict_error,
    }
}
