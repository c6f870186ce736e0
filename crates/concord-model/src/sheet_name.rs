//! Sheet naming convention.
//!
//! Sheets are associated with a coding question by name:
//! - `<question>_codebook` holds the question's codebook
//! - `<question>_codes` or `<question>_codes_<variant>` hold one rater's
//!   coding pass
//! - `<question>_codes_final` holds the reconciled final coding

use std::sync::OnceLock;

use regex::Regex;

use crate::CodingError;

fn codebook_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)_codebook$").unwrap())
}

fn coding_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)_codes(_\w+)?$").unwrap())
}

fn final_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)_codes_final$").unwrap())
}

/// Name of the codebook sheet for a question.
pub fn codebook_sheet_name(question_id: &str) -> String {
    format!("{question_id}_codebook")
}

/// If the sheet is a coding sheet, the question it codes.
pub fn question_for_coding_sheet(sheet_name: &str) -> Option<String> {
    coding_pattern()
        .captures(sheet_name)
        .map(|caps| caps[1].to_string())
}

pub fn is_codebook_sheet(sheet_name: &str) -> bool {
    codebook_pattern().is_match(sheet_name)
}

/// Whether the sheet holds reconciled final codes.
pub fn is_final_sheet(sheet_name: &str) -> bool {
    final_pattern().is_match(sheet_name)
}

/// Resolve the question a sheet belongs to: coding sheets first, then
/// codebook sheets. Anything else is a [`CodingError::Configuration`].
pub fn question_for_sheet(sheet_name: &str) -> Result<String, CodingError> {
    if let Some(question) = question_for_coding_sheet(sheet_name) {
        return Ok(question);
    }
    if let Some(caps) = codebook_pattern().captures(sheet_name) {
        return Ok(caps[1].to_string());
    }
    Err(CodingError::configuration(format!(
        "can't figure out which question sheet {sheet_name} is associated with"
    )))
}
