//! Deterministic line-based shift extraction
//!
//! The guaranteed-available fallback behind the model extractor. Scans a
//! message line by line and emits at most one candidate per line that
//! mentions the tracked name together with a date-shaped token. Precision
//! over recall: lines without an exact whole-word name match are ignored.

use crate::models::ShiftCandidate;
use crate::{Error, Result};
use regex::Regex;

/// Date-shaped token: 1-2 digit day, separator, 1-2 digit month, optional
/// separator plus 2- or 4-digit year.
const DATE_PATTERN: &str = r"\b\d{1,2}[./-]\d{1,2}(?:[./-]\d{2,4})?\b";

/// Regex-based extractor, compiled once per configuration.
pub struct RuleExtractor {
    name_re: Regex,
    date_re: Regex,
    venue_re: Regex,
}

impl RuleExtractor {
    /// Build the extractor for one tracked name and venue set.
    pub fn new(tracked_name: &str, venues: &[String]) -> Result<RuleExtractor> {
        let name_re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(tracked_name)))
            .map_err(|e| Error::Config(format!("invalid tracked name pattern: {}", e)))?;
        let date_re = Regex::new(DATE_PATTERN)
            .map_err(|e| Error::Internal(format!("date pattern: {}", e)))?;

        let alternation: Vec<String> = venues.iter().map(|v| regex::escape(v)).collect();
        let venue_re = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation.join("|")))
            .map_err(|e| Error::Config(format!("invalid venue pattern: {}", e)))?;

        Ok(RuleExtractor {
            name_re,
            date_re,
            venue_re,
        })
    }

    /// Extract raw candidates from one message.
    ///
    /// Dates are emitted as found on the line; the pipeline normalizes
    /// them. Pure function of the input text.
    pub fn extract(&self, text: &str) -> Vec<ShiftCandidate> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| self.extract_line(line))
            .collect()
    }

    fn extract_line(&self, line: &str) -> Option<ShiftCandidate> {
        if !self.name_re.is_match(line) {
            return None;
        }
        let date = self.date_re.find(line)?.as_str().to_string();
        let hall = self
            .venue_re
            .find(line)
            .map(|m| title_case(m.as_str()))
            .unwrap_or_default();
        Some(ShiftCandidate { date, hall })
    }
}

/// Title-case a venue name: first letter upper, rest lower.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
