//! Noise filter for OCR'd menu lines
//!
//! Scanned menus come back interleaved with boilerplate: service notices,
//! bilingual connector lines, page numbers, stray dashes. Rather than guess
//! what a dish looks like, lines are discarded when they match a known noise
//! word or pattern. Rules are plain data so deployments can ship their own.

use crate::error::MenuError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lines at or below this many characters are dropped
const MIN_LINE_CHARS: usize = 2;

/// Blacklist configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whole-word terms, matched case-insensitively
    #[serde(default)]
    pub words: Vec<String>,
    /// Regular expressions, matched case-insensitively
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Default for FilterRules {
    /// Rules tuned for English/Turkish in-flight meal cards
    fn default() -> Self {
        let words = [
            "menu",
            "Menu",
            "Menü",
            "local",
            "before landing",
            "Kalkış",
            "service",
            "finished",
            "apologize",
            "take-off",
            "landing",
            "Item",
            "available",
            "understanding",
            "prepared",
            "Islamic",
            "Lütfen",
        ];
        let patterns = [
            r"(?:^| )veya or(?: |$)",
            r"(?:^| )[-_]+ ?[a-zA-Z]?$",
            r"(?:thank you for your understanding)",
            r"yemeklerimiz.*islamic principles",
            r"^[0-9]+$",
        ];

        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl FilterRules {
    /// Load rules from a JSON file of the form `{"words": [...], "patterns": [...]}`
    pub fn from_json_file(path: &Path) -> Result<Self, MenuError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MenuError::InvalidFilterRules(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, MenuError> {
        serde_json::from_str(json)
            .map_err(|e| MenuError::InvalidFilterRules(format!("Malformed rules: {}", e)))
    }
}

/// Compiled, immutable form of [`FilterRules`]
#[derive(Debug)]
pub struct NoiseFilter {
    rules: FilterRules,
    word_regex: Option<Regex>,
    patterns: Vec<Regex>,
    numeric: Regex,
}

impl NoiseFilter {
    pub fn new(rules: &FilterRules) -> Result<Self, MenuError> {
        let word_regex = if rules.words.is_empty() {
            None
        } else {
            let alternation = rules
                .words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"\b(?:{})\b", alternation))?)
        };

        let patterns = rules
            .patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        let numeric = compile(r"^[0-9]+(?:\.[0-9]+)?$")?;

        Ok(Self {
            rules: rules.clone(),
            word_regex,
            patterns,
            numeric,
        })
    }

    pub fn rules(&self) -> &FilterRules {
        &self.rules
    }

    /// Whether a trimmed line survives every predicate
    pub fn keep(&self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }
        if self.word_regex.as_ref().is_some_and(|re| re.is_match(line)) {
            return false;
        }
        if self.patterns.iter().any(|re| re.is_match(line)) {
            return false;
        }
        if self.numeric.is_match(line) {
            return false;
        }
        line.chars().count() > MIN_LINE_CHARS
    }

    /// Keep the surviving lines, in their original order
    pub fn apply(&self, lines: Vec<String>) -> Vec<String> {
        lines.into_iter().filter(|line| self.keep(line)).collect()
    }
}

fn compile(pattern: &str) -> Result<Regex, MenuError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| MenuError::InvalidFilterRules(format!("Bad pattern {:?}: {}", pattern, e)))
}
