//! Term substitution for the sanitized input variant.
//!
//! Financial-hardship wording sometimes trips remote safety filters on otherwise
//! ordinary questions. Substitution is best effort and driven entirely by config.

use std::borrow::Cow;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::coach::core::config::{SanitizerConfig, TermSubstitution};

/// A compiled substitution rule.
struct SubstitutionRule {
    pattern: Regex,
    replacement: String,
}

/// Ordered, case-insensitive, whole-word term replacer.
pub struct Sanitizer {
    rules: Vec<SubstitutionRule>,
}

impl Sanitizer {
    /// Compile a sanitizer from configuration.
    ///
    /// # Errors
    /// Returns an error if any term cannot be compiled into a pattern.
    pub fn new(config: &SanitizerConfig) -> Result<Self, regex::Error> {
        Self::from_terms(&config.terms)
    }

    /// Compile a sanitizer from explicit substitution pairs.
    ///
    /// # Errors
    /// Returns an error if any term cannot be compiled into a pattern.
    pub fn from_terms(terms: &[TermSubstitution]) -> Result<Self, regex::Error> {
        let rules = terms
            .iter()
            .map(|sub| {
                let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(sub.term.trim())))?;
                Ok(SubstitutionRule {
                    pattern,
                    replacement: sub.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { rules })
    }

    /// Apply every substitution in order.
    #[must_use]
    pub fn sanitize(&self, input: &str) -> String {
        let mut text = Cow::Borrowed(input);
        let mut replaced = 0_usize;

        for rule in &self.rules {
            let next = match rule.pattern.replace_all(&text, NoExpand(&rule.replacement)) {
                Cow::Owned(next) => Some(next),
                Cow::Borrowed(_) => None,
            };
            if let Some(next) = next {
                replaced += 1;
                text = Cow::Owned(next);
            }
        }

        if replaced > 0 {
            debug!(rules_applied = replaced, "sanitized user input");
        }
        text.into_owned()
    }

    /// Number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
