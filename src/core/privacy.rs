//! Detection and removal of personal / farm-identifying data.
//!
//! Every query passes through [`PrivacyFilter::sanitize`] before it can reach a
//! knowledge provider. In [`PrivacyMode::Redact`] matches are stripped and the
//! remaining general question is forwarded; in [`PrivacyMode::Reject`] any
//! match refuses the query outright.

pub use crate::domain::model::PrivacyMode;
use crate::domain::model::RedactionKind;
use crate::utils::error::{Result, SearchError};
use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedQuery {
    pub text: String,
    pub redactions: Vec<RedactionKind>,
}

struct Rule {
    kind: RedactionKind,
    regex: Regex,
    accept: fn(&str) -> bool,
}

// Minimum letters a query must keep after stripping to still be a question.
const MIN_REMAINING_LETTERS: usize = 3;

const RULES: &[(RedactionKind, &str)] = &[
    (
        RedactionKind::Email,
        r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b",
    ),
    (
        RedactionKind::Iban,
        r"(?i)\b[A-Z]{2}\d{2}(?:[ ]?[A-Z0-9]{4}){3,7}(?:[ ]?[A-Z0-9]{1,3})?\b",
    ),
    (
        RedactionKind::Coordinates,
        r"-?\b\d{1,2}\.\d{3,}°?\s*[NS]?\s*[,;]?\s*-?\d{1,3}\.\d{3,}°?\s*[EW]?\b",
    ),
    (
        RedactionKind::NationalId,
        r"(?i)\b(?:oib|jmbg|ssn|personal\s+id(?:entification)?(?:\s+number)?)\s*(?:no\.?|#)?\s*:?\s*\d[\d-]{5,}\d",
    ),
    (RedactionKind::NationalId, r"\b(?:\d{11}|\d{13})\b"),
    (
        RedactionKind::ParcelId,
        r"(?i)(?:\bk\.\s?č\.|\bkč\b|\bkatastarska\s+čestica\b|\bčestica\b|\bcadastral\s+parcel\b|\bparcel\b|\bplot\b)\s*(?:no\.?|number|br\.?|#)?\s*:?\s*\d+(?:/\d+)?",
    ),
    (
        RedactionKind::FarmRegistryId,
        r"(?i)\b(?:arkod|mibpg|jibg|farm\s+(?:id|registration(?:\s+number)?|number)|holding\s+(?:id|number))\s*(?:id\b|no\.?|number|br\.?|#)?\s*:?\s*[A-Z0-9-]*\d[A-Z0-9-]*",
    ),
    (
        RedactionKind::PersonalName,
        r"(?i:\bmy\s+name\s+is|\bi\s+am\s+called|\bi'm\s+called|\bmoje\s+ime\s+je|\bzovem\s+se)\s+\p{Lu}\p{L}+(?:\s+\p{Lu}\p{L}+)?",
    ),
    (
        RedactionKind::PersonalName,
        r"\b(?:Mr|Mrs|Ms|Dr|gosp|gđa)\.?\s+\p{Lu}\p{L}+(?:\s+\p{Lu}\p{L}+)?",
    ),
    (
        RedactionKind::StreetAddress,
        r"\b\d{1,5}\s+(?:\p{Lu}\p{L}*\s+){1,3}(?:Street|Road|Avenue|Lane|St\.|Rd\.|Ave\.)",
    ),
    (
        RedactionKind::StreetAddress,
        r"(?i)\b(?:ulica|ul\.)\s+(?:\p{L}+\s+){1,4}\d{1,4}[a-z]?\b",
    ),
    (RedactionKind::Phone, r"\+?\d[\d\s\-/().]{6,}\d"),
];

fn always(_: &str) -> bool {
    true
}

// E.164 upper bound for a single number.
const MAX_PHONE_DIGITS: usize = 15;

/// Phone-shaped runs need at least 9 digits and a dialable shape, so year
/// ranges and quantities survive. Longer runs are several numbers (or account
/// numbers) written next to each other and are always identifying.
fn looks_like_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 9 {
        return false;
    }
    if digits > MAX_PHONE_DIGITS {
        return true;
    }
    candidate.starts_with('+') || candidate.starts_with('0') || digits >= 10
}

pub struct PrivacyFilter {
    mode: PrivacyMode,
    rules: Vec<Rule>,
    spacing: Regex,
}

impl PrivacyFilter {
    pub fn new(mode: PrivacyMode) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| SearchError::ConfigError {
                message: format!("invalid privacy pattern: {}", e),
            })
        };

        let mut rules = Vec::with_capacity(RULES.len());
        for (kind, pattern) in RULES {
            let accept: fn(&str) -> bool = match kind {
                RedactionKind::Phone => looks_like_phone,
                _ => always,
            };
            rules.push(Rule {
                kind: *kind,
                regex: compile(pattern)?,
                accept,
            });
        }

        Ok(Self {
            mode,
            rules,
            spacing: compile(r"\s+([,.;:?!])")?,
        })
    }

    pub fn mode(&self) -> PrivacyMode {
        self.mode
    }

    /// Kinds of identifying data present in `text`, in rule order, without duplicates.
    pub fn detect(&self, text: &str) -> Vec<RedactionKind> {
        let mut kinds = Vec::new();
        for rule in &self.rules {
            let hit = rule
                .regex
                .find_iter(text)
                .any(|m| (rule.accept)(m.as_str()));
            if hit && !kinds.contains(&rule.kind) {
                kinds.push(rule.kind);
            }
        }
        kinds
    }

    /// Applies the configured policy. The returned text is safe to forward.
    pub fn sanitize(&self, text: &str) -> Result<SanitizedQuery> {
        match self.mode {
            PrivacyMode::Reject => {
                let kinds = self.detect(text);
                if !kinds.is_empty() {
                    return Err(SearchError::PrivacyViolation { kinds });
                }
                Ok(SanitizedQuery {
                    text: self.tidy(text),
                    redactions: Vec::new(),
                })
            }
            PrivacyMode::Redact => {
                let (stripped, redactions) = self.strip(text);
                let letters = stripped.chars().filter(|c| c.is_alphabetic()).count();
                if !redactions.is_empty() && letters < MIN_REMAINING_LETTERS {
                    return Err(SearchError::PrivacyViolation { kinds: redactions });
                }
                Ok(SanitizedQuery {
                    text: stripped,
                    redactions,
                })
            }
        }
    }

    fn strip(&self, text: &str) -> (String, Vec<RedactionKind>) {
        let mut current = text.to_string();
        let mut redactions = Vec::new();

        for rule in &self.rules {
            let mut hit = false;
            let replaced = rule
                .regex
                .replace_all(&current, |caps: &Captures| {
                    let matched = &caps[0];
                    if (rule.accept)(matched) {
                        hit = true;
                        " ".to_string()
                    } else {
                        matched.to_string()
                    }
                })
                .into_owned();

            if hit {
                if !redactions.contains(&rule.kind) {
                    redactions.push(rule.kind);
                }
                current = replaced;
            }
        }

        (self.tidy(&current), redactions)
    }

    fn tidy(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.spacing
            .replace_all(&collapsed, "$1")
            .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '-') || c.is_whitespace())
            .to_string()
    }
}
