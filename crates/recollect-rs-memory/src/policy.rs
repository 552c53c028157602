//! Capture policy applied to exchange content before it is persisted.

use crate::error::MemoryError;
use regex::Regex;

/// Candidate tokens for secret detection.
const SECRET_TOKEN_PATTERN: &str = r"[A-Za-z0-9+/=]{20,}";

/// Rewrites content before it reaches storage.
#[derive(Debug, Clone)]
pub struct MemoryCapturePolicy {
    /// Patterns to redact from captured content.
    pub redact_patterns: Vec<String>,
    /// Detect secrets using entropy heuristics.
    pub detect_secrets: bool,
    /// Entropy threshold for secret detection.
    pub secret_entropy_threshold: f32,
    /// Optional maximum content length in characters.
    pub max_chars: Option<usize>,
    /// Replacement string for redactions.
    pub redaction_replacement: String,
}

impl Default for MemoryCapturePolicy {
    fn default() -> Self {
        Self {
            redact_patterns: Vec::new(),
            detect_secrets: true,
            secret_entropy_threshold: 3.7,
            max_chars: None,
            redaction_replacement: "[REDACTED]".to_string(),
        }
    }
}

impl MemoryCapturePolicy {
    /// Policy that stores content verbatim.
    pub fn passthrough() -> Self {
        Self {
            detect_secrets: false,
            ..Self::default()
        }
    }

    /// Apply redaction and truncation rules to content.
    pub fn apply(&self, content: &str) -> Result<String, MemoryError> {
        let mut content = content.to_string();
        for pattern in &self.redact_patterns {
            let regex = Regex::new(pattern).map_err(|err| MemoryError::Regex(err.to_string()))?;
            content = regex
                .replace_all(&content, self.redaction_replacement.as_str())
                .into_owned();
        }
        if self.detect_secrets {
            content = redact_high_entropy(
                &content,
                self.secret_entropy_threshold,
                &self.redaction_replacement,
            );
        }
        if let Some(max_chars) = self.max_chars {
            content = content.chars().take(max_chars).collect();
        }
        Ok(content)
    }
}

fn redact_high_entropy(content: &str, threshold: f32, replacement: &str) -> String {
    let Ok(regex) = Regex::new(SECRET_TOKEN_PATTERN) else {
        return content.to_string();
    };
    regex
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let token = caps.get(0).map_or("", |m| m.as_str());
            if shannon_entropy(token) >= threshold {
                replacement.to_string()
            } else {
                token.to_string()
            }
        })
        .into_owned()
}

/// Shannon entropy in bits per byte.
fn shannon_entropy(token: &str) -> f32 {
    let bytes = token.as_bytes();
    if bytes.is_empty() {
        return 0.0;
    }
    let mut counts = [0usize; 256];
    for byte in bytes {
        counts[usize::from(*byte)] += 1;
    }
    let len = bytes.len() as f32;
    counts
        .iter()
        .filter(|count| **count > 0)
        .map(|count| {
            let p = *count as f32 / len;
            -p * p.log2()
        })
        .sum()
}
