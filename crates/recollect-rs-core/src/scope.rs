//! Mapping from request mode to memory partition.

use recollect_rs_memory::ScopeKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Memory scope a request runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Private history of the requester.
    Episodic,
    /// Knowledge shared by all requesters of the agent.
    Semantic,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Episodic => "episodic",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "episodic" => Ok(Self::Episodic),
            "semantic" => Ok(Self::Semantic),
            other => Err(format!("unknown mode `{other}` (expected episodic or semantic)")),
        }
    }
}

/// Resolves the partition a request reads from and writes to.
///
/// Episodic requests get the requester's own partition; semantic requests
/// share one collective partition regardless of who asks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeResolver {
    semantic_scope: String,
}

impl ScopeResolver {
    pub fn new(semantic_scope: impl Into<String>) -> Self {
        Self {
            semantic_scope: semantic_scope.into(),
        }
    }

    /// Collective identifier used for semantic requests.
    pub fn semantic_scope(&self) -> &str {
        &self.semantic_scope
    }

    pub fn resolve(&self, mode: Mode, requester_id: &str) -> ScopeKey {
        match mode {
            Mode::Episodic => ScopeKey::Individual(requester_id.to_string()),
            Mode::Semantic => ScopeKey::Collective(self.semantic_scope.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Mode, ScopeResolver};
    use pretty_assertions::assert_eq;
    use recollect_rs_memory::ScopeKey;

    #[test]
    fn episodic_scope_is_per_requester() {
        let resolver = ScopeResolver::new("insurance_semantic_agent");
        assert_eq!(
            resolver.resolve(Mode::Episodic, "CUST-45678"),
            ScopeKey::Individual("CUST-45678".to_string())
        );
        assert_ne!(
            resolver.resolve(Mode::Episodic, "CUST-1"),
            resolver.resolve(Mode::Episodic, "CUST-2")
        );
    }

    #[test]
    fn semantic_scope_ignores_requester() {
        let resolver = ScopeResolver::new("insurance_semantic_agent");
        let expected = ScopeKey::Collective("insurance_semantic_agent".to_string());
        assert_eq!(resolver.resolve(Mode::Semantic, "CUST-1"), expected);
        assert_eq!(resolver.resolve(Mode::Semantic, "NEW-999"), expected);
        assert_eq!(resolver.resolve(Mode::Semantic, ""), expected);
    }

    #[test]
    fn resolution_is_repeatable() {
        let resolver = ScopeResolver::new("agent");
        for mode in [Mode::Episodic, Mode::Semantic] {
            assert_eq!(resolver.resolve(mode, "id"), resolver.resolve(mode, "id"));
        }
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Episodic".parse::<Mode>(), Ok(Mode::Episodic));
        assert_eq!(" semantic ".parse::<Mode>(), Ok(Mode::Semantic));
        assert!("procedural".parse::<Mode>().is_err());
        assert_eq!(Mode::Semantic.to_string(), "semantic");
    }
}
