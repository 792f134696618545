//! Type-compatibility rules for graph connections
//!
//! Decides whether a proposed connection between two typed endpoints is
//! safe (`ok`), risky (`warn`), or disallowed (`error`). Rules are layered:
//! an immutable default set loaded once, overlaid by user rules that are
//! checked first. Default pair rules are protected and can never be
//! shadowed by a user rule for the same pair.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};

/// The universal sink type tag
///
/// Any type can be coerced into raw bytes, but the transfer is always
/// flagged so the author double-checks it.
pub const BYTES_TAG: &str = "bytes";

/// Outcome of a compatibility check between two type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityLevel {
    /// The connection is safe
    Ok,
    /// The connection works but may lose information
    Warn,
    /// The connection is disallowed
    Error,
}

/// A single compatibility rule
///
/// Serialized form matches the rule source format: either
/// `{"from": ..., "to": ..., "result": ...}` or
/// `{"default": true, "result": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompatRule {
    /// Applies to one exact (from, to) pair
    Pair {
        from: String,
        to: String,
        result: CompatibilityLevel,
    },
    /// Applies to any pair no other rule covers
    Fallback {
        default: bool,
        result: CompatibilityLevel,
    },
}

impl CompatRule {
    /// Create a pair rule
    pub fn pair(
        from: impl Into<String>,
        to: impl Into<String>,
        result: CompatibilityLevel,
    ) -> Self {
        Self::Pair {
            from: from.into(),
            to: to.into(),
            result,
        }
    }

    /// Create a fallback rule
    pub fn fallback(result: CompatibilityLevel) -> Self {
        Self::Fallback {
            default: true,
            result,
        }
    }

    /// The result this rule yields when it matches
    pub fn result(&self) -> CompatibilityLevel {
        match self {
            Self::Pair { result, .. } | Self::Fallback { result, .. } => *result,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Pair { from, to, .. } => format!("{} -> {}", from, to),
            Self::Fallback { .. } => "default".to_string(),
        }
    }
}

static BUILTIN_RULES: Lazy<Vec<CompatRule>> = Lazy::new(|| {
    serde_json::from_str(include_str!("default_rules.json"))
        .expect("embedded default compatibility rules are valid JSON")
});

/// Layered rule store and evaluator
///
/// Owns the immutable default rule list and the mutable user overlay.
/// Callers construct one from a rule source and own all mutation; there is
/// no process-wide state. Evaluation is a pure function of the store and
/// the two input tags.
///
/// # Example
///
/// ```
/// use flow_engine::{CompatibilityLevel, RuleStore};
///
/// let store = RuleStore::builtin();
/// assert_eq!(store.evaluate("text", "bytes"), CompatibilityLevel::Warn);
/// ```
#[derive(Debug, Clone)]
pub struct RuleStore {
    defaults: Vec<CompatRule>,
    user_rules: Vec<CompatRule>,
    protected: HashSet<(String, String)>,
}

impl RuleStore {
    /// Create a store from an ordered default rule list
    ///
    /// The (from, to) pairs covered by default pair rules become protected:
    /// user rules may never target them.
    pub fn new(defaults: Vec<CompatRule>) -> Self {
        let protected = defaults
            .iter()
            .filter_map(|rule| match rule {
                CompatRule::Pair { from, to, .. } => Some((from.clone(), to.clone())),
                CompatRule::Fallback { .. } => None,
            })
            .collect();
        Self {
            defaults,
            user_rules: Vec::new(),
            protected,
        }
    }

    /// Create a store from the embedded default rule set
    pub fn builtin() -> Self {
        Self::new(BUILTIN_RULES.clone())
    }

    /// True if a default pair rule already covers this (from, to) pair
    pub fn is_protected(&self, from: &str, to: &str) -> bool {
        self.protected
            .contains(&(from.to_string(), to.to_string()))
    }

    /// The current user rule overlay, newest first
    pub fn user_rules(&self) -> &[CompatRule] {
        &self.user_rules
    }

    /// Register a user rule
    ///
    /// Fails with [`RuleError::Conflict`] when a pair rule targets a
    /// protected pair, and with [`RuleError::UnsafeOk`] when the requested
    /// result is `ok` — current policy rejects every user-supplied 'ok'
    /// coercion. Accepted rules are prepended so they shadow older user
    /// rules as well as defaults.
    pub fn add_rule(&mut self, rule: CompatRule) -> Result<()> {
        if let CompatRule::Pair { from, to, .. } = &rule {
            if self.is_protected(from, to) {
                return Err(RuleError::Conflict {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        if rule.result() == CompatibilityLevel::Ok {
            return Err(RuleError::UnsafeOk {
                rule: rule.describe(),
            });
        }

        log::debug!("registering user rule: {}", rule.describe());
        self.user_rules.insert(0, rule);
        Ok(())
    }

    /// Drop every user rule, reverting to default-only behavior
    pub fn reset_rules(&mut self) {
        if !self.user_rules.is_empty() {
            log::debug!("clearing {} user rule(s)", self.user_rules.len());
        }
        self.user_rules.clear();
    }

    /// Evaluate the compatibility of a proposed connection
    ///
    /// Total: always returns a level. Checked in strict order — exact pair
    /// rules (user overlay first, newest first), then the bytes sink
    /// heuristics, then the configured fallback rule, then fail-closed
    /// `error`.
    pub fn evaluate(&self, from: &str, to: &str) -> CompatibilityLevel {
        for rule in self.combined_rules() {
            if let CompatRule::Pair {
                from: rule_from,
                to: rule_to,
                result,
            } = rule
            {
                if rule_from == from && rule_to == to {
                    return *result;
                }
            }
        }

        // Anything -> bytes is a universal sink coercion, always flagged.
        if to == BYTES_TAG {
            return CompatibilityLevel::Warn;
        }

        // Reinterpreting raw bytes as a structured type is risky.
        if from == BYTES_TAG && to != BYTES_TAG {
            return CompatibilityLevel::Warn;
        }

        self.combined_rules()
            .find_map(|rule| match rule {
                CompatRule::Fallback {
                    default: true,
                    result,
                } => Some(*result),
                _ => None,
            })
            .unwrap_or(CompatibilityLevel::Error)
    }

    fn combined_rules(&self) -> impl Iterator<Item = &CompatRule> {
        self.user_rules.iter().chain(self.defaults.iter())
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::builtin()
    }
}
