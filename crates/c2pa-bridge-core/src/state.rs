//! Builder progress tracking

use serde::{Deserialize, Serialize};

/// Progress of a manifest builder
///
/// State transitions:
/// ```text
/// Empty → Composing ⟲ (add_resource, add_ingredient, set_remote_url, set_no_embed)
///   │         │
///   └─────────┴──→ Signed | Archived | PlaceholderIssued
/// ```
///
/// The last three are observational. The engine handle is read rather than
/// consumed, so a builder may be signed again, archived after signing, and
/// so on; the state records the most recent consuming operation. No state
/// returns to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderState {
    /// Manifest definition parsed, nothing added yet
    #[default]
    Empty,
    /// Resources, ingredients or options have been added
    Composing,
    /// A signed asset was produced
    Signed,
    /// The builder was serialized to an archive
    Archived,
    /// A data-hashed placeholder was issued
    PlaceholderIssued,
}

impl BuilderState {
    /// Check if this state can transition to the target state
    ///
    /// Every state but `Empty` is reachable from every state.
    pub fn can_transition_to(&self, target: BuilderState) -> bool {
        !matches!(target, BuilderState::Empty)
    }
}

impl std::fmt::Display for BuilderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderState::Empty => write!(f, "Empty"),
            BuilderState::Composing => write!(f, "Composing"),
            BuilderState::Signed => write!(f, "Signed"),
            BuilderState::Archived => write!(f, "Archived"),
            BuilderState::PlaceholderIssued => write!(f, "PlaceholderIssued"),
        }
    }
}

#[cfg(test)]
#[path = "state/state_tests.rs"]
mod state_tests;
