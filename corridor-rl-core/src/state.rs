//! State representations

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for internal environment states
pub trait State: Clone + Debug + Send + Sync {
    /// Get a feature representation of the state
    fn features(&self) -> Vec<f64>;

    /// Check if this is a terminal state
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Terminal state indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    /// Not a terminal state
    No,
    /// Terminal state (episode ends)
    Yes,
    /// Truncated (time limit reached)
    Truncated,
}

impl Terminal {
    /// Check if the state ends the episode (either `Yes` or `Truncated`)
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::No)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_flags() {
        assert!(!Terminal::No.is_terminal());
        assert!(Terminal::Yes.is_terminal());
        assert!(Terminal::Truncated.is_terminal());
    }
}
