//! Reward signals and reward functions

use serde::{Deserialize, Serialize};

/// Reward signal from the environment
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(pub f64);

impl Reward {
    /// Create a new reward
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the reward value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Reward {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Reward> for f64 {
    fn from(reward: Reward) -> Self {
        reward.0
    }
}

impl std::ops::Add for Reward {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl std::ops::Mul<f64> for Reward {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}

/// Trait for reward functions evaluated on each transition
pub trait RewardFunction: Send + Sync {
    /// State type
    type State;
    /// Action type
    type Action;

    /// Compute the reward for a state-action-next_state transition
    fn reward(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next_state: &Self::State,
    ) -> Reward;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_arithmetic() {
        let r = Reward(-3.0) + Reward(1.0);
        assert_eq!(r, Reward(-2.0));
        assert_eq!(Reward(-2.0) * 2.0, Reward(-4.0));
    }
}
