//! Environment wrappers for common transformations

use async_trait::async_trait;

use corridor_rl_core::{
    ActionSpace, Environment, ObservationSpace, Reward, Step, StepInfo,
};

/// Wrapper that transforms rewards as they pass through
pub struct RewardWrapper<E, F> {
    /// Inner environment
    pub env: E,
    /// Reward transformation function
    pub reward_fn: F,
}

impl<E, F> RewardWrapper<E, F> {
    /// Wrap an environment with a reward transformation
    pub fn new(env: E, reward_fn: F) -> Self {
        Self { env, reward_fn }
    }
}

impl<E: std::fmt::Debug, F> std::fmt::Debug for RewardWrapper<E, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardWrapper").field("env", &self.env).finish()
    }
}

#[async_trait]
impl<E, F> Environment for RewardWrapper<E, F>
where
    E: Environment,
    F: Fn(Reward, &Step<E::Observation, E::State>) -> Reward + Send + Sync,
{
    type Observation = E::Observation;
    type Action = E::Action;
    type State = E::State;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        self.env.action_space()
    }

    async fn reset(&mut self) -> corridor_rl_core::Result<(Self::Observation, StepInfo)> {
        self.env.reset().await
    }

    async fn step(
        &mut self,
        action: Self::Action,
    ) -> corridor_rl_core::Result<Step<Self::Observation, Self::State>> {
        let mut step = self.env.step(action).await?;
        step.reward = (self.reward_fn)(step.reward, &step);
        Ok(step)
    }

    async fn render(&self) -> corridor_rl_core::Result<()> {
        self.env.render().await
    }

    async fn close(&mut self) -> corridor_rl_core::Result<()> {
        self.env.close().await
    }
}

/// Wrapper that ends episodes after a fixed number of steps
pub struct TimeLimit<E> {
    /// Inner environment
    pub env: E,
    /// Maximum steps
    pub max_steps: usize,
    /// Current step count
    pub steps: usize,
}

impl<E> TimeLimit<E> {
    /// Create a new time limit wrapper
    pub fn new(env: E, max_steps: usize) -> Self {
        Self {
            env,
            max_steps,
            steps: 0,
        }
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for TimeLimit<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeLimit")
            .field("env", &self.env)
            .field("max_steps", &self.max_steps)
            .field("steps", &self.steps)
            .finish()
    }
}

#[async_trait]
impl<E> Environment for TimeLimit<E>
where
    E: Environment,
{
    type Observation = E::Observation;
    type Action = E::Action;
    type State = E::State;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        self.env.action_space()
    }

    async fn reset(&mut self) -> corridor_rl_core::Result<(Self::Observation, StepInfo)> {
        self.steps = 0;
        self.env.reset().await
    }

    async fn step(
        &mut self,
        action: Self::Action,
    ) -> corridor_rl_core::Result<Step<Self::Observation, Self::State>> {
        self.steps += 1;
        let mut step = self.env.step(action).await?;

        if self.steps >= self.max_steps && !step.done {
            step.truncated = true;
            step.done = true;
        }

        Ok(step)
    }

    async fn render(&self) -> corridor_rl_core::Result<()> {
        self.env.render().await
    }

    async fn close(&mut self) -> corridor_rl_core::Result<()> {
        self.env.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corridor::{AgentState, CorridorEnv, Move};
    use approx::assert_relative_eq;
    use corridor_rl_core::GridObservation;

    #[tokio::test]
    async fn test_time_limit_truncates() {
        let mut env = TimeLimit::new(CorridorEnv::hallway().unwrap(), 2);
        env.reset().await.unwrap();

        let step = env.step(Move::Right.into()).await.unwrap();
        assert!(!step.done && !step.truncated);
        let step = env.step(Move::Right.into()).await.unwrap();
        assert!(step.done && step.truncated);
    }

    fn halved(reward: Reward, _step: &Step<GridObservation, AgentState>) -> Reward {
        reward * 0.5
    }

    #[tokio::test]
    async fn test_reward_wrapper_rescales() {
        let env = CorridorEnv::hallway().unwrap();
        let mut env = RewardWrapper::new(env, halved);
        env.reset().await.unwrap();

        // One step right from (1, 2) leaves distance 3; halved to -1.5.
        let step = env.step(Move::Right.into()).await.unwrap();
        assert_relative_eq!(step.reward.0, -1.5);
    }
}
