//! Corridor gridworld environments
//!
//! A rectangular bordered room (or a single-row hallway) with one agent
//! and one goal cell. Every step pays out the negative Manhattan distance
//! between the two, so the signal climbs toward zero as the agent closes in.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod art;
pub mod corridor;
pub mod registry;
pub mod wrappers;

// Re-export environments
pub use art::GameArt;
pub use corridor::{
    AgentState, CorridorConfig, CorridorEnv, CorridorLayout, ManhattanReward, Move,
};
pub use registry::{list_envs, make_env, register_env, BoxedEnv, EnvRegistry};
pub use wrappers::{RewardWrapper, TimeLimit};

// Re-export core types
pub use corridor_rl_core::{
    Action, ActionSpace, DiscreteAction, DiscreteSpace, EnvError, Environment,
    EnvironmentConfig, Episode, GridObservation, GridObservationSpace, GridPos, Observation,
    ObservationSpace, Result, Reward, RewardFunction, State, Step, StepInfo, Terminal,
    TrackedEnvironment,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        make_env, CorridorConfig, CorridorEnv, CorridorLayout, GameArt, Move, TimeLimit,
    };
    pub use corridor_rl_core::prelude::*;
}
