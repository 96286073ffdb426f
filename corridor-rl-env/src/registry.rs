//! Environment registry for creation by name

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use corridor_rl_core::{
    DiscreteAction, EnvError, Environment, EnvironmentConfig, GridObservation,
};

use crate::corridor::{AgentState, CorridorConfig, CorridorEnv, CorridorLayout};

/// A boxed corridor-family environment
pub type BoxedEnv = Box<
    dyn Environment<Observation = GridObservation, Action = DiscreteAction, State = AgentState>,
>;

type EnvConstructor =
    Box<dyn Fn(EnvironmentConfig) -> corridor_rl_core::Result<BoxedEnv> + Send + Sync>;

lazy_static::lazy_static! {
    static ref REGISTRY: Arc<Mutex<EnvRegistry>> =
        Arc::new(Mutex::new(EnvRegistry::with_builtin_envs()));
}

/// Global environment registry
pub struct EnvRegistry {
    /// Registered environments
    envs: HashMap<String, EnvConstructor>,
}

impl EnvRegistry {
    fn new() -> Self {
        Self {
            envs: HashMap::new(),
        }
    }

    fn with_builtin_envs() -> Self {
        let mut registry = Self::new();
        registry.register("corridor-room", |config| {
            let config = CorridorConfig::from_env_config(CorridorLayout::Room, &config)?;
            Ok(Box::new(CorridorEnv::new(config)?) as BoxedEnv)
        });
        registry.register("corridor-hallway", |config| {
            let config = CorridorConfig::from_env_config(CorridorLayout::Hallway, &config)?;
            Ok(Box::new(CorridorEnv::new(config)?) as BoxedEnv)
        });
        registry
    }

    /// Register an environment constructor under a name
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(EnvironmentConfig) -> corridor_rl_core::Result<BoxedEnv> + Send + Sync + 'static,
    {
        self.envs.insert(name.into(), Box::new(constructor));
    }

    /// Create an environment by name
    pub fn make(&self, name: &str, config: EnvironmentConfig) -> corridor_rl_core::Result<BoxedEnv> {
        self.envs
            .get(name)
            .ok_or_else(|| EnvError::Environment(format!("Unknown environment: {name}")))
            .and_then(|constructor| constructor(config))
    }

    /// List registered environments
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.envs.keys().cloned().collect()
    }
}

/// Register an environment globally
pub fn register_env<F>(name: impl Into<String>, constructor: F)
where
    F: Fn(EnvironmentConfig) -> corridor_rl_core::Result<BoxedEnv> + Send + Sync + 'static,
{
    REGISTRY.lock().unwrap().register(name, constructor);
}

/// Create an environment by name
pub fn make_env(name: &str, config: EnvironmentConfig) -> corridor_rl_core::Result<BoxedEnv> {
    REGISTRY.lock().unwrap().make(name, config)
}

/// List all registered environments
#[must_use]
pub fn list_envs() -> Vec<String> {
    REGISTRY.lock().unwrap().list()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_envs_are_registered() {
        let names = list_envs();
        assert!(names.iter().any(|n| n == "corridor-room"));
        assert!(names.iter().any(|n| n == "corridor-hallway"));
    }

    #[tokio::test]
    async fn test_make_env_by_name() {
        let mut env = make_env("corridor-hallway", EnvironmentConfig::default()).unwrap();
        let (obs, _) = env.reset().await.unwrap();
        assert_eq!(obs.values.dim(), (3, 11));
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let err = make_env("corridor-basement", EnvironmentConfig::default()).unwrap_err();
        assert!(matches!(err, EnvError::Environment(_)));
    }

    #[tokio::test]
    async fn test_make_env_applies_param_overrides() {
        let mut config = EnvironmentConfig::default();
        config
            .params
            .insert("goal".into(), serde_json::json!([1, 9]));
        let mut env = make_env("corridor-hallway", config).unwrap();
        let (obs, _) = env.reset().await.unwrap();
        assert_eq!(obs.values[(1, 9)], 3.0);
    }
}
