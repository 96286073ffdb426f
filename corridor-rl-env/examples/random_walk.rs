//! Example: random agent wandering the corridor room

use corridor_rl_core::ActionSpace;
use corridor_rl_env::{CorridorEnv, DiscreteSpace, Environment, TimeLimit, TrackedEnvironment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create the room environment with a time limit
    let env = CorridorEnv::room()?;
    let env = TimeLimit::new(env, 100);
    let mut env = TrackedEnvironment::new(env);

    // Uniform random moves
    let action_space = DiscreteSpace::new(4);

    let num_episodes = 10;
    let mut episode_rewards = Vec::new();

    for episode in 0..num_episodes {
        env.reset().await?;
        let mut total_reward = 0.0;
        let mut steps = 0;

        loop {
            let step = env.step(action_space.sample()).await?;
            total_reward += step.reward.0;
            steps += 1;

            if step.done || step.truncated {
                break;
            }
        }

        episode_rewards.push(total_reward);
        println!(
            "Episode {}: Total Reward = {:.2}, Steps = {}",
            episode + 1,
            total_reward,
            steps
        );
    }

    let avg_reward: f64 = episode_rewards.iter().sum::<f64>() / episode_rewards.len() as f64;
    println!("\nAverage Reward over {} episodes: {:.2}", num_episodes, avg_reward);

    env.close().await?;

    Ok(())
}
