//! Property and episode-flow tests for the corridor environments

use proptest::prelude::*;

use corridor_rl_env::{
    art, CorridorConfig, CorridorEnv, DiscreteAction, DiscreteSpace, Environment,
    EnvironmentConfig, GameArt, GridPos, ManhattanReward, Move, TimeLimit, TrackedEnvironment,
};
use corridor_rl_core::{ActionSpace, RewardFunction};

fn interior_cell() -> impl Strategy<Value = GridPos> {
    // Interior of the 9 x 11 room: everything inside the wall border.
    (1usize..8, 1usize..10).prop_map(|(row, col)| GridPos::new(row, col))
}

proptest! {
    #[test]
    fn placed_room_art_keeps_its_invariants(goal in interior_cell(), agent in interior_cell()) {
        prop_assume!(goal != agent);

        let placed = GameArt::room()
            .with_goal(goal)
            .unwrap()
            .with_agent(agent)
            .unwrap();

        // Exactly one goal and one agent glyph.
        prop_assert_eq!(placed.goal(), Some(goal));
        prop_assert_eq!(placed.agent(), Some(agent));
        let lines = placed.lines();
        let goals: usize = lines.iter().map(|l| l.matches(art::GOAL).count()).sum();
        let agents: usize = lines.iter().map(|l| l.matches(art::AGENT).count()).sum();
        prop_assert_eq!(goals, 1);
        prop_assert_eq!(agents, 1);

        // Shape and wall border unchanged.
        prop_assert_eq!(placed.rows(), 9);
        prop_assert_eq!(placed.cols(), 11);
        let base = GameArt::room();
        for row in 0..placed.rows() {
            for col in 0..placed.cols() {
                let pos = GridPos::new(row, col);
                if base.glyph(pos) == Some(art::WALL) {
                    prop_assert_eq!(placed.glyph(pos), Some(art::WALL));
                }
            }
        }
    }

    #[test]
    fn reward_is_negative_manhattan_distance(goal in interior_cell(), agent in interior_cell()) {
        let reward_fn = ManhattanReward { goal };
        let reward = reward_fn.reward(&agent, &DiscreteAction(0), &agent);

        let expected = goal.row.abs_diff(agent.row) + goal.col.abs_diff(agent.col);
        prop_assert_eq!(reward.0, -(expected as f64));
        prop_assert_eq!(reward.0 == 0.0, agent == goal);
    }
}

#[test]
fn equal_distances_pay_equal_rewards_everywhere() {
    let goal = GridPos::new(2, 9);
    let reward_fn = ManhattanReward { goal };
    let action = DiscreteAction(0);

    // Exhaustive over every pair of interior cells in the room.
    for row_a in 1..8 {
        for col_a in 1..10 {
            for row_b in 1..8 {
                for col_b in 1..10 {
                    let a = GridPos::new(row_a, col_a);
                    let b = GridPos::new(row_b, col_b);
                    if a.manhattan_distance(&goal) == b.manhattan_distance(&goal) {
                        assert_eq!(
                            reward_fn.reward(&a, &action, &a),
                            reward_fn.reward(&b, &action, &b),
                            "cells {a} and {b} sit at the same distance from {goal}"
                        );
                    }
                }
            }
        }
    }
}

#[tokio::test]
async fn random_episode_totals_match_the_step_rewards() {
    let env = CorridorEnv::room().unwrap();
    let env = TimeLimit::new(env, 25);
    let mut env = TrackedEnvironment::new(env);
    let action_space = DiscreteSpace::new(4);

    env.reset().await.unwrap();
    let mut total = 0.0;
    loop {
        let step = env.step(action_space.sample()).await.unwrap();
        total += step.reward.0;
        if step.done || step.truncated {
            break;
        }
    }

    let episode = env.episode_info().expect("an episode was in flight");
    assert_eq!(episode.steps, 25);
    assert!(episode.truncated);
    assert!((episode.total_reward - total).abs() < 1e-9);
}

#[tokio::test]
async fn walking_the_hallway_reaches_zero_reward() {
    let config = CorridorConfig::hallway().with_max_steps(10);
    let mut env = CorridorEnv::new(config).unwrap();
    env.reset().await.unwrap();

    // Start (1, 2), goal (1, 6): four steps right walk the reward up
    // from -4 to 0.
    let mut rewards = Vec::new();
    for _ in 0..4 {
        let step = env.step(Move::Right.into()).await.unwrap();
        rewards.push(step.reward.0);
    }
    assert_eq!(rewards, vec![-3.0, -2.0, -1.0, 0.0]);
}

#[tokio::test]
async fn registry_built_env_plays_through_the_trait_object() {
    let mut config = EnvironmentConfig::default();
    config.max_steps = Some(5);
    let mut env = corridor_rl_env::make_env("corridor-room", config).unwrap();

    let (obs, _) = env.reset().await.unwrap();
    assert_eq!(obs.values.dim(), (9, 11));

    let mut last = None;
    for _ in 0..5 {
        last = Some(env.step(DiscreteAction(3)).await.unwrap());
    }
    let last = last.unwrap();
    assert!(last.truncated);
}
