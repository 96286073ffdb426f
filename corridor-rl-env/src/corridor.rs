//! The corridor environments
//!
//! Two floor plans share one implementation: the full bordered room and the
//! single-row hallway. Each step pays out the negative Manhattan distance
//! between the agent and the fixed goal cell; the environment itself never
//! terminates an episode, it only truncates when a step limit is set.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use corridor_rl_core::{
    ActionSpace, DiscreteAction, DiscreteSpace, EnvError, Environment, EnvironmentConfig,
    GridObservation, GridObservationSpace, GridPos, ObservationSpace, Result, Reward,
    RewardFunction, State, Step, StepInfo, Terminal,
};

use crate::art::{self, GameArt};

/// One of the four cardinal moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Decrease row
    Up,
    /// Increase row
    Down,
    /// Decrease column
    Left,
    /// Increase column
    Right,
}

impl Move {
    /// All moves in action-index order
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Signed (row, col) delta of the move
    #[must_use]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// Index of the move in the discrete action space
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }
}

impl TryFrom<DiscreteAction> for Move {
    type Error = EnvError;

    fn try_from(action: DiscreteAction) -> Result<Self> {
        Move::ALL
            .get(action.0)
            .copied()
            .ok_or_else(|| EnvError::InvalidAction(format!("no move with index {}", action.0)))
    }
}

impl From<Move> for DiscreteAction {
    fn from(mv: Move) -> Self {
        DiscreteAction(mv.index())
    }
}

/// Internal state: where the agent stands relative to the fixed goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    /// Current agent cell
    pub position: GridPos,
    /// Fixed goal cell
    pub goal: GridPos,
    /// Terminal status
    pub terminal: Terminal,
}

impl State for AgentState {
    fn features(&self) -> Vec<f64> {
        vec![
            self.position.row as f64,
            self.position.col as f64,
            self.goal.row as f64,
            self.goal.col as f64,
        ]
    }

    fn is_terminal(&self) -> bool {
        self.terminal.is_terminal()
    }
}

/// Negative Manhattan distance to a fixed goal cell.
///
/// Zero exactly when the agent stands on the goal.
#[derive(Debug, Clone, Copy)]
pub struct ManhattanReward {
    /// The goal cell
    pub goal: GridPos,
}

impl RewardFunction for ManhattanReward {
    type State = GridPos;
    type Action = DiscreteAction;

    fn reward(&self, _state: &GridPos, _action: &DiscreteAction, next_state: &GridPos) -> Reward {
        let distance = next_state.manhattan_distance(&self.goal);
        Reward(-(distance as f64))
    }
}

/// Which floor plan to play on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorridorLayout {
    /// 9 x 11 bordered room
    Room,
    /// 3 x 11 single-row hallway
    Hallway,
}

impl CorridorLayout {
    /// The layout's base floor plan, before goal and agent placement
    #[must_use]
    pub fn base_art(self) -> GameArt {
        match self {
            CorridorLayout::Room => GameArt::room(),
            CorridorLayout::Hallway => GameArt::hallway(),
        }
    }

    /// Default goal cell for the layout
    #[must_use]
    pub fn default_goal(self) -> GridPos {
        match self {
            CorridorLayout::Room => GridPos::new(2, 9),
            CorridorLayout::Hallway => GridPos::new(1, 6),
        }
    }

    /// Default agent start cell for the layout
    #[must_use]
    pub fn default_agent(self) -> GridPos {
        match self {
            CorridorLayout::Room => GridPos::new(4, 4),
            CorridorLayout::Hallway => GridPos::new(1, 2),
        }
    }
}

/// Configuration for [`CorridorEnv`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorConfig {
    /// Floor plan
    pub layout: CorridorLayout,
    /// Goal cell; the layout default when `None`
    pub goal: Option<GridPos>,
    /// Agent start cell; the layout default when `None`
    pub agent_start: Option<GridPos>,
    /// Truncate episodes after this many steps
    pub max_steps: Option<usize>,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self::room()
    }
}

impl CorridorConfig {
    /// Configuration for the room layout with its default placements
    #[must_use]
    pub fn room() -> Self {
        Self {
            layout: CorridorLayout::Room,
            goal: None,
            agent_start: None,
            max_steps: None,
        }
    }

    /// Configuration for the hallway layout with its default placements
    #[must_use]
    pub fn hallway() -> Self {
        Self {
            layout: CorridorLayout::Hallway,
            ..Self::room()
        }
    }

    /// Override the goal cell
    #[must_use]
    pub fn with_goal(mut self, goal: GridPos) -> Self {
        self.goal = Some(goal);
        self
    }

    /// Override the agent start cell
    #[must_use]
    pub fn with_agent_start(mut self, start: GridPos) -> Self {
        self.agent_start = Some(start);
        self
    }

    /// Set the episode step limit
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Read goal/agent overrides out of a generic [`EnvironmentConfig`].
    ///
    /// Coordinates are `[row, col]` arrays under the `"goal"` and `"agent"`
    /// params keys.
    pub fn from_env_config(layout: CorridorLayout, config: &EnvironmentConfig) -> Result<Self> {
        let mut out = Self {
            layout,
            goal: None,
            agent_start: None,
            max_steps: config.max_steps,
        };
        if let Some(value) = config.params.get("goal") {
            let [row, col]: [usize; 2] = serde_json::from_value(value.clone())?;
            out.goal = Some(GridPos::new(row, col));
        }
        if let Some(value) = config.params.get("agent") {
            let [row, col]: [usize; 2] = serde_json::from_value(value.clone())?;
            out.agent_start = Some(GridPos::new(row, col));
        }
        Ok(out)
    }
}

/// The corridor gridworld
#[derive(Debug)]
pub struct CorridorEnv {
    layout: CorridorLayout,
    /// Board with the goal placed; the agent is an overlay drawn per step
    board: GameArt,
    start: GridPos,
    goal: GridPos,
    agent: GridPos,
    reward_fn: ManhattanReward,
    steps: usize,
    max_steps: Option<usize>,
    hidden_reward: f64,
    episodic_performances: Vec<f64>,
    episode_active: bool,
}

impl CorridorEnv {
    /// Build an environment from a configuration.
    ///
    /// Placements are validated up front: out-of-bounds cells, walls, and
    /// agent/goal collisions are construction errors.
    pub fn new(config: CorridorConfig) -> Result<Self> {
        let layout = config.layout;
        let goal = config.goal.unwrap_or_else(|| layout.default_goal());
        let start = config.agent_start.unwrap_or_else(|| layout.default_agent());

        // The stored board keeps only the goal so the agent overlay can move
        // freely; the fully placed copy exists just to run the checks.
        let board = layout.base_art().with_goal(goal)?;
        board.with_agent(start)?;

        debug!(?layout, %goal, %start, "corridor environment built");

        Ok(Self {
            layout,
            board,
            start,
            goal,
            agent: start,
            reward_fn: ManhattanReward { goal },
            steps: 0,
            max_steps: config.max_steps,
            hidden_reward: 0.0,
            episodic_performances: Vec::new(),
            episode_active: false,
        })
    }

    /// Room layout with the original placements: goal (2, 9), agent (4, 4)
    pub fn room() -> Result<Self> {
        Self::new(CorridorConfig::room())
    }

    /// Hallway layout with the original placements: goal (1, 6), agent (1, 2)
    pub fn hallway() -> Result<Self> {
        Self::new(CorridorConfig::hallway())
    }

    /// The floor plan in play
    #[must_use]
    pub fn layout(&self) -> CorridorLayout {
        self.layout
    }

    /// Current agent cell
    #[must_use]
    pub fn agent_position(&self) -> GridPos {
        self.agent
    }

    /// The fixed goal cell
    #[must_use]
    pub fn goal_position(&self) -> GridPos {
        self.goal
    }

    /// Steps taken since the last reset
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Board with the agent drawn over its current cell
    #[must_use]
    pub fn board(&self) -> GameArt {
        self.board.stamped(art::AGENT, self.agent)
    }

    /// Add to the hidden performance signal, distinct from the step reward
    pub fn add_hidden_reward(&mut self, amount: f64) {
        self.hidden_reward += amount;
    }

    /// Hidden performance accumulated in the current episode
    #[must_use]
    pub fn hidden_reward(&self) -> f64 {
        self.hidden_reward
    }

    /// Hidden performance of each finished episode, oldest first
    #[must_use]
    pub fn episodic_performances(&self) -> &[f64] {
        &self.episodic_performances
    }

    fn observation(&self) -> GridObservation {
        GridObservation::new(self.board().to_values())
    }

    fn end_episode(&mut self) {
        if self.episode_active {
            self.episodic_performances.push(self.hidden_reward);
            self.episode_active = false;
        }
    }
}

#[async_trait]
impl Environment for CorridorEnv {
    type Observation = GridObservation;
    type Action = DiscreteAction;
    type State = AgentState;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        Box::new(GridObservationSpace::new(
            self.board.rows(),
            self.board.cols(),
            vec![0.0, 1.0, 2.0, 3.0],
        ))
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        Box::new(DiscreteSpace::new(Move::ALL.len()))
    }

    async fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        self.end_episode();
        self.agent = self.start;
        self.steps = 0;
        self.hidden_reward = 0.0;
        self.episode_active = true;

        debug!(agent = %self.agent, goal = %self.goal, "reset");
        Ok((self.observation(), StepInfo::default()))
    }

    async fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation, Self::State>> {
        let mv = Move::try_from(action)?;
        let previous = self.agent;

        // Walls are impassable: a blocked move leaves the agent in place.
        let (drow, dcol) = mv.delta();
        if let Some(next) = self.agent.offset(drow, dcol) {
            if !self.board.is_impassable(next) {
                self.agent = next;
            }
        }
        self.steps += 1;

        let reward = self.reward_fn.reward(&previous, &action, &self.agent);
        let truncated = self.max_steps.map_or(false, |limit| self.steps >= limit);
        if truncated {
            self.end_episode();
        }

        trace!(action = ?mv, position = %self.agent, reward = reward.0, "step");

        Ok(Step {
            observation: self.observation(),
            reward,
            done: false,
            truncated,
            info: StepInfo::default(),
            state: Some(AgentState {
                position: self.agent,
                goal: self.goal,
                terminal: if truncated {
                    Terminal::Truncated
                } else {
                    Terminal::No
                },
            }),
        })
    }

    async fn render(&self) -> Result<()> {
        for line in self.board().lines() {
            tracing::info!(target: "corridor", "{line}");
        }
        Ok(())
    }
}
