//! Interactive terminal player for the corridor gridworlds
//!
//! Builds an environment by name and hands the keyboard to the player:
//! arrows or WASD move the agent, `q` quits. The board is drawn with the
//! per-glyph color tables from the environment crate.

use std::io::{stdout, Stdout, Write};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{read, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use corridor_rl_env::{
    art, make_env, BoxedEnv, DiscreteAction, Environment, EnvironmentConfig, GridObservation,
    GridPos, Move,
};

/// Which floor plan to play
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    /// 9 x 11 bordered room
    Room,
    /// 3 x 11 single-row hallway
    Hallway,
}

impl Variant {
    fn env_name(self) -> &'static str {
        match self {
            Variant::Room => "corridor-room",
            Variant::Hallway => "corridor-hallway",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "corridor-play", about = "Play the corridor gridworlds in the terminal")]
struct Args {
    /// Floor plan to play on
    #[arg(value_enum, default_value = "room")]
    variant: Variant,

    /// Goal cell as row,col (layout default when omitted)
    #[arg(long, value_parser = parse_cell)]
    goal: Option<GridPos>,

    /// Agent start cell as row,col (layout default when omitted)
    #[arg(long, value_parser = parse_cell)]
    agent: Option<GridPos>,

    /// End the episode after this many steps
    #[arg(long, default_value_t = 100)]
    max_steps: usize,
}

fn parse_cell(s: &str) -> Result<GridPos, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| "expected row,col".to_string())?;
    let row = row.trim().parse().map_err(|e| format!("bad row: {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad col: {e}"))?;
    Ok(GridPos::new(row, col))
}

fn to_color(rgb: art::Rgb) -> Color {
    // The palettes use the 0..=999 channel scale; the terminal wants 8-bit.
    let scale = |v: u16| ((u32::from(v) * 255) / 999) as u8;
    Color::Rgb {
        r: scale(rgb.0),
        g: scale(rgb.1),
        b: scale(rgb.2),
    }
}

fn draw(out: &mut Stdout, obs: &GridObservation, status: &str) -> Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    for (row_index, row) in obs.values.outer_iter().enumerate() {
        queue!(out, MoveTo(0, row_index as u16))?;
        for value in row.iter() {
            let glyph = art::glyph_for(*value);
            queue!(
                out,
                SetBackgroundColor(to_color(art::background_color(glyph))),
                SetForegroundColor(to_color(art::foreground_color(glyph))),
                Print(glyph),
            )?;
        }
        queue!(out, ResetColor)?;
    }
    queue!(
        out,
        MoveTo(0, obs.values.nrows() as u16 + 1),
        Print(status)
    )?;
    out.flush()?;
    Ok(())
}

async fn play(env: &mut BoxedEnv, mut obs: GridObservation, out: &mut Stdout) -> Result<(f64, usize)> {
    let mut total = 0.0;
    let mut steps = 0usize;
    let mut last_reward: Option<f64> = None;

    loop {
        let status = match last_reward {
            Some(r) => format!(
                "reward {r:+.0}  return {total:+.0}  steps {steps}  (arrows/WASD move, q quits)"
            ),
            None => "arrows/WASD move, q quits".to_string(),
        };
        draw(out, &obs, &status)?;

        let key = match read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };
        let mv = match key.code {
            KeyCode::Up | KeyCode::Char('w') => Move::Up,
            KeyCode::Down | KeyCode::Char('s') => Move::Down,
            KeyCode::Left | KeyCode::Char('a') => Move::Left,
            KeyCode::Right | KeyCode::Char('d') => Move::Right,
            KeyCode::Char('q') | KeyCode::Esc => break,
            _ => continue,
        };

        let step = env.step(DiscreteAction::from(mv)).await?;
        total += step.reward.0;
        steps += 1;
        last_reward = Some(step.reward.0);
        obs = step.observation;

        if step.done || step.truncated {
            draw(
                out,
                &obs,
                &format!("episode over  return {total:+.0}  steps {steps}  (any key exits)"),
            )?;
            let _ = read()?;
            break;
        }
    }

    Ok((total, steps))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = EnvironmentConfig::default();
    config.max_steps = Some(args.max_steps);
    if let Some(goal) = args.goal {
        config
            .params
            .insert("goal".into(), json!([goal.row, goal.col]));
    }
    if let Some(agent) = args.agent {
        config
            .params
            .insert("agent".into(), json!([agent.row, agent.col]));
    }

    let mut env = make_env(args.variant.env_name(), config)?;
    let (obs, _) = env.reset().await?;

    let mut out = stdout();
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide)?;

    let outcome = play(&mut env, obs, &mut out).await;

    // Restore the terminal before reporting anything, including errors.
    execute!(out, Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;

    let (total, steps) = outcome?;
    println!("episode return {total:+.0} over {steps} steps");

    env.close().await?;
    Ok(())
}
