mod render;

use std::{
    collections::VecDeque,
    path::PathBuf,
    time::{Duration, Instant},
};

use bracket_terminal::prelude::*;
use clap::Parser;
use deepdelve::{Direction, Engine, EngineConfig, EngineState, Intent, Phase, ScriptedInput};
use render::draw_scene;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "deepdelve")]
#[command(version, about = "Deepdelve - twelve floors down, one step at a time", long_about = None)]
struct Args {
    /// Seed for a reproducible run (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a command script headlessly instead of opening a terminal
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print the final snapshot as JSON after a scripted run
    #[arg(long)]
    dump: bool,
}

/// Drops key events that arrive faster than the configured cooldown.
struct InputGate {
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl InputGate {
    fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: None,
        }
    }

    fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

struct DeepDelveState {
    engine: Engine,
    snapshot: EngineState,
    pending: VecDeque<Intent>,
    gate: InputGate,
}

impl DeepDelveState {
    fn new(engine: Engine) -> Self {
        let cooldown = Duration::from_millis(engine.config().input_cooldown_ms);
        let snapshot = engine.state();
        Self {
            engine,
            snapshot,
            pending: VecDeque::new(),
            gate: InputGate::new(cooldown),
        }
    }

    fn handle_input(&mut self, ctx: &mut BTerm) {
        let Some(key) = ctx.key else {
            return;
        };
        if matches!(self.snapshot.phase, Phase::Dead | Phase::Victory)
            && key == VirtualKeyCode::Escape
        {
            ctx.quit();
            return;
        }
        if !self.gate.accept(Instant::now()) {
            return;
        }
        if let Some(intent) = intent_for_key(key, ctx.shift, self.snapshot.phase) {
            self.pending.push_back(intent);
        }
    }
}

impl GameState for DeepDelveState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        if let Some(intent) = self.pending.pop_front() {
            self.snapshot = self.engine.step(intent);
        }
        draw_scene(ctx, &self.snapshot);
    }
}

fn intent_for_key(key: VirtualKeyCode, shift: bool, phase: Phase) -> Option<Intent> {
    use VirtualKeyCode as K;
    match phase {
        Phase::Playing => match key {
            K::Left | K::A | K::H => Some(Intent::Move(Direction::West)),
            K::Right | K::D | K::L => Some(Intent::Move(Direction::East)),
            K::Up | K::W | K::K => Some(Intent::Move(Direction::North)),
            K::Down | K::S | K::J => Some(Intent::Move(Direction::South)),
            K::Period if shift => Some(Intent::Descend),
            K::Return | K::PageDown => Some(Intent::Descend),
            K::Period | K::Space => Some(Intent::Wait),
            K::I | K::Tab => Some(Intent::ToggleInventory),
            _ => None,
        },
        Phase::Inventory => match key {
            K::Up | K::W | K::K => Some(Intent::SelectPrevious),
            K::Down | K::S | K::J => Some(Intent::SelectNext),
            K::Return | K::E | K::U => Some(Intent::UseSelected),
            K::R => Some(Intent::DropSelected),
            K::Escape | K::I | K::Tab => Some(Intent::Cancel),
            _ => None,
        },
        Phase::Dead | Phase::Victory => match key {
            K::Return | K::C => Some(Intent::Confirm),
            _ => None,
        },
    }
}

fn load_config(args: &Args) -> Result<EngineConfig, deepdelve::ConfigError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn run_script(engine: &mut Engine, script: ScriptedInput, dump: bool) -> BError {
    let mut state = engine.state();
    let mut applied = 0usize;
    for intent in script {
        state = engine.step(intent);
        applied += 1;
    }
    tracing::info!(
        applied,
        depth = state.depth,
        turn = state.turn,
        phase = ?state.phase,
        "script finished"
    );
    if dump {
        println!("{}", state.to_json()?);
    } else {
        println!(
            "{:?} on floor {} after {} turns: hp {}/{}, level {}, {} gold",
            state.phase,
            state.depth,
            state.turn,
            state.player.hp,
            state.player.max_hp,
            state.player.level,
            state.player.gold
        );
    }
    Ok(())
}

fn main() -> BError {
    let args = Args::parse();

    // The terminal UI owns stdout and stderr, so only headless runs log.
    if args.script.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }

    let config = load_config(&args)?;
    let mut engine = Engine::new(config)?;

    if let Some(path) = &args.script {
        let script = ScriptedInput::from_file(path)?;
        return run_script(&mut engine, script, args.dump);
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Deepdelve")
        .build()?;
    main_loop(context, DeepDelveState::new(engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_drops_keys_inside_the_cooldown() {
        let mut gate = InputGate::new(Duration::from_millis(120));
        let start = Instant::now();
        assert!(gate.accept(start));
        assert!(!gate.accept(start + Duration::from_millis(50)));
        assert!(gate.accept(start + Duration::from_millis(130)));
    }

    #[test]
    fn keys_follow_the_phase() {
        assert_eq!(
            intent_for_key(VirtualKeyCode::K, false, Phase::Playing),
            Some(Intent::Move(Direction::North))
        );
        assert_eq!(
            intent_for_key(VirtualKeyCode::K, false, Phase::Inventory),
            Some(Intent::SelectPrevious)
        );
        assert_eq!(
            intent_for_key(VirtualKeyCode::Period, true, Phase::Playing),
            Some(Intent::Descend)
        );
        assert_eq!(
            intent_for_key(VirtualKeyCode::Period, false, Phase::Playing),
            Some(Intent::Wait)
        );
        assert_eq!(intent_for_key(VirtualKeyCode::W, false, Phase::Dead), None);
    }
}
