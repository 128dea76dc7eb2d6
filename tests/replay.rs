use deepdelve::{Engine, EngineConfig, Intent, Phase, ScriptedInput};

const WANDER: &str = "\
# a short loop around the first room
dddd ssss aaaa wwww
....
i]][ x
> ddssaaww
";

fn seeded(seed: u64) -> Engine {
    Engine::new(EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    })
    .unwrap()
}

fn replay(seed: u64, script: &str) -> String {
    let mut engine = seeded(seed);
    let mut state = engine.state();
    for intent in ScriptedInput::parse(script).unwrap() {
        state = engine.step(intent);
    }
    state.to_json().unwrap()
}

#[test]
fn replays_are_deterministic() {
    for seed in [1, 7, 2024] {
        assert_eq!(replay(seed, WANDER), replay(seed, WANDER));
    }
}

#[test]
fn snapshot_json_carries_the_whole_view() {
    let json = replay(7, WANDER);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "phase", "depth", "turn", "tiles", "visible", "explored", "player", "monsters", "items",
        "message", "log", "selected",
    ] {
        assert!(value.get(key).is_some(), "snapshot lacks {key}");
    }
    assert_eq!(value["tiles"].as_array().map(Vec::len), Some(32 * 28));
}

#[test]
fn rejected_intents_leave_no_trace() {
    let mut engine = seeded(11);
    let before = engine.state().to_json().unwrap();
    for intent in [
        Intent::Cancel,
        Intent::Confirm,
        Intent::UseSelected,
        Intent::DropSelected,
        Intent::SelectNext,
    ] {
        engine.step(intent);
    }
    assert_eq!(engine.phase(), Phase::Playing);
    assert_eq!(engine.state().to_json().unwrap(), before);
}

#[test]
fn turns_only_advance_by_one() {
    let mut engine = seeded(3);
    let mut last_turn = engine.turn();
    for intent in ScriptedInput::parse(&WANDER.repeat(6)).unwrap() {
        let state = engine.step(intent);
        assert!(state.turn == last_turn || state.turn == last_turn + 1);
        last_turn = state.turn;
        if state.phase == Phase::Dead {
            break;
        }
    }
}

#[test]
fn a_bad_config_is_refused() {
    let config = EngineConfig {
        fov_rays: 0,
        ..EngineConfig::default()
    };
    assert!(Engine::new(config).is_err());
}
