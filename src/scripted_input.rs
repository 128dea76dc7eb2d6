use std::{fs, path::Path};

use crate::{
    engine::{Direction, Intent},
    error::ScriptError,
};

/// A queue of intents read from a replay script. Each non-comment line is
/// a run of single-character commands; whitespace is ignored.
pub struct ScriptedInput {
    script_commands: Vec<Intent>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut script_commands = Vec::new();
        for (line_idx, line) in text.lines().enumerate() {
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            for command in trimmed_line.chars().filter(|c| !c.is_whitespace()) {
                let intent = char_to_intent(command).ok_or(ScriptError::UnknownCommand {
                    line: line_idx + 1,
                    command,
                })?;
                script_commands.push(intent);
            }
        }
        tracing::debug!(commands = script_commands.len(), "parsed replay script");
        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    pub fn next_intent(&mut self) -> Option<Intent> {
        let intent = self.script_commands.get(self.current_command_index).copied()?;
        self.current_command_index += 1;
        Some(intent)
    }

    pub fn len(&self) -> usize {
        self.script_commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script_commands.is_empty()
    }
}

impl Iterator for ScriptedInput {
    type Item = Intent;

    fn next(&mut self) -> Option<Intent> {
        self.next_intent()
    }
}

fn char_to_intent(c: char) -> Option<Intent> {
    let intent = match c.to_ascii_lowercase() {
        'w' | 'k' => Intent::Move(Direction::North),
        's' | 'j' => Intent::Move(Direction::South),
        'a' | 'h' => Intent::Move(Direction::West),
        'd' | 'l' => Intent::Move(Direction::East),
        '.' => Intent::Wait,
        'i' => Intent::ToggleInventory,
        'x' | '\x1B' => Intent::Cancel,
        'u' | 'e' => Intent::UseSelected,
        'r' => Intent::DropSelected,
        ']' => Intent::SelectNext,
        '[' => Intent::SelectPrevious,
        '>' => Intent::Descend,
        'c' => Intent::Confirm,
        _ => return None,
    };
    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let script = "# walk east then rest\n\ndd .\n  # trailing note\ni]u x\n";
        let intents: Vec<Intent> = ScriptedInput::parse(script).unwrap().collect();
        assert_eq!(
            intents,
            vec![
                Intent::Move(Direction::East),
                Intent::Move(Direction::East),
                Intent::Wait,
                Intent::ToggleInventory,
                Intent::SelectNext,
                Intent::UseSelected,
                Intent::Cancel,
            ]
        );
    }

    #[test]
    fn vi_keys_and_wasd_agree() {
        let vi: Vec<Intent> = ScriptedInput::parse("hjkl").unwrap().collect();
        let wasd: Vec<Intent> = ScriptedInput::parse("aswd").unwrap().collect();
        assert_eq!(vi, wasd);
    }

    #[test]
    fn unknown_command_reports_its_line() {
        match ScriptedInput::parse("dd\n# fine\nd?d") {
            Err(ScriptError::UnknownCommand { line, command }) => {
                assert_eq!(line, 3);
                assert_eq!(command, '?');
            }
            other => panic!("expected unknown command, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn exhausted_script_yields_nothing() {
        let mut script = ScriptedInput::parse(">c").unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.next_intent(), Some(Intent::Descend));
        assert_eq!(script.next_intent(), Some(Intent::Confirm));
        assert_eq!(script.next_intent(), None);
        assert!(ScriptedInput::parse("# only comments").unwrap().is_empty());
    }
}
