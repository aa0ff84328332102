//! Parsing of scripted input streams such as `"RRUU.L"`.

use thiserror::Error;

/// One scripted player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Direction intent delivered to the player.
    Move { dx: i32, dy: i32 },
    /// Let one clock step pass without acting.
    Wait,
}

/// Errors raised while parsing a script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The script contained a character with no meaning.
    #[error("unexpected character '{character}' at position {index} in script")]
    UnexpectedCharacter {
        /// Offending character.
        character: char,
        /// Zero-based character offset.
        index: usize,
    },
}

/// Parses a script of `U`, `D`, `L`, `R` moves and `.` waits.
///
/// Letters are case-insensitive; whitespace and commas are ignored.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, character)| !character.is_whitespace() && *character != ',')
        .map(|(index, character)| {
            let step = match character.to_ascii_uppercase() {
                'U' => Step::Move { dx: 0, dy: 1 },
                'D' => Step::Move { dx: 0, dy: -1 },
                'L' => Step::Move { dx: -1, dy: 0 },
                'R' => Step::Move { dx: 1, dy: 0 },
                '.' => Step::Wait,
                _ => return Err(ScriptError::UnexpectedCharacter { character, index }),
            };
            Ok(step)
        })
        .collect()
}
