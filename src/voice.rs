//! Voice command parsing.
//!
//! Speech recognition happens elsewhere; this module only maps a transcript
//! onto the spawn and reset entry points.

use crate::engine::Engine;
use crate::world::body::{BodyId, ShapeHint};

/// A recognised command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Spawn a body, optionally of a named family.
    Spawn(Option<ShapeHint>),
    /// Clear the scene.
    Reset,
}

/// What running a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// A body was created.
    Spawned(BodyId),
    /// The scene was cleared.
    Reset,
}

const RESET_WORDS: [&str; 2] = ["reset", "clear"];
const SPAWN_WORDS: [&str; 4] = ["spawn", "add", "ball", "box"];
const CIRCLE_WORDS: [&str; 2] = ["ball", "circle"];
const BOX_WORDS: [&str; 2] = ["box", "square"];

impl VoiceCommand {
    /// Parses a transcript, ignoring case and punctuation.
    ///
    /// Reset words win over spawn words.
    ///
    /// # Examples
    /// ```
    /// use palmtide::voice::VoiceCommand;
    /// use palmtide::world::body::ShapeHint;
    /// assert_eq!(
    ///     VoiceCommand::parse("Add a ball!"),
    ///     Some(VoiceCommand::Spawn(Some(ShapeHint::Circle)))
    /// );
    /// assert_eq!(VoiceCommand::parse("clear everything"), Some(VoiceCommand::Reset));
    /// assert_eq!(VoiceCommand::parse("hello"), None);
    /// ```
    #[must_use]
    pub fn parse(transcript: &str) -> Option<Self> {
        let lowered = transcript.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let mentions = |vocabulary: &[&str]| {
            words
                .iter()
                .any(|word| vocabulary.iter().any(|known| known == word))
        };

        if mentions(RESET_WORDS.as_slice()) {
            return Some(Self::Reset);
        }
        if !mentions(SPAWN_WORDS.as_slice()) {
            return None;
        }
        let hint = if mentions(CIRCLE_WORDS.as_slice()) {
            Some(ShapeHint::Circle)
        } else if mentions(BOX_WORDS.as_slice()) {
            Some(ShapeHint::Box)
        } else {
            None
        };
        Some(Self::Spawn(hint))
    }

    /// Runs the command against `engine`.
    pub fn apply(self, engine: &mut Engine) -> VoiceOutcome {
        match self {
            Self::Spawn(Some(hint)) => VoiceOutcome::Spawned(engine.spawn_body(hint)),
            Self::Spawn(None) => VoiceOutcome::Spawned(engine.spawn_random_body()),
            Self::Reset => {
                engine.reset_scene();
                VoiceOutcome::Reset
            }
        }
    }
}
