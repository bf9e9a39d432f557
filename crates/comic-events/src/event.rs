//! Event Types
//!
//! The tagged, timestamped narrative events extracted from a session
//! transcript. Events are produced upstream and consumed read-only by the
//! planner.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Primary event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Dialogue,
    Action,
    Combat,
    Roll,
    Narration,
    SceneTransition,
}

impl EventKind {
    /// Returns the lowercase tag used in config files and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Dialogue => "dialogue",
            EventKind::Action => "action",
            EventKind::Combat => "combat",
            EventKind::Roll => "roll",
            EventKind::Narration => "narration",
            EventKind::SceneTransition => "scene_transition",
        }
    }

    /// Returns all event kind variants.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Dialogue,
            EventKind::Action,
            EventKind::Combat,
            EventKind::Roll,
            EventKind::Narration,
            EventKind::SceneTransition,
        ]
    }

    /// True for the kinds that depict physical action on the page.
    pub fn is_physical(&self) -> bool {
        matches!(self, EventKind::Combat | EventKind::Action)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dice roll was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicKind {
    Attack,
    Damage,
    SavingThrow,
}

static DICE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+d\d+(?:[+-]\d+)?)").ok());

static RESULT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:hit|damage|total)").ok());

/// Structured game-mechanics payload attached to roll events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanics {
    /// Dice notation such as `1d20+5`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<String>,
    /// Numeric result of the roll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<i64>,
    /// What the roll resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MechanicKind>,
}

impl Mechanics {
    /// Extracts dice notation, result and roll kind from a raw roll line.
    ///
    /// Missing pieces are left as `None`; a line with nothing recognizable
    /// yields an empty payload.
    pub fn from_roll_line(line: &str) -> Self {
        let dice = DICE_PATTERN
            .as_ref()
            .and_then(|re| re.captures(line))
            .map(|caps| caps[1].to_string());

        let result = RESULT_PATTERN
            .as_ref()
            .and_then(|re| re.captures(line))
            .and_then(|caps| caps[1].parse().ok());

        let lower = line.to_lowercase();
        let kind = if lower.contains("attack") {
            Some(MechanicKind::Attack)
        } else if lower.contains("damage") {
            Some(MechanicKind::Damage)
        } else if lower.contains("save") {
            Some(MechanicKind::SavingThrow)
        } else {
            None
        };

        Self { dice, result, kind }
    }

    /// True when no field was populated.
    pub fn is_empty(&self) -> bool {
        self.dice.is_none() && self.result.is_none() && self.kind.is_none()
    }
}

/// One atomic, timestamped occurrence in the session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier
    pub id: String,
    /// When the event happened
    pub timestamp: NaiveDateTime,
    /// Event category
    #[serde(rename = "event_type")]
    pub kind: EventKind,
    /// Free-text description
    pub description: String,
    /// Character who spoke or acted, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Characters involved (no duplicates)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
    /// Where the event happened, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Short spoken-line extract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    /// Character targeted by the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Dice and roll details
    #[serde(default, skip_serializing_if = "Mechanics::is_empty")]
    pub mechanics: Mechanics,
}

impl Event {
    /// Creates an event with no speaker, participants, location or payload.
    pub fn new(
        id: impl Into<String>,
        timestamp: NaiveDateTime,
        kind: EventKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            kind,
            description: description.into(),
            speaker: None,
            participants: Vec::new(),
            location_id: None,
            dialogue: None,
            target: None,
            mechanics: Mechanics::default(),
        }
    }

    /// Sets the speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Adds a participant, ignoring duplicates.
    pub fn with_participant(mut self, participant: impl Into<String>) -> Self {
        let id = participant.into();
        if !self.participants.contains(&id) {
            self.participants.push(id);
        }
        self
    }

    /// Sets the location.
    pub fn at_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// Sets the spoken line.
    pub fn with_dialogue(mut self, line: impl Into<String>) -> Self {
        self.dialogue = Some(line.into());
        self
    }

    /// Sets the target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attaches a mechanics payload.
    pub fn with_mechanics(mut self, mechanics: Mechanics) -> Self {
        self.mechanics = mechanics;
        self
    }

    /// Returns the speaker followed by every participant, without duplicates.
    pub fn character_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.participants.len() + 1);
        for id in self.speaker.iter().chain(self.participants.iter()) {
            if !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }
        ids
    }

    /// First line of the description.
    pub fn headline(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }

    /// Parses an event from a single JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Serializes the event as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Error decoding an event stream.
#[derive(Debug, Error)]
#[error("invalid event on line {line}: {source}")]
pub struct EventParseError {
    /// 1-based line number of the offending record
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parses a JSON Lines event stream, skipping blank lines.
pub fn parse_event_stream(content: &str) -> Result<Vec<Event>, EventParseError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            Event::from_jsonl(line).map_err(|source| EventParseError { line: i + 1, source })
        })
        .collect()
}
