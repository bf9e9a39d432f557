//! Characters and locations referenced by events.

use serde::{Deserialize, Serialize};

/// Character classes recognized in character sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl CharacterClass {
    /// Parses a class name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        let class = match name.trim().to_lowercase().as_str() {
            "barbarian" => CharacterClass::Barbarian,
            "bard" => CharacterClass::Bard,
            "cleric" => CharacterClass::Cleric,
            "druid" => CharacterClass::Druid,
            "fighter" => CharacterClass::Fighter,
            "monk" => CharacterClass::Monk,
            "paladin" => CharacterClass::Paladin,
            "ranger" => CharacterClass::Ranger,
            "rogue" => CharacterClass::Rogue,
            "sorcerer" => CharacterClass::Sorcerer,
            "warlock" => CharacterClass::Warlock,
            "wizard" => CharacterClass::Wizard,
            _ => return None,
        };
        Some(class)
    }
}

/// A player or non-player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<CharacterClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spells: Vec<String>,
}

impl Character {
    /// Creates a character with only an id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            player_name: None,
            race: None,
            class: None,
            level: None,
            description: None,
            equipment: Vec::new(),
            spells: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A place where scenes happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// indoor, outdoor, underwater, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<String>,
    /// dark, bright, mysterious, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_features: Vec<String>,
}

impl Location {
    /// Name used for locations synthesized when no event names one.
    pub const PLACEHOLDER_NAME: &'static str = "Unknown Location";
    /// Description used for synthesized locations.
    pub const PLACEHOLDER_DESCRIPTION: &'static str = "Location details not specified";

    /// Creates a location with only an id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            environment_type: None,
            atmosphere: None,
            key_features: Vec::new(),
        }
    }

    /// Creates the stand-in location for a scene that never named one.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self::new(id, Self::PLACEHOLDER_NAME).with_description(Self::PLACEHOLDER_DESCRIPTION)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_environment(mut self, environment_type: impl Into<String>) -> Self {
        self.environment_type = Some(environment_type.into());
        self
    }

    pub fn with_atmosphere(mut self, atmosphere: impl Into<String>) -> Self {
        self.atmosphere = Some(atmosphere.into());
        self
    }

    /// Checks whether this is a synthesized stand-in.
    pub fn is_placeholder(&self) -> bool {
        self.name == Self::PLACEHOLDER_NAME
            && self.description.as_deref() == Some(Self::PLACEHOLDER_DESCRIPTION)
    }
}
