//! Configuration loading for the planner.
//!
//! All planner settings can be loaded from a TOML configuration file. Every
//! table is optional; missing tables and keys fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pages::PageConfig;
use crate::panels::PanelConfig;
use crate::segment::SegmentationConfig;
use crate::tension::TensionWeights;
use crate::titler::TitleConfig;

/// Complete planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Event tension scoring
    #[serde(default)]
    pub tension: TensionWeights,
    /// Scene break rules
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    /// Title rules and description limits
    #[serde(default)]
    pub titles: TitleConfig,
    /// Panel budgets
    #[serde(default)]
    pub panels: PanelConfig,
    /// Page capacity and pacing
    #[serde(default)]
    pub pages: PageConfig,
}

impl PlannerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigSerializeError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Error that can occur during TOML serialization.
#[derive(Debug, Error)]
#[error("TOML serialize error: {0}")]
pub struct ConfigSerializeError(#[from] pub toml::ser::Error);

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Scene Planner Configuration

[tension]
# Added once when a spoken line carries a distress exclamation
distress_bonus = 0.3
dialogue_markers = ['"', "says", "shouts", "whispers"]
distress_tokens = ["no!", "help!", "stop!", "wait!"]
# Most intense tier first; only the first tier that matches is added
intensity_tiers = [
    { keywords = ["death", "die", "kill", "destroy", "final", "last"], value = 0.3 },
    { keywords = ["attack", "fight", "battle", "danger", "threat"], value = 0.2 },
]

[tension.base_scores]
combat = 0.8
action = 0.6
roll = 0.4
dialogue = 0.2

[segmentation]
scene_break_minutes = 30
suppress_dialogue_to_action = true
# Action events matching no rule count as dialogue
action_types = [
    { keywords = ["attack", "cast", "fight", "battle", "damage"], value = "combat" },
    { keywords = ["move", "jump", "climb", "run", "fly"], value = "action" },
]

[titles]
max_key_events = 3
max_quoted_dialogue_chars = 100

[titles.combat]
inspect = "combat"
fallback = "Combat Encounter"
rules = [
    { match = "opponent", title = "Battle Against {opponent}" },
    { match = "keyword", keyword = "kraken", title = "Battle with the Elder Kraken" },
    { match = "keyword", keyword = "priest", title = "Confronting the Cultists" },
]

[titles.action]
fallback = "Action Sequence"
rules = [
    { match = "keyword", keyword = "portal", title = "Through the Portal" },
    { match = "keyword", keyword = "ship", title = "Aboard the Ship" },
    { match = "keyword", keyword = "underwater", title = "Underwater Struggle" },
]

[titles.dialogue]
inspect = "dialogue"
fallback = "Character Interaction"
rules = [
    { match = "keyword", keyword = "greetings", title = "Mission Briefing" },
    { match = "keyword", keyword = "gibbulous", title = "Gatekeeper's Instructions" },
]

[panels]
combat_base = 3
action_base = 2
dialogue_base = 1
crowd_threshold = 2
high_tension = 0.8
high_tension_bonus = 2
medium_tension = 0.5
medium_tension_bonus = 1
busy_scene_events = 5
max_per_scene = 4

[pages]
max_panels_per_page = 6
soft_cap = 4
high_tension_threshold = 0.7
layout_type = "standard"
"#
    .to_string()
}
