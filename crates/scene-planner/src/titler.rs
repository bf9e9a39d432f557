//! Scene titles and synopses.
//!
//! Titles come from per-type rule tables checked against member event text;
//! descriptions are assembled from the scene's setting, cast and key events.

use std::sync::LazyLock;

use comic_events::{Event, EventKind, SceneType};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::context::PlanningContext;
use crate::segment::SceneInfo;

static OPPONENT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"vs\s+(\w+)").ok());

/// Placeholder in opponent titles replaced by the captured name.
pub const OPPONENT_PLACEHOLDER: &str = "{opponent}";

/// One title rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum TitleRule {
    /// Fires when the keyword appears in the description (any case)
    Keyword { keyword: String, title: String },
    /// Fires on "vs <Name>"; the title's `{opponent}` is replaced by the name
    Opponent { title: String },
}

impl TitleRule {
    pub fn keyword(keyword: &str, title: &str) -> Self {
        TitleRule::Keyword {
            keyword: keyword.to_string(),
            title: title.to_string(),
        }
    }

    pub fn opponent(title: &str) -> Self {
        TitleRule::Opponent {
            title: title.to_string(),
        }
    }

    /// Returns the title this rule yields for an event, if it fires.
    pub fn apply(&self, event: &Event) -> Option<String> {
        match self {
            TitleRule::Keyword { keyword, title } => {
                let text = event.description.to_lowercase();
                (!keyword.is_empty() && text.contains(&keyword.to_lowercase()))
                    .then(|| title.clone())
            }
            TitleRule::Opponent { title } => OPPONENT_PATTERN
                .as_ref()
                .and_then(|re| re.captures(&event.description))
                .map(|caps| title.replace(OPPONENT_PLACEHOLDER, &caps[1])),
        }
    }
}

/// Title rules for one scene type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRuleSet {
    /// Only events of this kind are inspected; all events when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspect: Option<EventKind>,
    /// Checked in order for each inspected event
    #[serde(default)]
    pub rules: Vec<TitleRule>,
    /// Title when no rule fires
    pub fallback: String,
}

impl TitleRuleSet {
    /// Walks events in order, trying every rule on each, and returns the first hit.
    pub fn select(&self, events: &[&Event]) -> String {
        events
            .iter()
            .filter(|e| self.inspect.map_or(true, |kind| e.kind == kind))
            .find_map(|e| self.rules.iter().find_map(|rule| rule.apply(e)))
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Configuration for titles and descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    pub combat: TitleRuleSet,
    pub action: TitleRuleSet,
    pub dialogue: TitleRuleSet,
    /// Most key event lines in a description
    pub max_key_events: usize,
    /// Spoken lines at or above this many characters are not quoted
    pub max_quoted_dialogue_chars: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            combat: TitleRuleSet {
                inspect: Some(EventKind::Combat),
                rules: vec![
                    TitleRule::opponent("Battle Against {opponent}"),
                    TitleRule::keyword("kraken", "Battle with the Elder Kraken"),
                    TitleRule::keyword("priest", "Confronting the Cultists"),
                ],
                fallback: "Combat Encounter".to_string(),
            },
            action: TitleRuleSet {
                inspect: None,
                rules: vec![
                    TitleRule::keyword("portal", "Through the Portal"),
                    TitleRule::keyword("ship", "Aboard the Ship"),
                    TitleRule::keyword("underwater", "Underwater Struggle"),
                ],
                fallback: "Action Sequence".to_string(),
            },
            dialogue: TitleRuleSet {
                inspect: Some(EventKind::Dialogue),
                rules: vec![
                    TitleRule::keyword("greetings", "Mission Briefing"),
                    TitleRule::keyword("gibbulous", "Gatekeeper's Instructions"),
                ],
                fallback: "Character Interaction".to_string(),
            },
            max_key_events: 3,
            max_quoted_dialogue_chars: 100,
        }
    }
}

impl TitleConfig {
    /// Rule set for a scene type.
    pub fn rules_for(&self, scene_type: SceneType) -> &TitleRuleSet {
        match scene_type {
            SceneType::Combat => &self.combat,
            SceneType::Action => &self.action,
            SceneType::Dialogue => &self.dialogue,
        }
    }
}

/// Derives scene titles and descriptions.
#[derive(Debug, Clone, Default)]
pub struct SceneTitler {
    config: TitleConfig,
}

impl SceneTitler {
    pub fn new(config: TitleConfig) -> Self {
        Self { config }
    }

    /// Picks a title for the scene.
    pub fn title(&self, info: &SceneInfo, events: &[&Event]) -> String {
        self.config.rules_for(info.scene_type).select(events)
    }

    /// Builds the multi-line synopsis. Lines with nothing to say are left out.
    pub fn describe(
        &self,
        info: &SceneInfo,
        events: &[&Event],
        ctx: &PlanningContext<'_>,
    ) -> String {
        let mut lines: Vec<String> = Vec::new();

        if let Some(location) = info.location_id.as_deref().and_then(|id| ctx.location(id)) {
            lines.push(format!("Setting: {}", location.name));
            if let Some(description) = &location.description {
                lines.push(description.clone());
            }
        }

        let names: Vec<&str> = info
            .main_characters
            .iter()
            .filter_map(|id| ctx.character_name(id))
            .collect();
        if !names.is_empty() {
            lines.push(format!("Main characters: {}", names.join(", ")));
        }

        let key_events = self.key_events(events);
        if !key_events.is_empty() {
            lines.push("Key events:".to_string());
            lines.extend(key_events);
        }

        lines.join("\n")
    }

    /// Headlines of physical events and short quoted lines, in event order.
    pub fn key_events(&self, events: &[&Event]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event.kind {
                kind if kind.is_physical() => Some(event.headline().to_string()),
                EventKind::Dialogue => event
                    .dialogue
                    .as_deref()
                    .filter(|line| line.chars().count() < self.config.max_quoted_dialogue_chars)
                    .map(|line| format!("\"{}\"", line)),
                _ => None,
            })
            .take(self.config.max_key_events)
            .collect()
    }

    pub fn config(&self) -> &TitleConfig {
        &self.config
    }
}
