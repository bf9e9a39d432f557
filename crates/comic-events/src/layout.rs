//! Layout Types
//!
//! Scenes, panels and pages produced by the planner. All references between
//! them (and back to events, characters and locations) are by id; resolving an
//! id to the full object is the caller's job.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Dramatic register of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    Combat,
    Action,
    #[default]
    Dialogue,
}

impl SceneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::Combat => "combat",
            SceneType::Action => "action",
            SceneType::Dialogue => "dialogue",
        }
    }

    /// Returns all scene type variants.
    pub fn all() -> &'static [SceneType] {
        &[SceneType::Combat, SceneType::Action, SceneType::Dialogue]
    }
}

impl std::fmt::Display for SceneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of events grouped by time, place and tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Unique scene identifier (`scene_N`)
    pub id: String,
    pub title: String,
    pub description: String,
    /// Timestamp of the first member event
    pub start_time: NaiveDateTime,
    /// Timestamp of the last member event
    pub end_time: NaiveDateTime,
    /// Always resolvable; may point at a synthesized placeholder
    pub location_id: String,
    /// Member event ids in chronological order
    pub event_ids: Vec<String>,
    /// Union of speakers and participants, in first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub main_characters: Vec<String>,
    pub scene_type: SceneType,
    /// Highest member event tension, in [0, 1]
    pub dramatic_tension: f32,
}

impl Scene {
    /// Number of member events.
    pub fn event_count(&self) -> usize {
        self.event_ids.len()
    }

    /// Checks whether an event belongs to this scene.
    pub fn contains_event(&self, event_id: &str) -> bool {
        self.event_ids.iter().any(|id| id == event_id)
    }

    /// Scene length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Visual framing of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    Action,
    Dialogue,
    Environment,
}

impl PanelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelType::Action => "action",
            PanelType::Dialogue => "dialogue",
            PanelType::Environment => "environment",
        }
    }
}

/// One illustrated unit within a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Scene-scoped at allocation, mission-global once packed onto a page
    pub id: String,
    pub scene_id: String,
    /// 1-based position within the scene
    pub panel_number: u32,
    pub panel_type: PanelType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub characters: Vec<String>,
    /// Event the panel depicts, if it depicts a specific one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// Filled in by the illustration stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

impl Panel {
    /// Creates a panel with no characters, source event, dialogue or caption.
    pub fn new(
        id: impl Into<String>,
        scene_id: impl Into<String>,
        panel_number: u32,
        panel_type: PanelType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            scene_id: scene_id.into(),
            panel_number,
            panel_type,
            description: description.into(),
            characters: Vec::new(),
            event_id: None,
            dialogue: None,
            narration: None,
            image_path: None,
        }
    }

    pub fn with_characters(mut self, characters: Vec<String>) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn with_dialogue(mut self, dialogue: Option<String>) -> Self {
        self.dialogue = dialogue;
        self
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }
}

/// An ordered container of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Unique page identifier (`page_N`)
    pub id: String,
    pub mission_id: String,
    /// 1-based page number
    pub page_number: u32,
    pub panels: Vec<Panel>,
    /// standard, splash, grid
    pub layout_type: String,
}

impl Page {
    /// Creates an empty page.
    pub fn new(
        id: impl Into<String>,
        mission_id: impl Into<String>,
        page_number: u32,
        layout_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            mission_id: mission_id.into(),
            page_number,
            panels: Vec::new(),
            layout_type: layout_type.into(),
        }
    }

    /// Number of panels on the page.
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Ids of the scenes that appear on this page, in order, without duplicates.
    pub fn scene_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for panel in &self.panels {
            if !ids.contains(&panel.scene_id.as_str()) {
                ids.push(&panel.scene_id);
            }
        }
        ids
    }
}
