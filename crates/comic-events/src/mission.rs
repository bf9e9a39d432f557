//! Mission aggregate: one complete play session.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Character, Location};
use crate::event::Event;
use crate::layout::{Page, Scene};

/// Generates a fresh mission id.
pub fn generate_mission_id() -> String {
    format!("mission_{}", Uuid::new_v4().simple())
}

/// A complete session: its cast, places, event stream, and the planned layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub session_date: NaiveDateTime,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub events: Vec<Event>,
    /// Filled in by planning
    #[serde(default)]
    pub scenes: Vec<Scene>,
    /// Filled in by planning
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Mission {
    /// Creates an empty mission with a generated id.
    pub fn new(title: impl Into<String>, session_date: NaiveDateTime) -> Self {
        Self::with_id(generate_mission_id(), title, session_date)
    }

    /// Creates an empty mission with an explicit id.
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        session_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            session_date,
            characters: Vec::new(),
            locations: Vec::new(),
            events: Vec::new(),
            scenes: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn with_characters(mut self, characters: Vec<Character>) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    /// Finds a character by id.
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Finds a location by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Finds an event by id.
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Finds a scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Total panels across all pages.
    pub fn panel_count(&self) -> usize {
        self.pages.iter().map(|p| p.panels.len()).sum()
    }

    /// True once scenes and pages have been attached.
    pub fn is_planned(&self) -> bool {
        !self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use chrono::NaiveDate;

    fn session_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Mission::new("The Sunken Temple", session_start());
        let b = Mission::new("The Sunken Temple", session_start());
        assert!(a.id.starts_with("mission_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_lookups() {
        let mission = Mission::with_id("mission_1", "Test", session_start())
            .with_characters(vec![Character::new("borin", "Borin Ironfist")])
            .with_locations(vec![Location::new("docks", "Saltmarsh Docks")])
            .with_events(vec![Event::new(
                "e1",
                session_start(),
                EventKind::Narration,
                "Rain falls",
            )]);

        assert_eq!(mission.character("borin").unwrap().name, "Borin Ironfist");
        assert_eq!(mission.location("docks").unwrap().name, "Saltmarsh Docks");
        assert!(mission.event("e1").is_some());
        assert!(mission.event("e2").is_none());
        assert!(!mission.is_planned());
        assert_eq!(mission.panel_count(), 0);
    }

    #[test]
    fn test_mission_json_defaults() {
        let json = r#"{"id":"m","title":"T","session_date":"2024-03-01T19:00:00"}"#;
        let mission: Mission = serde_json::from_str(json).unwrap();
        assert!(mission.events.is_empty());
        assert!(mission.pages.is_empty());
    }
}
