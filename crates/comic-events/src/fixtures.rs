//! Sample data fixtures for testing.
//!
//! This module provides a ready-made session for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // comic-events = { path = "../comic-events", features = ["test-fixtures"] }
//!
//! use comic_events::fixtures;
//!
//! let mission = fixtures::sample_mission();
//! ```

use chrono::{NaiveDate, NaiveDateTime};

use crate::{parse_event_stream, Character, Event, Location, Mission};

/// Id of the sample mission.
pub const SAMPLE_MISSION_ID: &str = "mission_sunken_temple";

/// Returns the sample event stream.
///
/// Contains 12 events over one evening:
/// - 3 dialogue events at the gatehouse (briefing)
/// - 2 actions and 1 roll aboard the ship
/// - a temple fight broken up by a shouted plea, a leap and a finishing blow
/// - 1 closing narration with no location
pub fn sample_events() -> Vec<Event> {
    let jsonl = include_str!("../tests/fixtures/sample_events.jsonl");
    parse_event_stream(jsonl).unwrap_or_else(|e| panic!("Failed to parse sample events: {}", e))
}

/// Returns the four sample characters (three heroes and the gatekeeper).
pub fn sample_characters() -> Vec<Character> {
    let json = include_str!("../tests/fixtures/sample_characters.json");
    serde_json::from_str(json).expect("Failed to parse sample_characters.json")
}

/// Returns the three sample locations (gatehouse, ship, temple).
pub fn sample_locations() -> Vec<Location> {
    let json = include_str!("../tests/fixtures/sample_locations.json");
    serde_json::from_str(json).expect("Failed to parse sample_locations.json")
}

/// Start of the sample session.
pub fn session_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(19, 0, 0))
        .expect("valid fixture date")
}

/// Returns the sample mission with characters, locations and events but no plan.
pub fn sample_mission() -> Mission {
    Mission::with_id(SAMPLE_MISSION_ID, "The Sunken Temple", session_start())
        .with_characters(sample_characters())
        .with_locations(sample_locations())
        .with_events(sample_events())
}

/// Returns a specific event by id from the sample events.
pub fn get_event(event_id: &str) -> Option<Event> {
    sample_events().into_iter().find(|e| e.id == event_id)
}
