//! Shared data contracts for the comic planning pipeline.
//!
//! This crate contains pure data structures with no planning logic: the
//! tagged event stream produced by transcript parsing, the characters and
//! locations it refers to, and the scene/panel/page layout structures the
//! planner emits. It is a dependency for all other crates in the workspace.

pub mod entity;
pub mod event;
pub mod layout;
pub mod mission;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export event types
pub use event::{
    parse_event_stream, Event, EventKind, EventParseError, MechanicKind, Mechanics,
};

// Re-export entity types
pub use entity::{Character, CharacterClass, Location};

// Re-export layout types
pub use layout::{Page, Panel, PanelType, Scene, SceneType};

// Re-export mission types
pub use mission::{generate_mission_id, Mission};
