//! Read-only lookups over the characters and locations of a session.

use std::collections::HashMap;

use comic_events::{Character, Location};

/// Id-keyed view of the entities events refer to.
#[derive(Debug, Clone, Default)]
pub struct PlanningContext<'a> {
    characters: HashMap<&'a str, &'a Character>,
    locations: HashMap<&'a str, &'a Location>,
}

impl<'a> PlanningContext<'a> {
    /// Indexes the given characters and locations by id. Later duplicates win.
    pub fn new(characters: &'a [Character], locations: &'a [Location]) -> Self {
        Self {
            characters: characters.iter().map(|c| (c.id.as_str(), c)).collect(),
            locations: locations.iter().map(|l| (l.id.as_str(), l)).collect(),
        }
    }

    pub fn character(&self, id: &str) -> Option<&'a Character> {
        self.characters.get(id).copied()
    }

    /// Display name for a character id, if known.
    pub fn character_name(&self, id: &str) -> Option<&'a str> {
        self.character(id).map(|c| c.name.as_str())
    }

    pub fn location(&self, id: &str) -> Option<&'a Location> {
        self.locations.get(id).copied()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }
}
