//! Scene segmentation.
//!
//! Splits a time-ordered event stream into scenes. Each incoming event is
//! checked against the open scene for a temporal gap, a location change, or a
//! change of scene type; any one of these closes the open scene before the
//! event is absorbed into a fresh one.

use chrono::Duration;
use comic_events::{Event, EventKind, SceneType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rules::{KeywordRule, RuleTable};
use crate::tension::TensionScorer;

/// Configuration for scene segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Gap between consecutive events (minutes) that forces a new scene
    pub scene_break_minutes: i64,
    /// Keyword table classifying action events; unmatched actions are dialogue
    pub action_types: RuleTable<SceneType>,
    /// Keep a dialogue scene open when an action event arrives
    pub suppress_dialogue_to_action: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            scene_break_minutes: 30,
            action_types: RuleTable::new(vec![
                KeywordRule::new(
                    &["attack", "cast", "fight", "battle", "damage"],
                    SceneType::Combat,
                ),
                KeywordRule::new(&["move", "jump", "climb", "run", "fly"], SceneType::Action),
            ]),
            suppress_dialogue_to_action: true,
        }
    }
}

/// Why the open scene was closed.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakReason {
    /// Too much time passed since the last event
    TemporalGap { minutes: i64 },
    /// The event happens somewhere else
    LocationChange { from: String, to: String },
    /// The event changes the scene's register
    TypeChange { from: SceneType, to: SceneType },
}

impl std::fmt::Display for BreakReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakReason::TemporalGap { minutes } => write!(f, "{} minute gap", minutes),
            BreakReason::LocationChange { from, to } => write!(f, "moved from {} to {}", from, to),
            BreakReason::TypeChange { from, to } => write!(f, "{} became {}", from, to),
        }
    }
}

/// Running summary of an open or closed scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneInfo {
    /// Type derived from the most recent event; dialogue when empty
    pub scene_type: SceneType,
    /// Most recent location named by an event
    pub location_id: Option<String>,
    /// Speakers and participants in first-seen order
    pub main_characters: Vec<String>,
    /// Highest event tension seen
    pub tension: f32,
}

impl SceneInfo {
    fn add_character(&mut self, id: &str) {
        if !self.main_characters.iter().any(|c| c == id) {
            self.main_characters.push(id.to_string());
        }
    }
}

/// A scene's summary together with its member events.
#[derive(Debug, Clone)]
pub struct SceneGroup<'a> {
    pub info: SceneInfo,
    pub events: Vec<&'a Event>,
}

impl<'a> SceneGroup<'a> {
    fn empty() -> Self {
        Self {
            info: SceneInfo::default(),
            events: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Member event ids in order.
    pub fn event_ids(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.id.as_str()).collect()
    }
}

/// Fold state: closed scenes plus the one still accumulating.
struct SegmentState<'a> {
    closed: Vec<SceneGroup<'a>>,
    open: SceneGroup<'a>,
}

impl<'a> SegmentState<'a> {
    fn new() -> Self {
        Self {
            closed: Vec::new(),
            open: SceneGroup::empty(),
        }
    }

    /// Closes the open scene if the event breaks it, then absorbs the event.
    fn step(mut self, segmenter: &SceneSegmenter, event: &'a Event) -> Self {
        let scene_type = segmenter.scene_type_for(event);

        if let Some(reason) = segmenter.break_reason(&self.open, event, scene_type) {
            debug!(
                scene = self.closed.len() + 1,
                events = self.open.len(),
                at = %event.id,
                reason = %reason,
                "closing scene"
            );
            let finished = std::mem::replace(&mut self.open, SceneGroup::empty());
            self.closed.push(finished);
        }

        let info = &mut self.open.info;
        info.scene_type = scene_type;
        if let Some(location_id) = &event.location_id {
            info.location_id = Some(location_id.clone());
        }
        for id in event.character_ids() {
            info.add_character(id);
        }
        info.tension = info.tension.max(segmenter.scorer.score(event));
        self.open.events.push(event);

        self
    }

    fn finish(mut self) -> Vec<SceneGroup<'a>> {
        if !self.open.is_empty() {
            self.closed.push(self.open);
        }
        self.closed
    }
}

/// Groups chronological events into scenes.
#[derive(Debug, Clone, Default)]
pub struct SceneSegmenter {
    config: SegmentationConfig,
    scorer: TensionScorer,
}

impl SceneSegmenter {
    /// Creates a segmenter with the given configuration and scorer.
    pub fn new(config: SegmentationConfig, scorer: TensionScorer) -> Self {
        Self { config, scorer }
    }

    /// Derives the scene type an event implies.
    pub fn scene_type_for(&self, event: &Event) -> SceneType {
        match event.kind {
            EventKind::Combat => SceneType::Combat,
            EventKind::Roll => SceneType::Action,
            EventKind::Dialogue => SceneType::Dialogue,
            EventKind::Action => self
                .config
                .action_types
                .first_match(&event.description)
                .copied()
                .unwrap_or(SceneType::Dialogue),
            EventKind::Narration | EventKind::SceneTransition => SceneType::Dialogue,
        }
    }

    /// Decides whether the event must start a new scene.
    ///
    /// Conditions are checked in order (time, place, type) and the first that
    /// fires is reported. An empty group never breaks.
    pub fn break_reason(
        &self,
        open: &SceneGroup<'_>,
        event: &Event,
        scene_type: SceneType,
    ) -> Option<BreakReason> {
        let last = open.events.last()?;

        // A threshold outside the representable range never splits
        let gap = event.timestamp - last.timestamp;
        let limit = Duration::try_minutes(self.config.scene_break_minutes);
        if limit.is_some_and(|limit| gap > limit) {
            return Some(BreakReason::TemporalGap {
                minutes: gap.num_minutes(),
            });
        }

        if let (Some(to), Some(from)) = (&event.location_id, &open.info.location_id) {
            if to != from {
                return Some(BreakReason::LocationChange {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        let from = open.info.scene_type;
        if scene_type != from && !self.is_suppressed(from, scene_type) {
            return Some(BreakReason::TypeChange {
                from,
                to: scene_type,
            });
        }

        None
    }

    // In-combat chatter is common, but only dialogue -> action is tolerated.
    fn is_suppressed(&self, from: SceneType, to: SceneType) -> bool {
        self.config.suppress_dialogue_to_action
            && from == SceneType::Dialogue
            && to == SceneType::Action
    }

    /// Partitions events into scene groups.
    ///
    /// Events are sorted by timestamp once (stable, so ties keep input order).
    /// Every event lands in exactly one group and no group is empty.
    pub fn segment<'a>(&self, events: &'a [Event]) -> Vec<SceneGroup<'a>> {
        let mut sorted: Vec<&'a Event> = events.iter().collect();
        sorted.sort_by_key(|e| e.timestamp);

        sorted
            .into_iter()
            .fold(SegmentState::new(), |state, event| state.step(self, event))
            .finish()
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Returns a reference to the scorer.
    pub fn scorer(&self) -> &TensionScorer {
        &self.scorer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn make_event(id: &str, time: NaiveDateTime, kind: EventKind, description: &str) -> Event {
        Event::new(id, time, kind, description)
    }

    fn group_ids<'a>(groups: &'a [SceneGroup<'a>]) -> Vec<Vec<&'a str>> {
        groups.iter().map(|g| g.event_ids()).collect()
    }

    #[test]
    fn test_empty_input() {
        let segmenter = SceneSegmenter::default();
        assert!(segmenter.segment(&[]).is_empty());
    }

    #[test]
    fn test_scene_type_derivation() {
        let segmenter = SceneSegmenter::default();
        let t = at(9, 0);

        let cases = [
            (EventKind::Combat, "anything", SceneType::Combat),
            (EventKind::Roll, "anything", SceneType::Action),
            (EventKind::Dialogue, "attack!", SceneType::Dialogue),
            (EventKind::Action, "Thalia casts a spell", SceneType::Combat),
            (EventKind::Action, "Borin jumps the gap", SceneType::Action),
            (EventKind::Action, "Pip pockets the coin", SceneType::Dialogue),
            (EventKind::Narration, "a battle rages", SceneType::Dialogue),
            (EventKind::SceneTransition, "later", SceneType::Dialogue),
        ];

        for (kind, description, expected) in cases {
            let event = make_event("e", t, kind, description);
            assert_eq!(segmenter.scene_type_for(&event), expected, "{:?} {}", kind, description);
        }
    }

    #[test]
    fn test_combat_keyword_beats_movement_keyword() {
        let segmenter = SceneSegmenter::default();
        let event = make_event("e", at(9, 0), EventKind::Action, "Borin runs in to attack");
        assert_eq!(segmenter.scene_type_for(&event), SceneType::Combat);
    }

    #[test]
    fn test_temporal_gap_splits() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello").at_location("a"),
            make_event("e2", at(9, 10), EventKind::Dialogue, "hi").at_location("a"),
            make_event("e3", at(10, 0), EventKind::Combat, "attack").at_location("a"),
        ];

        let groups = segmenter.segment(&events);

        assert_eq!(group_ids(&groups), vec![vec!["e1", "e2"], vec!["e3"]]);
        assert_eq!(groups[0].info.scene_type, SceneType::Dialogue);
        assert_eq!(groups[1].info.scene_type, SceneType::Combat);
    }

    #[test]
    fn test_gap_of_exactly_threshold_does_not_split() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello"),
            make_event("e2", at(9, 30), EventKind::Dialogue, "hello again"),
        ];
        assert_eq!(segmenter.segment(&events).len(), 1);
    }

    #[test]
    fn test_huge_break_threshold_never_splits() {
        let config = SegmentationConfig {
            scene_break_minutes: i64::MAX,
            ..SegmentationConfig::default()
        };
        let segmenter = SceneSegmenter::new(config, TensionScorer::default());
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello"),
            make_event("e2", at(23, 0), EventKind::Dialogue, "goodnight"),
        ];

        let groups = segmenter.segment(&events);
        assert_eq!(group_ids(&groups), vec![vec!["e1", "e2"]]);
    }

    #[test]
    fn test_location_change_splits() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello").at_location("tavern"),
            make_event("e2", at(9, 1), EventKind::Dialogue, "hello").at_location("street"),
        ];

        let groups = segmenter.segment(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].info.location_id.as_deref(), Some("street"));
    }

    #[test]
    fn test_first_location_does_not_split() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello"),
            make_event("e2", at(9, 1), EventKind::Dialogue, "hello").at_location("tavern"),
            make_event("e3", at(9, 2), EventKind::Dialogue, "hello"),
        ];

        let groups = segmenter.segment(&events);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].info.location_id.as_deref(), Some("tavern"));
    }

    #[test]
    fn test_dialogue_to_action_suppressed() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello"),
            make_event("e2", at(9, 1), EventKind::Action, "Pip jumps"),
        ];

        let groups = segmenter.segment(&events);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].info.scene_type, SceneType::Action);
    }

    #[test]
    fn test_action_to_dialogue_splits() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Action, "Pip jumps"),
            make_event("e2", at(9, 1), EventKind::Dialogue, "hello"),
        ];
        assert_eq!(segmenter.segment(&events).len(), 2);
    }

    #[test]
    fn test_suppression_can_be_disabled() {
        let config = SegmentationConfig {
            suppress_dialogue_to_action: false,
            ..SegmentationConfig::default()
        };
        let segmenter = SceneSegmenter::new(config, TensionScorer::default());
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello"),
            make_event("e2", at(9, 1), EventKind::Action, "Pip jumps"),
        ];
        assert_eq!(segmenter.segment(&events).len(), 2);
    }

    #[test]
    fn test_break_reason_order() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello").at_location("a"),
            make_event("e2", at(11, 0), EventKind::Combat, "attack").at_location("b"),
        ];

        let groups = segmenter.segment(&events[..1]);
        let scene_type = segmenter.scene_type_for(&events[1]);
        let reason = segmenter.break_reason(&groups[0], &events[1], scene_type);

        assert_eq!(reason, Some(BreakReason::TemporalGap { minutes: 120 }));
    }

    #[test]
    fn test_unsorted_input_is_sorted_stably() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("late", at(9, 5), EventKind::Dialogue, "b"),
            make_event("tie_1", at(9, 0), EventKind::Dialogue, "a"),
            make_event("tie_2", at(9, 0), EventKind::Dialogue, "a"),
        ];

        let groups = segmenter.segment(&events);
        assert_eq!(group_ids(&groups), vec![vec!["tie_1", "tie_2", "late"]]);
    }

    #[test]
    fn test_info_accumulates_characters_and_tension() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Combat, "clash")
                .with_speaker("borin")
                .with_participant("thalia"),
            make_event("e2", at(9, 1), EventKind::Combat, "Borin goes for the kill")
                .with_speaker("pip")
                .with_participant("borin"),
        ];

        let groups = segmenter.segment(&events);
        assert_eq!(groups.len(), 1);
        let info = &groups[0].info;
        assert_eq!(info.main_characters, vec!["borin", "thalia", "pip"]);
        assert!((info.tension - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fresh_scene_resets_tension() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Combat, "clash"),
            make_event("e2", at(9, 1), EventKind::Narration, "quiet"),
        ];

        let groups = segmenter.segment(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].info.tension, 0.0);
        assert!(groups[1].info.main_characters.is_empty());
    }

    #[test]
    fn test_segment_is_idempotent() {
        let segmenter = SceneSegmenter::default();
        let events = vec![
            make_event("e1", at(9, 0), EventKind::Dialogue, "hello").at_location("a"),
            make_event("e2", at(9, 5), EventKind::Combat, "attack").at_location("a"),
            make_event("e3", at(9, 6), EventKind::Dialogue, "no!").at_location("b"),
        ];

        let first = group_ids(&segmenter.segment(&events))
            .into_iter()
            .map(|g| g.into_iter().map(String::from).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let second = group_ids(&segmenter.segment(&events))
            .into_iter()
            .map(|g| g.into_iter().map(String::from).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn test_break_reason_display() {
        let reason = BreakReason::TypeChange {
            from: SceneType::Combat,
            to: SceneType::Dialogue,
        };
        assert_eq!(reason.to_string(), "combat became dialogue");
    }
}
