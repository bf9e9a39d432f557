//! Event tension scoring.
//!
//! Assigns each event a dramatic-weight score in [0, 1] from its kind and
//! description text. Scoring is pure: the same event always gets the same score.

use std::collections::HashMap;

use comic_events::{Event, EventKind};
use serde::{Deserialize, Serialize};

use crate::rules::{contains_any, KeywordRule, RuleTable};

/// Scores are rounded to this many steps per unit before clamping.
const SCORE_STEPS: f64 = 1_000_000.0;

/// Weights and keyword tables used for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensionWeights {
    /// Base score by event kind name; kinds not listed score 0
    pub base_scores: HashMap<String, f32>,
    /// Keyword tiers, most intense first; at most one tier applies
    pub intensity_tiers: RuleTable<f32>,
    /// Text that marks an event as spoken
    pub dialogue_markers: Vec<String>,
    /// Exclamations that signal distress in spoken text
    pub distress_tokens: Vec<String>,
    /// Added once when a spoken event carries a distress token
    pub distress_bonus: f32,
}

impl Default for TensionWeights {
    fn default() -> Self {
        let mut base_scores = HashMap::new();
        base_scores.insert("combat".to_string(), 0.8);
        base_scores.insert("action".to_string(), 0.6);
        base_scores.insert("roll".to_string(), 0.4);
        base_scores.insert("dialogue".to_string(), 0.2);

        let intensity_tiers = RuleTable::new(vec![
            KeywordRule::new(&["death", "die", "kill", "destroy", "final", "last"], 0.3),
            KeywordRule::new(&["attack", "fight", "battle", "danger", "threat"], 0.2),
        ]);

        Self {
            base_scores,
            intensity_tiers,
            dialogue_markers: ["\"", "says", "shouts", "whispers"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            distress_tokens: ["no!", "help!", "stop!", "wait!"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            distress_bonus: 0.3,
        }
    }
}

impl TensionWeights {
    /// Gets the base score for an event kind.
    pub fn base_score(&self, kind: EventKind) -> f32 {
        self.base_scores.get(kind.as_str()).copied().unwrap_or(0.0)
    }
}

/// An event with its computed tension.
#[derive(Debug, Clone, Copy)]
pub struct ScoredEvent<'a> {
    pub event: &'a Event,
    pub score: f32,
}

/// Scores events for dramatic tension.
#[derive(Debug, Clone, Default)]
pub struct TensionScorer {
    weights: TensionWeights,
}

impl TensionScorer {
    /// Creates a scorer with the given weights.
    pub fn new(weights: TensionWeights) -> Self {
        Self { weights }
    }

    /// Scores a single event, clamped to [0, 1].
    ///
    /// Terms are summed in `f64` and rounded to six decimals, so a sum that
    /// is exactly a threshold (0.4 + 0.3) compares equal to it.
    pub fn score(&self, event: &Event) -> f32 {
        let text = event.description.to_lowercase();

        let sum = f64::from(self.weights.base_score(event.kind))
            + f64::from(self.intensity_bonus(&text))
            + f64::from(self.distress_bonus(&text));
        let rounded = (sum * SCORE_STEPS).round() / SCORE_STEPS;

        rounded.clamp(0.0, 1.0) as f32
    }

    /// Bonus from the first intensity tier whose keywords appear.
    pub fn intensity_bonus(&self, text: &str) -> f32 {
        self.weights
            .intensity_tiers
            .first_match(text)
            .copied()
            .unwrap_or(0.0)
    }

    /// Bonus for spoken text carrying a distress exclamation.
    pub fn distress_bonus(&self, text: &str) -> f32 {
        if contains_any(text, &self.weights.dialogue_markers)
            && contains_any(text, &self.weights.distress_tokens)
        {
            self.weights.distress_bonus
        } else {
            0.0
        }
    }

    /// Scores a batch of events, preserving order.
    pub fn score_batch<'a>(&self, events: &[&'a Event]) -> Vec<ScoredEvent<'a>> {
        events
            .iter()
            .map(|&event| ScoredEvent {
                event,
                score: self.score(event),
            })
            .collect()
    }

    /// Returns the first event with the highest score.
    pub fn most_tense<'a>(&self, events: &[&'a Event]) -> Option<ScoredEvent<'a>> {
        self.score_batch(events)
            .into_iter()
            .fold(None, |best: Option<ScoredEvent<'a>>, candidate| match best {
                Some(b) if b.score >= candidate.score => Some(b),
                _ => Some(candidate),
            })
    }

    /// Returns a reference to the weights.
    pub fn weights(&self) -> &TensionWeights {
        &self.weights
    }
}
