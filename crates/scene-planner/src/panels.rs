//! Panel allocation.
//!
//! Decides how many panels a scene gets and fills them from the scene's
//! events according to its type.

use std::collections::HashSet;

use comic_events::{Event, EventKind, Panel, PanelType, Scene, SceneType};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::tension::TensionScorer;

/// Configuration for panel budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub combat_base: u32,
    pub action_base: u32,
    pub dialogue_base: u32,
    /// More main characters than this earns a panel
    pub crowd_threshold: usize,
    pub high_tension: f32,
    pub high_tension_bonus: u32,
    /// Checked only when the high tier does not apply
    pub medium_tension: f32,
    pub medium_tension_bonus: u32,
    /// More member events than this earns a panel
    pub busy_scene_events: usize,
    pub max_per_scene: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            combat_base: 3,
            action_base: 2,
            dialogue_base: 1,
            crowd_threshold: 2,
            high_tension: 0.8,
            high_tension_bonus: 2,
            medium_tension: 0.5,
            medium_tension_bonus: 1,
            busy_scene_events: 5,
            max_per_scene: 4,
        }
    }
}

impl PanelConfig {
    pub fn base_for(&self, scene_type: SceneType) -> u32 {
        match scene_type {
            SceneType::Combat => self.combat_base,
            SceneType::Action => self.action_base,
            SceneType::Dialogue => self.dialogue_base,
        }
    }
}

/// Generates a scene-scoped panel id.
pub fn generate_panel_id(scene_id: &str, number: u32) -> String {
    format!("{}_panel_{}", scene_id, number)
}

/// Panel type used when a single event stands for the whole scene.
///
/// Physical kinds draw as action panels; everything else is a dialogue panel.
pub fn panel_type_for(kind: EventKind) -> PanelType {
    match kind {
        EventKind::Combat | EventKind::Action | EventKind::Roll => PanelType::Action,
        EventKind::Dialogue | EventKind::Narration | EventKind::SceneTransition => {
            PanelType::Dialogue
        }
    }
}

/// Builds the panels for each scene.
#[derive(Debug, Clone, Default)]
pub struct PanelAllocator {
    config: PanelConfig,
    scorer: TensionScorer,
}

impl PanelAllocator {
    pub fn new(config: PanelConfig, scorer: TensionScorer) -> Self {
        Self { config, scorer }
    }

    /// Number of panels the scene deserves, in `[1, max_per_scene]`.
    pub fn panel_budget(&self, scene: &Scene) -> u32 {
        let c = &self.config;
        let mut count = c.base_for(scene.scene_type);

        if scene.main_characters.len() > c.crowd_threshold {
            count += 1;
        }

        if scene.dramatic_tension > c.high_tension {
            count += c.high_tension_bonus;
        } else if scene.dramatic_tension > c.medium_tension {
            count += c.medium_tension_bonus;
        }

        if scene.event_count() > c.busy_scene_events {
            count += 1;
        }

        count.clamp(1, c.max_per_scene.max(1))
    }

    /// Allocates panels for a scene from its member events.
    ///
    /// Returns at most `panel_budget` panels, numbered from 1, each depicting
    /// only events of this scene. Roles with nothing to show are skipped, so
    /// the result may be shorter than the budget.
    pub fn allocate(&self, scene: &Scene, events: &[&Event]) -> Vec<Panel> {
        let budget = self.panel_budget(scene);
        let member_ids: HashSet<&str> = scene.event_ids.iter().map(String::as_str).collect();
        let members: Vec<&Event> = events
            .iter()
            .copied()
            .filter(|e| member_ids.contains(e.id.as_str()))
            .collect();

        let mut panels = if budget == 1 {
            self.single_panel(scene, &members).into_iter().collect()
        } else {
            match scene.scene_type {
                SceneType::Combat => self.combat_panels(scene, &members, budget),
                SceneType::Dialogue => {
                    self.per_event_panels(scene, &members, EventKind::Dialogue, budget)
                }
                SceneType::Action => {
                    self.per_event_panels(scene, &members, EventKind::Action, budget)
                }
            }
        };
        panels.truncate(budget as usize);

        for (i, panel) in panels.iter_mut().enumerate() {
            let number = i as u32 + 1;
            panel.panel_number = number;
            panel.id = generate_panel_id(&scene.id, number);
        }

        if (panels.len() as u32) < budget {
            warn!(
                scene = %scene.id,
                budget,
                allocated = panels.len(),
                "scene yields fewer panels than its budget"
            );
        }

        panels
    }

    fn blank(&self, scene: &Scene, panel_type: PanelType, description: impl Into<String>) -> Panel {
        Panel::new(String::new(), scene.id.clone(), 0, panel_type, description)
    }

    /// One panel built from the most tense event.
    fn single_panel(&self, scene: &Scene, members: &[&Event]) -> Option<Panel> {
        let key = self.scorer.most_tense(members)?.event;

        let panel = self
            .blank(scene, panel_type_for(key.kind), scene.description.clone())
            .with_characters(scene.main_characters.clone())
            .with_event(key.id.clone())
            .with_dialogue(key.dialogue.clone())
            .with_narration(format!("Scene: {}", scene.title));

        Some(panel)
    }

    /// Setup, main action and resolution, in that order.
    fn combat_panels(&self, scene: &Scene, members: &[&Event], budget: u32) -> Vec<Panel> {
        let mut panels = vec![self
            .blank(scene, PanelType::Action, "Combat begins")
            .with_characters(scene.main_characters.clone())
            .with_narration("The battle erupts!")];

        let physical: Vec<&Event> = members
            .iter()
            .copied()
            .filter(|e| e.kind.is_physical())
            .collect();
        if let Some(main) = physical.get(physical.len() / 2) {
            panels.push(
                self.blank(scene, PanelType::Action, main.description.clone())
                    .with_characters(scene.main_characters.clone())
                    .with_event(main.id.clone())
                    .with_dialogue(main.dialogue.clone()),
            );
        }

        if budget >= 3 {
            panels.push(
                self.blank(scene, PanelType::Action, "Combat resolution")
                    .with_characters(scene.main_characters.clone())
                    .with_narration("The dust settles..."),
            );
        }

        panels
    }

    /// One panel per member event of the given kind, in order.
    fn per_event_panels(
        &self,
        scene: &Scene,
        members: &[&Event],
        kind: EventKind,
        budget: u32,
    ) -> Vec<Panel> {
        members
            .iter()
            .filter(|e| e.kind == kind)
            .take(budget as usize)
            .map(|event| match kind {
                EventKind::Dialogue => {
                    let characters = match &event.speaker {
                        Some(speaker) => vec![speaker.clone()],
                        None => scene.main_characters.clone(),
                    };
                    self.blank(scene, PanelType::Dialogue, event.description.clone())
                        .with_characters(characters)
                        .with_event(event.id.clone())
                        .with_dialogue(event.dialogue.clone())
                }
                _ => {
                    let sentence = event.description.split('.').next().unwrap_or("");
                    self.blank(scene, PanelType::Action, event.description.clone())
                        .with_characters(scene.main_characters.clone())
                        .with_event(event.id.clone())
                        .with_dialogue(event.dialogue.clone())
                        .with_narration(format!("Action: {}", sentence))
                }
            })
            .collect()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }
}
