//! Plan summary output.
//!
//! A compact, serializable report of what planning produced. Writing it
//! anywhere is the caller's business.

use std::collections::BTreeMap;

use comic_events::{Page, Scene, SceneType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur producing output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counts and tension statistics for one planned mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub mission_id: String,
    pub scene_count: usize,
    pub panel_count: usize,
    pub page_count: usize,
    /// Scene count per scene type; every type is listed
    pub scenes_by_type: BTreeMap<String, usize>,
    /// Mean scene tension, 0 when there are no scenes
    pub mean_tension: f32,
    pub peak_tension: f32,
    /// Panel count of each page, in page order
    pub panels_per_page: Vec<usize>,
    /// Scenes that fell back to a synthesized location
    pub placeholder_locations: usize,
}

impl PlanSummary {
    /// Builds a summary from planned scenes and pages.
    pub fn new(
        mission_id: impl Into<String>,
        scenes: &[Scene],
        pages: &[Page],
        placeholder_locations: usize,
    ) -> Self {
        let mut scenes_by_type: BTreeMap<String, usize> = SceneType::all()
            .iter()
            .map(|t| (t.as_str().to_string(), 0))
            .collect();
        for scene in scenes {
            *scenes_by_type
                .entry(scene.scene_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        let total: f32 = scenes.iter().map(|s| s.dramatic_tension).sum();
        let mean_tension = if scenes.is_empty() {
            0.0
        } else {
            total / scenes.len() as f32
        };
        let peak_tension = scenes
            .iter()
            .map(|s| s.dramatic_tension)
            .fold(0.0_f32, f32::max);

        let panels_per_page: Vec<usize> = pages.iter().map(|p| p.panel_count()).collect();

        Self {
            mission_id: mission_id.into(),
            scene_count: scenes.len(),
            panel_count: panels_per_page.iter().sum(),
            page_count: pages.len(),
            scenes_by_type,
            mean_tension,
            peak_tension,
            panels_per_page,
            placeholder_locations,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Single-line JSON.
    pub fn to_json_compact(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use comic_events::{Panel, PanelType};

    fn make_scene(id: &str, scene_type: SceneType, tension: f32) -> Scene {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Scene {
            id: id.to_string(),
            title: String::new(),
            description: String::new(),
            start_time: t,
            end_time: t,
            location_id: "somewhere".to_string(),
            event_ids: vec!["e".to_string()],
            main_characters: Vec::new(),
            scene_type,
            dramatic_tension: tension,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = PlanSummary::new("m", &[], &[], 0);

        assert_eq!(summary.scene_count, 0);
        assert_eq!(summary.panel_count, 0);
        assert_eq!(summary.mean_tension, 0.0);
        assert_eq!(summary.peak_tension, 0.0);
        assert_eq!(summary.scenes_by_type.get("combat"), Some(&0));
    }

    #[test]
    fn test_summary_counts() {
        let scenes = vec![
            make_scene("scene_1", SceneType::Dialogue, 0.2),
            make_scene("scene_2", SceneType::Combat, 1.0),
            make_scene("scene_3", SceneType::Combat, 0.6),
        ];
        let mut page = Page::new("page_1", "m", 1, "standard");
        page.panels.push(Panel::new("panel_1", "scene_1", 1, PanelType::Dialogue, ""));
        page.panels.push(Panel::new("panel_2", "scene_2", 1, PanelType::Action, ""));

        let summary = PlanSummary::new("m", &scenes, &[page], 1);

        assert_eq!(summary.scene_count, 3);
        assert_eq!(summary.panel_count, 2);
        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.scenes_by_type.get("combat"), Some(&2));
        assert_eq!(summary.scenes_by_type.get("action"), Some(&0));
        assert!((summary.mean_tension - 0.6).abs() < 1e-5);
        assert_eq!(summary.peak_tension, 1.0);
        assert_eq!(summary.panels_per_page, vec![2]);
        assert_eq!(summary.placeholder_locations, 1);
    }

    #[test]
    fn test_summary_json() {
        let summary = PlanSummary::new("mission_1", &[], &[], 0);

        let compact = summary.to_json_compact().unwrap();
        assert!(compact.contains(r#""mission_id":"mission_1""#));
        assert!(!compact.contains('\n'));

        let pretty = summary.to_json().unwrap();
        let parsed: PlanSummary = serde_json::from_str(&pretty).unwrap();
        assert_eq!(parsed, summary);
    }
}
