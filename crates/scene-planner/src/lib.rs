//! Scene planner: from a session's event stream to a paginated comic layout.
//!
//! The planner sits between transcript parsing and illustration. It splits
//! the chronological event stream into scenes, titles and describes each one,
//! decides how many panels every scene deserves, and packs the panels onto
//! pages.
//!
//! # Pipeline
//!
//! ```text
//! events ──▶ segment ──▶ scenes ──▶ title ──▶ allocate ──▶ panels ──▶ pack ──▶ pages
//!              ▲                                  ▲
//!              └────────── tension scorer ────────┘
//! ```
//!
//! # Modules
//!
//! - [`tension`]: Per-event dramatic tension scoring
//! - [`segment`]: Scene boundary detection
//! - [`titler`]: Scene titles and descriptions
//! - [`scene`]: Finished scene assembly and placeholder locations
//! - [`panels`]: Panel budgets and panel construction
//! - [`pages`]: Greedy page packing
//! - [`rules`]: Ordered keyword rule tables
//! - [`config`]: TOML configuration
//! - [`output`]: Plan summary

pub mod config;
pub mod context;
pub mod output;
pub mod pages;
pub mod panels;
pub mod rules;
pub mod scene;
pub mod segment;
pub mod tension;
pub mod titler;

pub use config::{default_config_toml, ConfigError, ConfigSerializeError, PlannerConfig};
pub use context::PlanningContext;
pub use output::{OutputError, PlanSummary};
pub use pages::{generate_global_panel_id, generate_page_id, PageConfig, PagePacker};
pub use panels::{generate_panel_id, panel_type_for, PanelAllocator, PanelConfig};
pub use rules::{contains_any, KeywordRule, RuleTable};
pub use scene::{build_scene, generate_placeholder_location_id, generate_scene_id};
pub use segment::{BreakReason, SceneGroup, SceneInfo, SceneSegmenter, SegmentationConfig};
pub use tension::{ScoredEvent, TensionScorer, TensionWeights};
pub use titler::{SceneTitler, TitleConfig, TitleRule, TitleRuleSet};

use std::path::Path;

use comic_events::{Character, Event, Location, Mission, Page, Panel, Scene};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while planning.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A scene was requested from a group with no events
    #[error("cannot build scene {index} from an empty event group")]
    EmptySceneGroup { index: usize },
    /// Error loading configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// The output of one planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionPlan {
    pub mission_id: String,
    /// Scenes in chronological order
    pub scenes: Vec<Scene>,
    /// Pages in reading order, holding every panel
    pub pages: Vec<Page>,
    /// Locations synthesized for scenes that never named one
    pub placeholder_locations: Vec<Location>,
}

impl MissionPlan {
    /// All panels in reading order.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.pages.iter().flat_map(|p| p.panels.iter())
    }

    /// Panels belonging to one scene, in order.
    pub fn panels_for_scene<'a>(&'a self, scene_id: &'a str) -> impl Iterator<Item = &'a Panel> {
        self.panels().filter(move |p| p.scene_id == scene_id)
    }

    pub fn panel_count(&self) -> usize {
        self.pages.iter().map(|p| p.panel_count()).sum()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary::new(
            self.mission_id.clone(),
            &self.scenes,
            &self.pages,
            self.placeholder_locations.len(),
        )
    }
}

/// Runs the full segmentation and layout pipeline.
#[derive(Debug, Clone)]
pub struct ScenePlanner {
    config: PlannerConfig,
    segmenter: SceneSegmenter,
    titler: SceneTitler,
    allocator: PanelAllocator,
    packer: PagePacker,
}

impl ScenePlanner {
    /// Creates a planner from a configuration.
    pub fn new(config: PlannerConfig) -> Self {
        let scorer = TensionScorer::new(config.tension.clone());

        Self {
            segmenter: SceneSegmenter::new(config.segmentation.clone(), scorer.clone()),
            titler: SceneTitler::new(config.titles.clone()),
            allocator: PanelAllocator::new(config.panels.clone(), scorer),
            packer: PagePacker::new(config.pages.clone()),
            config,
        }
    }

    /// Creates a planner with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default())
    }

    /// Creates a planner from a TOML configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self, PlannerError> {
        Ok(Self::new(PlannerConfig::from_file(path)?))
    }

    /// Plans a layout for the given events.
    ///
    /// Characters and locations are only used for human-readable text. The
    /// inputs are not modified.
    pub fn plan(
        &self,
        mission_id: &str,
        events: &[Event],
        characters: &[Character],
        locations: &[Location],
    ) -> Result<MissionPlan, PlannerError> {
        info!(mission = %mission_id, events = events.len(), "planning mission");

        let ctx = PlanningContext::new(characters, locations);
        let groups = self.segmenter.segment(events);

        let mut scenes = Vec::with_capacity(groups.len());
        let mut placeholder_locations = Vec::new();
        for (index, group) in groups.iter().enumerate() {
            let (scene, placeholder) = build_scene(index, group, &self.titler, &ctx)?;
            scenes.push(scene);
            placeholder_locations.extend(placeholder);
        }

        let allocated: Vec<(&Scene, Vec<Panel>)> = scenes
            .iter()
            .zip(groups.iter())
            .map(|(scene, group)| (scene, self.allocator.allocate(scene, &group.events)))
            .collect();
        let pages = self.packer.pack(mission_id, allocated);

        let plan = MissionPlan {
            mission_id: mission_id.to_string(),
            scenes,
            pages,
            placeholder_locations,
        };

        info!(
            mission = %mission_id,
            scenes = plan.scenes.len(),
            panels = plan.panel_count(),
            pages = plan.pages.len(),
            "mission planned"
        );

        Ok(plan)
    }

    /// Plans a mission and attaches the scenes and pages to it.
    ///
    /// Placeholder locations are added to the mission's location table so
    /// every scene location resolves. Characters and events are untouched.
    pub fn plan_mission(&self, mut mission: Mission) -> Result<Mission, PlannerError> {
        let plan = self.plan(
            &mission.id,
            &mission.events,
            &mission.characters,
            &mission.locations,
        )?;

        for location in plan.placeholder_locations {
            if mission.location(&location.id).is_none() {
                mission.locations.push(location);
            }
        }
        mission.scenes = plan.scenes;
        mission.pages = plan.pages;

        Ok(mission)
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &SceneSegmenter {
        &self.segmenter
    }

    pub fn allocator(&self) -> &PanelAllocator {
        &self.allocator
    }
}

impl Default for ScenePlanner {
    fn default() -> Self {
        Self::with_defaults()
    }
}
