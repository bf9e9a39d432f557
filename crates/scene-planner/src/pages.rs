//! Page packing.
//!
//! Greedy, forward-only: panels are appended to the open page until it is
//! full, or until it reaches the soft cap and the next panel belongs to a
//! high-tension scene.

use comic_events::{Page, Panel, Scene};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for page packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Hard capacity of a page
    pub max_panels_per_page: usize,
    /// Panels after which a high-tension scene starts a fresh page
    pub soft_cap: usize,
    /// Scenes above this tension respect the soft cap
    pub high_tension_threshold: f32,
    /// Layout tag written on every page
    pub layout_type: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_panels_per_page: 6,
            soft_cap: 4,
            high_tension_threshold: 0.7,
            layout_type: "standard".to_string(),
        }
    }
}

/// Generates the id of a 1-based page.
pub fn generate_page_id(number: u32) -> String {
    format!("page_{}", number)
}

/// Generates the mission-wide id of a 1-based panel.
pub fn generate_global_panel_id(number: usize) -> String {
    format!("panel_{}", number)
}

/// Packs scene panels onto pages.
#[derive(Debug, Clone, Default)]
pub struct PagePacker {
    config: PageConfig,
}

impl PagePacker {
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    /// Decides whether the next panel of a scene with `tension` needs a fresh page.
    pub fn needs_new_page(&self, open: Option<&Page>, tension: f32) -> bool {
        match open {
            None => true,
            Some(page) => {
                let held = page.panel_count();
                held >= self.config.max_panels_per_page.max(1)
                    || (held >= self.config.soft_cap
                        && tension > self.config.high_tension_threshold)
            }
        }
    }

    /// Lays out every panel, in scene order, across as many pages as needed.
    ///
    /// Panel ids are rewritten to mission-wide `panel_N`; panel numbers within
    /// a scene are kept.
    pub fn pack(&self, mission_id: &str, scenes: Vec<(&Scene, Vec<Panel>)>) -> Vec<Page> {
        let mut pages: Vec<Page> = Vec::new();
        let mut global = 0usize;

        for (scene, panels) in scenes {
            for mut panel in panels {
                if self.needs_new_page(pages.last(), scene.dramatic_tension) {
                    let number = pages.len() as u32 + 1;
                    debug!(page = number, scene = %scene.id, "opening page");
                    pages.push(Page::new(
                        generate_page_id(number),
                        mission_id,
                        number,
                        self.config.layout_type.clone(),
                    ));
                }

                global += 1;
                panel.id = generate_global_panel_id(global);
                if let Some(page) = pages.last_mut() {
                    page.panels.push(panel);
                }
            }
        }

        pages
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }
}
