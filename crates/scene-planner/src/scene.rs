//! Turns scene groups into finished scenes.

use comic_events::{Location, Scene};
use tracing::warn;

use crate::context::PlanningContext;
use crate::segment::SceneGroup;
use crate::titler::SceneTitler;
use crate::PlannerError;

/// Generates the id of the scene at a 1-based position.
pub fn generate_scene_id(number: usize) -> String {
    format!("scene_{}", number)
}

/// Generates the id of the placeholder location for a 1-based scene position.
pub fn generate_placeholder_location_id(number: usize) -> String {
    format!("location_{}", number)
}

/// Builds the scene at `index` (0-based) from a group.
///
/// Returns the synthesized placeholder location alongside the scene when no
/// member event named one. Fails only on an empty group.
pub fn build_scene(
    index: usize,
    group: &SceneGroup<'_>,
    titler: &SceneTitler,
    ctx: &PlanningContext<'_>,
) -> Result<(Scene, Option<Location>), PlannerError> {
    let (first, last) = match (group.events.first(), group.events.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PlannerError::EmptySceneGroup { index }),
    };

    let number = index + 1;
    let id = generate_scene_id(number);

    let (location_id, placeholder) = match &group.info.location_id {
        Some(location_id) => (location_id.clone(), None),
        None => {
            let location = Location::placeholder(generate_placeholder_location_id(number));
            warn!(scene = %id, location = %location.id, "no location named, using placeholder");
            (location.id.clone(), Some(location))
        }
    };

    let scene = Scene {
        title: titler.title(&group.info, &group.events),
        description: titler.describe(&group.info, &group.events, ctx),
        start_time: first.timestamp,
        end_time: last.timestamp,
        location_id,
        event_ids: group.events.iter().map(|e| e.id.clone()).collect(),
        main_characters: group.info.main_characters.clone(),
        scene_type: group.info.scene_type,
        dramatic_tension: group.info.tension,
        id,
    };

    Ok((scene, placeholder))
}
