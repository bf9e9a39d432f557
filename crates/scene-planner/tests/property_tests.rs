//! Property tests for segmentation and layout invariants.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use comic_events::{Event, EventKind, Scene, SceneType};
use proptest::prelude::*;
use scene_planner::{MissionPlan, ScenePlanner, SceneSegmenter, TensionScorer};

const DESCRIPTIONS: &[&str] = &[
    "Borin attacks the guard",
    "Thalia casts a spell",
    "Pip climbs the wall",
    "They run for the door",
    "Thalia says \"No! Stop!\"",
    "The final battle begins",
    "Pip shouts \"help!\" in danger",
    "The room is quiet",
    "Gibbulous whispers a warning",
    "A last desperate strike to kill",
    "",
];

const LOCATIONS: &[&str] = &["gatehouse", "ship", "temple"];
const CHARACTERS: &[&str] = &["thalia", "borin", "pip", "gibbulous"];

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(19, 0, 0)
        .unwrap()
}

type EventParts = (i64, usize, Option<usize>, usize, Option<usize>, Option<usize>);

fn event_parts() -> impl Strategy<Value = EventParts> {
    (
        0i64..480,
        0..EventKind::all().len(),
        prop::option::of(0..LOCATIONS.len()),
        0..DESCRIPTIONS.len(),
        prop::option::of(0..CHARACTERS.len()),
        prop::option::of(0..CHARACTERS.len()),
    )
}

fn events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(event_parts(), 0..40).prop_map(|parts| {
        parts
            .into_iter()
            .enumerate()
            .map(|(i, (offset, kind, location, description, speaker, participant))| {
                let mut event = Event::new(
                    format!("e{}", i),
                    base_time() + Duration::minutes(offset),
                    EventKind::all()[kind],
                    DESCRIPTIONS[description],
                );
                if let Some(l) = location {
                    event = event.at_location(LOCATIONS[l]);
                }
                if let Some(s) = speaker {
                    event = event.with_speaker(CHARACTERS[s]);
                }
                if let Some(p) = participant {
                    event = event.with_participant(CHARACTERS[p]);
                }
                event
            })
            .collect()
    })
}

fn sorted_ids(events: &[Event]) -> Vec<String> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);
    sorted.into_iter().map(|e| e.id.clone()).collect()
}

fn plan(events: &[Event]) -> MissionPlan {
    ScenePlanner::with_defaults()
        .plan("mission_prop", events, &[], &[])
        .unwrap()
}

fn expected_budget(scene: &Scene) -> u32 {
    let mut count = match scene.scene_type {
        SceneType::Combat => 3,
        SceneType::Action => 2,
        SceneType::Dialogue => 1,
    };
    if scene.main_characters.len() > 2 {
        count += 1;
    }
    if scene.dramatic_tension > 0.8 {
        count += 2;
    } else if scene.dramatic_tension > 0.5 {
        count += 1;
    }
    if scene.event_ids.len() > 5 {
        count += 1;
    }
    count.clamp(1, 4)
}

proptest! {
    #[test]
    fn segments_partition_sorted_input(events in events()) {
        let groups = SceneSegmenter::default().segment(&events);

        prop_assert!(groups.iter().all(|g| !g.is_empty()));

        let flattened: Vec<String> = groups
            .iter()
            .flat_map(|g| g.events.iter().map(|e| e.id.clone()))
            .collect();
        prop_assert_eq!(flattened, sorted_ids(&events));
    }

    #[test]
    fn segmentation_is_idempotent(events in events()) {
        let segmenter = SceneSegmenter::default();

        let first: Vec<Vec<String>> = segmenter
            .segment(&events)
            .iter()
            .map(|g| g.event_ids().into_iter().map(String::from).collect())
            .collect();
        let second: Vec<Vec<String>> = segmenter
            .segment(&events)
            .iter()
            .map(|g| g.event_ids().into_iter().map(String::from).collect())
            .collect();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn scene_bounds_match_member_events(events in events()) {
        let plan = plan(&events);

        for scene in &plan.scenes {
            let first = events.iter().find(|e| Some(&e.id) == scene.event_ids.first()).unwrap();
            let last = events.iter().find(|e| Some(&e.id) == scene.event_ids.last()).unwrap();

            prop_assert!(scene.start_time <= scene.end_time);
            prop_assert_eq!(scene.start_time, first.timestamp);
            prop_assert_eq!(scene.end_time, last.timestamp);
            prop_assert!((0.0..=1.0).contains(&scene.dramatic_tension));
        }
    }

    #[test]
    fn tension_always_in_unit_range(
        text in ".{0,200}",
        kind in 0..EventKind::all().len(),
        keywords in prop::collection::vec(prop::sample::select(DESCRIPTIONS.to_vec()), 0..6),
    ) {
        let scorer = TensionScorer::default();
        let description = format!("{} {}", text, keywords.join(" "));
        let event = Event::new("e", base_time(), EventKind::all()[kind], description);

        let score = scorer.score(&event);
        prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn panel_budget_follows_formula(events in events()) {
        let planner = ScenePlanner::with_defaults();
        let plan = planner.plan("mission_prop", &events, &[], &[]).unwrap();

        for scene in &plan.scenes {
            let budget = planner.allocator().panel_budget(scene);
            prop_assert!((1..=4).contains(&budget));
            prop_assert_eq!(budget, expected_budget(scene));

            let panels: Vec<_> = plan.panels_for_scene(&scene.id).collect();
            prop_assert!(panels.len() as u32 <= budget);
            for (i, panel) in panels.iter().enumerate() {
                prop_assert_eq!(panel.panel_number as usize, i + 1);
                if let Some(event_id) = &panel.event_id {
                    prop_assert!(scene.contains_event(event_id));
                }
            }
        }
    }

    #[test]
    fn pages_respect_capacity_and_tense_panels_stay_within_soft_cap(events in events()) {
        let plan = plan(&events);

        for page in &plan.pages {
            prop_assert!(!page.panels.is_empty());
            prop_assert!(page.panel_count() <= 6);

            // A tense panel sits in slots 1-4 of its page; calm panels after it
            // may still fill the page to 6.
            for (slot, panel) in page.panels.iter().enumerate() {
                let scene = plan.scenes.iter().find(|s| s.id == panel.scene_id).unwrap();
                if scene.dramatic_tension > 0.7 {
                    prop_assert!(slot < 4, "tense panel {} placed at slot {}", panel.id, slot);
                }
            }
        }

        // Every panel appears once, in scene order
        let scene_order: Vec<&str> = plan.panels().map(|p| p.scene_id.as_str()).collect();
        let mut expected: Vec<&str> = Vec::new();
        for scene in &plan.scenes {
            for _ in plan.panels_for_scene(&scene.id) {
                expected.push(scene.id.as_str());
            }
        }
        prop_assert_eq!(scene_order, expected);

        let numbers: Vec<u32> = plan.pages.iter().map(|p| p.page_number).collect();
        let sequential: Vec<u32> = (1..=plan.pages.len() as u32).collect();
        prop_assert_eq!(numbers, sequential);
    }
}
