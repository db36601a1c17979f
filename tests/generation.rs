use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use facility_gen::mapgen::Coord;
use facility_gen::world::{
    Direction, END_TAG, GameMap, RoomTemplate, START_TAG, validate_catalog, validate_map,
};
use facility_gen::{Explorer, TemplateCatalog, generate, load_catalog_from_str};

const SITE19: &str = include_str!("../assets/site19.toml");

fn site19() -> TemplateCatalog {
    load_catalog_from_str(SITE19).unwrap()
}

fn linear() -> TemplateCatalog {
    TemplateCatalog::new(
        "linear",
        vec![
            RoomTemplate::new("S", [Direction::East]).with_tag(START_TAG),
            RoomTemplate::new("M", [Direction::West, Direction::East]),
            RoomTemplate::new("H", [Direction::West]).with_tag(END_TAG),
        ],
    )
}

/// Everything a generated map must satisfy, whatever the seed.
fn check_map(catalog: &TemplateCatalog, map: &GameMap, target: usize) {
    let problems = validate_map(map);
    assert!(problems.is_empty(), "invalid map: {:?}", problems);

    assert!(!map.is_empty());
    assert!(map.len() <= target, "{} rooms for a target of {}", map.len(), target);
    assert_eq!(map.start_room, "room_0_0");

    let mut coords = HashSet::new();
    for (id, room) in &map.rooms {
        let coord = Coord::from_room_id(id).unwrap();
        assert!(coords.insert(coord), "two rooms at {}", coord);

        let template = catalog.get(&room.template_id).unwrap();
        if *id == map.start_room {
            assert!(template.is_start());
        } else if template.exits.len() == 1 {
            assert!(
                template.is_end(),
                "'{}' is a dead end without the end tag",
                template.id
            );
        }

        for (dir, exit) in &room.exits {
            assert!(template.exits.contains(dir));
            assert_eq!(exit.door_level, template.door_level(*dir));
            assert_eq!(exit.destination, coord.step(*dir).room_id());
        }
    }
}

#[test]
fn sample_catalog_is_valid() {
    let catalog = site19();
    assert_eq!(catalog.name, "Site-19 Light Containment Zone");
    assert!(validate_catalog(&catalog).is_empty());
    assert_eq!(catalog.start_templates().len(), 2);

    let cell = catalog.get("holding_cell").unwrap();
    assert!(cell.desc.starts_with("A bare concrete cell."));
    assert_eq!(cell.door_level(Direction::East), 1);
    assert!(cell.details.contains_key("bunk"));
}

#[test]
fn linear_chain() {
    let catalog = linear();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let map = generate(&catalog, 3, &mut rng).unwrap();
        check_map(&catalog, &map, 3);

        let start = map.start().unwrap();
        assert_eq!(start.template_id, "S");
        let second = map.room("room_1_0").unwrap();
        assert!(second.exit(Direction::West).is_some());

        match second.template_id.as_str() {
            "H" => assert_eq!(map.len(), 2),
            "M" => {
                assert_eq!(map.len(), 3);
                let third = map.room("room_2_0").unwrap();
                assert!(third.exit(Direction::West).is_some());
                // Target reached, so the chain stops here either way.
                assert!(third.exit(Direction::East).is_none());
            }
            other => panic!("unexpected template '{}' at (1, 0)", other),
        }
    }
}

#[test]
fn same_seed_same_map() {
    let catalog = site19();
    let a = generate(&catalog, 25, &mut StdRng::seed_from_u64(1234)).unwrap();
    let b = generate(&catalog, 25, &mut StdRng::seed_from_u64(1234)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn json_dump_loads_back() {
    let catalog = site19();
    let map = generate(&catalog, 12, &mut StdRng::seed_from_u64(99)).unwrap();

    let json = serde_json::to_string_pretty(&map).unwrap();
    assert!(json.contains("\"description\""));
    let back: GameMap = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map);
    assert!(validate_map(&back).is_empty());
}

#[test]
fn explorer_walks_every_open_exit() {
    let catalog = site19();
    let map = generate(&catalog, 20, &mut StdRng::seed_from_u64(5)).unwrap();
    let start = map.start_room.clone();
    let exits: Vec<Direction> = map.start().unwrap().exits.keys().copied().collect();

    let mut explorer = Explorer::new(map, 9);
    explorer.initialize().unwrap();
    for dir in exits {
        explorer.step(dir.as_str());
        assert_ne!(explorer.current_room_id, start);
        explorer.step(dir.opposite().as_str());
        assert_eq!(explorer.current_room_id, start);
    }
}

proptest! {
    #[test]
    fn generated_maps_hold_together(seed in any::<u64>(), target in 1usize..60) {
        let catalog = site19();
        let mut rng = StdRng::seed_from_u64(seed);
        let map = generate(&catalog, target, &mut rng).unwrap();
        check_map(&catalog, &map, target);
    }
}
