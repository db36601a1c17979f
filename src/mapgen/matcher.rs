use std::collections::BTreeSet;

use crate::world::{Direction, RoomTemplate};

/// Templates that expose every required exit and none of the forbidden ones.
///
/// A position with a single mandatory connection is never filled by an untagged
/// single-exit template: those would create accidental dead ends. Only templates
/// tagged `end`, or templates with more exits, are offered there.
pub fn find_matching_templates<'a>(
    templates: &'a [RoomTemplate],
    required_exits: &BTreeSet<Direction>,
    forbidden_exits: &BTreeSet<Direction>,
) -> Vec<&'a RoomTemplate> {
    templates
        .iter()
        .filter(|t| {
            if required_exits.len() == 1 && t.exits.len() == 1 && !t.is_end() {
                return false;
            }
            required_exits.is_subset(&t.exits) && t.exits.is_disjoint(forbidden_exits)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Direction::*;
    use crate::world::{END_TAG, START_TAG};

    fn set(dirs: &[Direction]) -> BTreeSet<Direction> {
        dirs.iter().copied().collect()
    }

    fn ids(found: Vec<&RoomTemplate>) -> Vec<&str> {
        found.into_iter().map(|t| t.id.as_str()).collect()
    }

    fn catalog() -> Vec<RoomTemplate> {
        vec![
            RoomTemplate::new("start", [East]).with_tag(START_TAG),
            RoomTemplate::new("corridor", [West, East]),
            RoomTemplate::new("corner", [West, North]),
            RoomTemplate::new("closet", [West]).with_tag(END_TAG),
            RoomTemplate::new("nook", [West]),
            RoomTemplate::new("hub", [North, South, East, West]),
        ]
    }

    #[test]
    fn requires_subset_and_respects_forbidden() {
        let t = catalog();
        let found = find_matching_templates(&t, &set(&[West]), &set(&[North]));
        assert_eq!(ids(found), vec!["corridor", "closet"]);
    }

    #[test]
    fn single_exit_needs_end_tag_at_single_requirement() {
        let t = catalog();
        let found = find_matching_templates(&t, &set(&[West]), &set(&[]));
        let found = ids(found);
        assert!(found.contains(&"closet"));
        assert!(!found.contains(&"nook"));
        assert!(found.contains(&"hub"));
    }

    #[test]
    fn start_tag_alone_does_not_exempt_a_dead_end() {
        let t = catalog();
        let found = find_matching_templates(&t, &set(&[East]), &set(&[]));
        assert!(!ids(found).contains(&"start"));
    }

    #[test]
    fn multiple_requirements_filter_by_cardinality_only() {
        let t = catalog();
        let found = find_matching_templates(&t, &set(&[West, North]), &set(&[East, South]));
        assert_eq!(ids(found), vec!["corner"]);

        // No single-exit template can satisfy two requirements anyway.
        let found = find_matching_templates(&t, &set(&[West, East]), &set(&[]));
        assert_eq!(ids(found), vec!["corridor", "hub"]);
    }

    #[test]
    fn nothing_fits_returns_empty() {
        let t = catalog();
        let found = find_matching_templates(&t, &set(&[South]), &set(&[North, East, West]));
        assert!(found.is_empty());
    }
}
