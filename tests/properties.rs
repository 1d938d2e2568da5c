//! Property tests for needs, pathfinding and interaction invariants

use proptest::prelude::*;

use tile_agents::core::config::{InteractionConfig, NeedsConfig};
use tile_agents::core::types::GridCoord;
use tile_agents::ecs::world::World;
use tile_agents::entity::components::Position;
use tile_agents::entity::needs::{NeedKind, Needs};
use tile_agents::pathfinding::{Heuristic, Pathfinder};
use tile_agents::simulation::interaction::ContactTracker;
use tile_agents::spatial::nav::{NavGrid, NavWorld};

fn needs_strategy() -> impl Strategy<Value = Needs> {
    (0.0f32..=100.0, 0.0f32..=100.0, 0.0f32..=100.0, 20.0f32..=100.0, 0.0f32..=100.0).prop_map(
        |(hunger, energy, social, safety, curiosity)| Needs {
            hunger,
            energy,
            social,
            safety,
            curiosity,
        },
    )
}

fn grid_strategy() -> impl Strategy<Value = (i32, i32, Vec<bool>)> {
    (2i32..12, 2i32..12).prop_flat_map(|(cols, rows)| {
        let cells = (cols * rows) as usize;
        (Just(cols), Just(rows), prop::collection::vec(prop::bool::weighted(0.75), cells))
    })
}

proptest! {
    #[test]
    fn needs_stay_in_bounds(mut needs in needs_strategy(), dts in prop::collection::vec(0.0f32..5000.0, 1..20)) {
        let config = NeedsConfig::default();
        for dt in dts {
            needs.drift(dt, &config);
            needs.terrain_decay(dt, None, &config);
            for kind in NeedKind::ALL {
                let v = needs.get(kind);
                prop_assert!(v >= config.floors.get(kind) && v <= config.ceiling, "{:?} = {}", kind, v);
            }
        }
    }

    #[test]
    fn paths_are_walkable_and_connected(
        (cols, rows, cells) in grid_strategy(),
        sx in 0i32..12, sy in 0i32..12, gx in 0i32..12, gy in 0i32..12,
    ) {
        let nav = NavWorld::from_arrays(cols, rows, 16.0, cells, None).unwrap();
        let start = GridCoord::new(sx % cols, sy % rows);
        let goal = GridCoord::new(gx % cols, gy % rows);

        let path = Pathfinder::new(&nav).find_path(start, goal);

        if !path.is_empty() {
            prop_assert_eq!(path[0], start);
            prop_assert_eq!(*path.last().unwrap(), goal);
            for c in &path {
                prop_assert!(nav.is_walkable(c.x, c.y));
            }
            for pair in path.windows(2) {
                prop_assert_eq!(pair[0].chebyshev(&pair[1]), 1);
            }
        }
    }

    #[test]
    fn chebyshev_paths_are_never_longer(
        (cols, rows, cells) in grid_strategy(),
        sx in 0i32..12, sy in 0i32..12, gx in 0i32..12, gy in 0i32..12,
    ) {
        let nav = NavWorld::from_arrays(cols, rows, 16.0, cells, None).unwrap();
        let start = GridCoord::new(sx % cols, sy % rows);
        let goal = GridCoord::new(gx % cols, gy % rows);

        let manhattan = Pathfinder::new(&nav).find_path(start, goal);
        let chebyshev = Pathfinder::new(&nav).heuristic(Heuristic::Chebyshev).find_path(start, goal);

        prop_assert_eq!(manhattan.is_empty(), chebyshev.is_empty());
        prop_assert!(chebyshev.len() <= manhattan.len());
    }

    #[test]
    fn social_never_exceeds_ceiling(start in 0.0f32..=100.0, ticks in 1usize..60, dt in 1.0f32..500.0) {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        for e in [a, b] {
            world.add_component(e, Position::new(40.0, 40.0));
            world.add_component(e, Needs { social: start, ..Needs::default() });
        }
        let mut tracker = ContactTracker::new();
        let (interaction, needs_config) = (InteractionConfig::default(), NeedsConfig::default());

        let mut previous = start;
        for tick in 0..ticks as u64 {
            let mut events = Vec::new();
            tracker.update(&mut world, dt, &interaction, &needs_config, tick, &mut events);
            let social = world.get::<Needs>(a).unwrap().social;
            prop_assert!(social >= previous);
            prop_assert!(social <= 100.0);
            previous = social;
        }
    }
}
