//! Needs system: per-tick need decay for every agent

use crate::core::config::NeedsConfig;
use crate::ecs::world::World;
use crate::entity::needs::DecayPolicy;
use crate::spatial::nav::NavGrid;

/// Apply the configured decay policy to every holder of `Needs`
///
/// Terrain-modulated decay reads the tile under the agent; agents without
/// a position, or on worlds without terrain, only take the base loss.
pub fn update_needs<G: NavGrid + ?Sized>(
    world: &mut World,
    nav: &G,
    dt_ms: f32,
    config: &NeedsConfig,
) {
    match config.policy {
        DecayPolicy::Drift => {
            for (_, needs) in world.needs.iter_mut() {
                needs.drift(dt_ms, config);
            }
        }
        DecayPolicy::TerrainModulated => {
            let positions = &world.positions;
            let tile_size = nav.tile_size();
            for (entity, needs) in world.needs.iter_mut() {
                let terrain = positions
                    .get(entity)
                    .map(|p| p.tile(tile_size))
                    .and_then(|t| nav.terrain(t.x, t.y));
                needs.terrain_decay(dt_ms, terrain, config);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::Position;
    use crate::entity::needs::Needs;
    use crate::spatial::nav::{NavWorld, Terrain, TerrainGrid};

    #[test]
    fn test_drift_applies_to_every_agent() {
        let nav = NavWorld::open(4, 4, 16.0).unwrap();
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        world.add_component(a, Needs::default());
        world.add_component(b, Needs::default());

        update_needs(&mut world, &nav, 100.0, &NeedsConfig::default());

        for e in [a, b] {
            let needs = world.get::<Needs>(e).unwrap();
            assert!((needs.hunger - 51.2).abs() < 1e-4);
            assert!((needs.energy - 69.2).abs() < 1e-4);
        }
    }

    #[test]
    fn test_terrain_policy_reads_tile_under_agent() {
        let mut nav = TerrainGrid::filled(4, 4, 16.0, Terrain::Grass).unwrap();
        nav.set(2, 0, Terrain::Forest);
        let config = NeedsConfig {
            policy: DecayPolicy::TerrainModulated,
            ..NeedsConfig::default()
        };

        let mut world = World::new();
        let on_grass = world.create_entity();
        let in_forest = world.create_entity();
        world.add_component(on_grass, Position::new(8.0, 8.0));
        world.add_component(in_forest, Position::new(40.0, 8.0));
        world.add_component(on_grass, Needs::default());
        world.add_component(in_forest, Needs::default());

        update_needs(&mut world, &nav, 100.0, &config);

        let grass = world.get::<Needs>(on_grass).unwrap();
        let forest = world.get::<Needs>(in_forest).unwrap();
        assert!(grass.energy > forest.energy);
        assert!(forest.safety > grass.safety);
    }

    #[test]
    fn test_terrain_policy_without_position_takes_base_loss() {
        let nav = NavWorld::open(4, 4, 16.0).unwrap();
        let config = NeedsConfig {
            policy: DecayPolicy::TerrainModulated,
            ..NeedsConfig::default()
        };
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Needs::default());

        update_needs(&mut world, &nav, 100.0, &config);

        let needs = world.get::<Needs>(e).unwrap();
        assert!(needs.hunger < Needs::default().hunger);
    }
}
