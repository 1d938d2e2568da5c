//! Agent spawning

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::SpawnConfig;
use crate::core::types::{EntityId, GridCoord, Vec2};
use crate::ecs::world::World;
use crate::entity::components::{Brain, Position, Velocity, Visual};
use crate::entity::needs::Needs;
use crate::spatial::nav::NavGrid;

/// Uniform sample from an inclusive-exclusive `[lo, hi)` range; a
/// degenerate range yields `lo`
fn sample<R: Rng + ?Sized>(rng: &mut R, [lo, hi]: [f32; 2]) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Needs drawn from the configured ranges
pub fn random_needs<R: Rng + ?Sized>(config: &SpawnConfig, rng: &mut R) -> Needs {
    Needs {
        hunger: sample(rng, config.hunger),
        energy: sample(rng, config.energy),
        social: sample(rng, config.social),
        safety: sample(rng, config.safety),
        curiosity: sample(rng, config.curiosity),
    }
}

/// Create an agent at `at` with the full component set
pub fn spawn_agent<R: Rng + ?Sized>(
    world: &mut World,
    at: Vec2,
    config: &SpawnConfig,
    rng: &mut R,
) -> EntityId {
    let entity = world.create_entity();
    let position = Position::new(at.x, at.y);
    world.add_component(entity, position);
    world.add_component(entity, Velocity::with_speed(sample(rng, config.speed)));
    world.add_component(entity, random_needs(config, rng));
    world.add_component(entity, Brain::default());
    world.add_component(entity, Visual::at(&position));
    tracing::debug!("Spawned agent {} at ({:.1}, {:.1})", entity, at.x, at.y);
    entity
}

/// Create an agent at a random point on a random walkable tile
///
/// Returns `None` when the world has no walkable tile.
pub fn spawn_random<G: NavGrid + ?Sized, R: Rng + ?Sized>(
    world: &mut World,
    nav: &G,
    config: &SpawnConfig,
    rng: &mut R,
) -> Option<EntityId> {
    let walkable: Vec<GridCoord> = (0..nav.rows())
        .flat_map(|y| (0..nav.cols()).map(move |x| GridCoord::new(x, y)))
        .filter(|c| nav.is_walkable(c.x, c.y))
        .collect();
    let Some(tile) = walkable.choose(rng).copied() else {
        tracing::warn!("No walkable tile to spawn on");
        return None;
    };

    let size = nav.tile_size();
    let at = Vec2::new(
        tile.x as f32 * size + rng.gen::<f32>() * size,
        tile.y as f32 * size + rng.gen::<f32>() * size,
    );
    // Keep rounding from pushing the point onto the next tile
    let at = if nav.tile_of(at) == tile { at } else { nav.tile_center(tile) };
    Some(spawn_agent(world, at, config, rng))
}
