//! Movement system: walk agents along their routes

use crate::core::config::MovementConfig;
use crate::core::types::{Tick, Vec2};
use crate::ecs::world::World;
use crate::entity::components::Velocity;
use crate::simulation::tick::SimEvent;
use crate::spatial::nav::NavGrid;

/// Positions are kept this far inside the far world edges
const EDGE_MARGIN: f32 = 1e-3;

/// Advance every holder of `Position` and `Velocity` by `dt_ms`
///
/// Agents with a brain target step toward it at their speed and never
/// overshoot it. Once within `arrive_epsilon` the target is cleared, the
/// velocity zeroed and the next waypoint (if any) becomes the target.
/// Agents without a target coast, their velocity decaying by `drag`.
pub fn update_movement<G: NavGrid + ?Sized>(
    world: &mut World,
    nav: &G,
    dt_ms: f32,
    config: &MovementConfig,
    tick: Tick,
    events: &mut Vec<SimEvent>,
) {
    let seconds = dt_ms.max(0.0) / 1000.0;
    let size = nav.world_size();
    let max_x = (size.x - EDGE_MARGIN).max(0.0);
    let max_y = (size.y - EDGE_MARGIN).max(0.0);

    for entity in world.snapshot::<Velocity>() {
        let Some(pos) = world.positions.get_mut(entity) else {
            continue;
        };
        let Some(vel) = world.velocities.get_mut(entity) else {
            continue;
        };
        let brain = world.brains.get_mut(entity);
        let target = brain.as_ref().and_then(|b| b.target);

        match (brain, target) {
            (Some(brain), Some(target)) => {
                let here = pos.as_vec2();
                let dist = here.distance(&target);
                if dist <= config.arrive_epsilon {
                    vel.stop();
                    brain.target = brain.path.pop_front();
                    if brain.target.is_none() {
                        tracing::trace!("Entity {} reached its destination", entity);
                        events.push(SimEvent::TargetReached { entity, tick });
                    }
                } else if seconds > 0.0 {
                    let travel = (vel.speed * seconds).min(dist);
                    let step = (target - here).normalize() * travel;
                    pos.x += step.x;
                    pos.y += step.y;
                    vel.vx = step.x / seconds;
                    vel.vy = step.y / seconds;
                }
                vel.target = brain.target;
            }
            _ => {
                vel.vx *= config.drag;
                vel.vy *= config.drag;
                pos.x += vel.vx * seconds;
                pos.y += vel.vy * seconds;
                vel.target = None;
            }
        }

        pos.x = pos.x.clamp(0.0, max_x);
        pos.y = pos.y.clamp(0.0, max_y);
    }
}

/// Ease each visual a fraction of the way toward its position
pub fn ease_visuals(world: &mut World, easing: f32) {
    let positions = &world.positions;
    for (entity, visual) in world.visuals.iter_mut() {
        if let Some(pos) = positions.get(entity) {
            let current = Vec2::new(visual.x, visual.y);
            let eased = current + (pos.as_vec2() - current) * easing;
            visual.x = eased.x;
            visual.y = eased.y;
        }
    }
}
