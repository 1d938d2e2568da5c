//! Read-only agent state for presentation layers

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::types::{EntityId, GridCoord, Vec2};
use crate::ecs::world::World;
use crate::entity::components::{Brain, Position};
use crate::entity::needs::{NeedKind, Needs};
use crate::planner::{Action, Goal};

/// One agent as a renderer or log sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub tile: GridCoord,
    pub goal: Goal,
    pub action: Action,
    pub target: Option<Vec2>,
    pub needs: Option<Needs>,
}

/// Snapshot every agent that has a position and a brain
pub fn capture(world: &World, tile_size: f32) -> Vec<AgentSnapshot> {
    world
        .join::<Position, Brain>()
        .map(|(id, pos, brain)| AgentSnapshot {
            id,
            x: pos.x,
            y: pos.y,
            tile: pos.tile(tile_size),
            goal: brain.goal,
            action: brain.action,
            target: brain.target,
            needs: world.get::<Needs>(id).copied(),
        })
        .collect()
}

/// Population-level summary of a set of snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub agents: usize,
    /// Agents per goal, keyed by goal name
    pub goals: BTreeMap<&'static str, usize>,
    pub mean_needs: Option<Needs>,
}

impl PopulationSummary {
    pub fn from_snapshots(snapshots: &[AgentSnapshot]) -> Self {
        let mut goals = BTreeMap::new();
        for s in snapshots {
            *goals.entry(s.goal.name()).or_insert(0) += 1;
        }

        let with_needs: Vec<&Needs> = snapshots.iter().filter_map(|s| s.needs.as_ref()).collect();
        let mean_needs = with_needs.first().map(|first| {
            let n = with_needs.len() as f32;
            let mut mean = **first;
            for kind in NeedKind::ALL {
                let total: f32 = with_needs.iter().map(|needs| needs.get(kind)).sum();
                *mean.get_mut(kind) = total / n;
            }
            mean
        });

        Self {
            agents: snapshots.len(),
            goals,
            mean_needs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_skips_brainless_entities() {
        let mut world = World::new();
        let a = world.create_entity();
        world.add_component(a, Position::new(20.0, 4.0));
        world.add_component(a, Brain::default());
        let b = world.create_entity();
        world.add_component(b, Position::new(1.0, 1.0));

        let snaps = capture(&world, 16.0);

        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].id, a);
        assert_eq!(snaps[0].tile, GridCoord::new(1, 0));
        assert!(snaps[0].needs.is_none());
    }

    #[test]
    fn test_summary_counts_goals_and_averages_needs() {
        let mut world = World::new();
        for (goal, hunger) in [(Goal::Eat, 80.0), (Goal::Eat, 60.0), (Goal::Rest, 40.0)] {
            let e = world.create_entity();
            world.add_component(e, Position::default());
            world.add_component(
                e,
                Brain {
                    goal,
                    ..Brain::default()
                },
            );
            world.add_component(
                e,
                Needs {
                    hunger,
                    ..Needs::default()
                },
            );
        }

        let summary = PopulationSummary::from_snapshots(&capture(&world, 16.0));

        assert_eq!(summary.agents, 3);
        assert_eq!(summary.goals.get("Eat"), Some(&2));
        assert_eq!(summary.goals.get("Rest"), Some(&1));
        assert!((summary.mean_needs.unwrap().hunger - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Position::new(8.0, 8.0));
        world.add_component(e, Brain::default());

        let json = serde_json::to_string(&capture(&world, 16.0)).unwrap();

        assert!(json.contains("\"goal\":\"Idle\""));
    }
}
