pub mod decision;
pub mod interaction;
pub mod movement;
pub mod needs;
pub mod snapshot;
pub mod spawn;
pub mod tick;

pub use decision::DecisionSystem;
pub use interaction::ContactTracker;
pub use movement::{ease_visuals, update_movement};
pub use needs::update_needs;
pub use snapshot::{AgentSnapshot, PopulationSummary};
pub use spawn::{spawn_agent, spawn_random};
pub use tick::{SimEvent, Simulation};
