pub mod components;
pub mod needs;
pub mod personality;

pub use components::{Brain, Position, Velocity, Visual};
pub use needs::{DecayPolicy, NeedKind, Needs};
pub use personality::Personality;
