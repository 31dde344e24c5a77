//! Capability cards and the registry that holds them.

pub mod card;
pub mod registry;
pub mod set;

pub use card::CapabilityCard;
pub use registry::{MeshStatus, Registry, SharedRegistry};
pub use set::CardSet;
