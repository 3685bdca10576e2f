//! Memory-resident state shared across event handlers.
//!
//! Nothing here is persisted: the registry and the access policy start from configuration on
//! every boot. Both stores are cheap to clone and share their contents between clones.

pub mod policy;
pub mod registry;

pub use policy::AccessPolicy;
pub use registry::RoomRegistry;
