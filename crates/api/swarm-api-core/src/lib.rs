//! swarm-api-core: the spatial target surface shared by the tween core and host adapters.
//!
//! The tween core never owns transforms. It reads and writes them through
//! [`SpatialTargets`], addressed by opaque [`TargetId`] keys. Hosts implement
//! the trait over their own storage (a Bevy world, a scene graph, or the
//! in-memory [`TransformTable`] shipped here).

pub mod euler;
pub mod table;
pub mod target;

pub use euler::{from_euler_degrees, to_euler_degrees, wrap_degrees};
pub use table::{TransformRecord, TransformTable};
pub use target::{Space, SpatialTargets, TargetId};
