//! Rendering data
//!
//! The simulation is drawn from instance lists; the drawing surface itself
//! belongs to the presentation layer.

pub mod frame;
pub mod vertex;

pub use frame::{HealthBand, PowerUpStatus, RenderFrame, build_frame};
pub use vertex::{Instance, Shape};
