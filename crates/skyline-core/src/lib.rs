pub mod analytics;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod parallax;
pub mod random;
pub mod scene;
pub mod scroll;
pub mod simulation;
pub mod smoother;

pub use camera::*;
pub use config::*;
pub use error::*;
pub use lifecycle::*;
pub use random::*;
pub use scene::*;
pub use scroll::*;
pub use simulation::*;
pub use smoother::*;
