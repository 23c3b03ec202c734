pub mod config;
pub mod constants;
pub mod damping;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod hud;
pub mod instance;
pub mod landmark;
pub mod layout;
pub mod photos;
pub mod signal;
pub mod state;
pub mod transition;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use frame::FrameLoop;
pub use gesture::*;
pub use hud::*;
pub use instance::*;
pub use landmark::*;
pub use layout::ObjectLayout;
pub use photos::*;
pub use signal::*;
pub use state::*;
pub use transition::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
