pub mod color;
pub mod config;
pub mod constants;
pub mod gesture;
pub mod pattern;
pub mod session;
pub mod smoothing;
pub mod state;
pub mod tracker;

pub use color::*;
pub use config::*;
pub use gesture::*;
pub use pattern::*;
pub use session::*;
pub use smoothing::*;
pub use state::*;
pub use tracker::*;
