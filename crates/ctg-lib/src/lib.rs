pub mod chart;
pub mod config;
pub mod error;
pub mod markers;
pub mod random;
pub mod session;
pub mod strip;
pub mod synth;

pub use error::{CtgError, Result};
pub use session::{CheckTarget, Repaint, StripSession};
pub use strip::*;
