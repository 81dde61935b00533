//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check;
mod keys;
mod normalize;
mod points;

pub use check::Check;
pub use keys::Keys;
pub use normalize::Normalize;
pub use points::Points;
