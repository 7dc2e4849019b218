//! Diagnostics for inspecting gradients. Fire-and-forget: nothing here may
//! affect the numeric results of propagation.

pub mod gradient_check;

pub use gradient_check::{gradient_check, gradient_norm, max_abs_gradient};
