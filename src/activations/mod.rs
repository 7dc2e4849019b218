//! # Activation Functions Module
//!
//! Elementwise nonlinearities applied to a layer's pre-activation values,
//! each with a matching derivative used during backpropagation.
//!
//! - **Linear**: identity, derivative 1 everywhere
//! - **ReLU**: `max(0, x)` - the usual default for hidden layers
//! - **Sigmoid**: `1 / (1 + e^(-x))` - outputs between 0 and 1
//! - **Tanh**: hyperbolic tangent - outputs between -1 and 1
//! - **LeakyReLU**: ReLU with a small negative slope
//!
//! Both operations are pure: applying an activation never touches layer
//! parameters or cached state.

pub mod functions;

pub use functions::Activation;
