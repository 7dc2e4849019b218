//! # ffnet - Feed-Forward Neural Network Core
//!
//! ffnet is the computational core of a feed-forward neural-network toolkit:
//! a composable [`Layer`](layers::Layer) contract together with a concrete
//! [`FullyConnected`](layers::FullyConnected) layer performing forward and
//! backward propagation with exact shape and aliasing discipline.
//!
//! ## Quick Start
//!
//! ```rust
//! use ffnet::activations::Activation;
//! use ffnet::layers::{FullyConnected, OutputInfo};
//! use ffnet::network::Network;
//! use ffnet::optimizer::{OptimizerWrapper, Sgd};
//!
//! let mut network = Network::new(OptimizerWrapper::Sgd(Sgd::new()))
//!     .with_layer(FullyConnected::new(OutputInfo::input(4), 8, true, Activation::Tanh, 0.05).unwrap())
//!     .with_layer(FullyConnected::new(OutputInfo::input(8), 2, true, Activation::Linear, 0.05).unwrap());
//! network.initialize().unwrap();
//!
//! let input = ndarray::arr1(&[0.1, 0.2, 0.3, 0.4]);
//! let output = network.forward(input.view()).unwrap();
//! assert_eq!(output.len(), 2);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Elementwise activation functions and their derivatives
//! - [`dataset`] - Dataset boundary: in-memory storage and index-based views
//! - [`debug`] - Gradient-checking diagnostics
//! - [`error`] - Error types and result handling
//! - [`layers`] - The layer contract and the fully connected layer
//! - [`network`] - Ordered layer chain driving initialize/forward/backward
//! - [`optimizer`] - Optimizers over registered parameter/gradient slots

pub mod activations;
pub mod dataset;
pub mod debug;
pub mod error;
pub mod layers;
pub mod network;
pub mod optimizer;

#[cfg(test)]
mod tests;
