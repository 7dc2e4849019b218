use ndarray::{Array1, ArrayView1};

use crate::error::{FfnError, Result};
use crate::layers::{Layer, OutputInfo};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward network: a totally ordered sequence of layers plus the
/// optimizer that updates their parameters. The layer graph is strictly
/// linear; the output shape of layer k must equal the declared input size
/// of layer k+1, which `initialize` verifies before any propagation runs.
pub struct Network {
    pub layers: Vec<Box<dyn Layer>>,
    pub optimizer: OptimizerWrapper,
    initialized: bool,
}

impl Network {
    pub fn new(optimizer: OptimizerWrapper) -> Self {
        Network {
            layers: Vec::new(),
            optimizer,
            initialized: false,
        }
    }

    pub fn with_layer(mut self, layer: impl Layer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn add_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    /// Initialize every layer in order, leaves first, checking that each
    /// layer's produced shape matches the next layer's declared input size.
    /// Returns the shape of the network's final output.
    pub fn initialize(&mut self) -> Result<OutputInfo> {
        if self.initialized {
            return Err(FfnError::protocol_violation("initialize", "an uninitialized network"));
        }
        if self.layers.is_empty() {
            return Err(FfnError::invalid_configuration("layers", "network has no layers"));
        }

        let mut produced: Option<OutputInfo> = None;
        for layer in &mut self.layers {
            if let Some(info) = produced {
                if info.units != layer.input_size() {
                    return Err(FfnError::shape_mismatch(layer.input_size(), info.units));
                }
            }
            produced = Some(layer.initialize()?);
        }
        self.initialized = true;
        Ok(produced.expect("network has at least one layer"))
    }

    /// Forward propagation through the whole chain, returning an owned copy
    /// of the final layer's output.
    pub fn forward(&mut self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        if !self.initialized {
            return Err(FfnError::protocol_violation("forward", "initialize"));
        }
        let mut current = input.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_propagate(current.view())?.to_owned();
        }
        Ok(current)
    }

    /// Backward propagation through the whole chain in reverse, threading
    /// each layer's upstream error into the layer before it. Returns the
    /// error signal with respect to the network input.
    pub fn backpropagate(&mut self, error: ArrayView1<f32>) -> Result<Array1<f32>> {
        if !self.initialized {
            return Err(FfnError::protocol_violation("backpropagate", "initialize"));
        }
        let mut current = error.to_owned();
        for layer in self.layers.iter_mut().rev() {
            current = layer.backpropagate(current.view())?.to_owned();
        }
        Ok(current)
    }

    /// One training step on a single example under a squared-error loss:
    /// forward, backpropagate `y - t`, then an optimizer step over every
    /// layer's parameter slots. Returns the loss before the update.
    pub fn train_step(
        &mut self,
        input: ArrayView1<f32>,
        target: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        let output = self.forward(input)?;
        if target.len() != output.len() {
            return Err(FfnError::shape_mismatch(output.len(), target.len()));
        }
        let error = &output - &target;
        let loss = error.mapv(|v| v * v).sum() / 2.0;
        self.backpropagate(error.view())?;

        let Network { layers, optimizer, .. } = self;
        for (index, layer) in layers.iter_mut().enumerate() {
            let (params, grads) = layer.parameter_slots();
            optimizer.step(index, params, grads, learning_rate);
        }
        Ok(loss)
    }
}
