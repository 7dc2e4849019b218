//! Optimizers consuming the paired parameter/gradient slots the layers
//! expose. The optimizer is the only writer of parameters after
//! initialization; it reads gradients after each backward pass and runs
//! strictly alternating with propagation.

/// Interface every optimizer implements. `layer` indexes the layer within
/// the network so stateful optimizers can keep per-layer history; the slot
/// slices come straight from `Layer::parameter_slots` and are index-aligned.
pub trait Optimizer {
    fn step(&mut self, layer: usize, params: &mut [f32], grads: &[f32], learning_rate: f32);
}

#[derive(Clone, Debug)]
pub enum OptimizerWrapper {
    Sgd(Sgd),
    Momentum(Momentum),
}

impl Optimizer for OptimizerWrapper {
    fn step(&mut self, layer: usize, params: &mut [f32], grads: &[f32], learning_rate: f32) {
        match self {
            OptimizerWrapper::Sgd(optimizer) => optimizer.step(layer, params, grads, learning_rate),
            OptimizerWrapper::Momentum(optimizer) => {
                optimizer.step(layer, params, grads, learning_rate)
            }
        }
    }
}

/// Plain stochastic gradient descent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sgd;

impl Sgd {
    pub fn new() -> Sgd {
        Sgd
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, _layer: usize, params: &mut [f32], grads: &[f32], learning_rate: f32) {
        debug_assert_eq!(params.len(), grads.len());
        for (p, &g) in params.iter_mut().zip(grads) {
            *p -= learning_rate * g;
        }
    }
}

/// Gradient descent with momentum. Velocity buffers are sized on first
/// contact with each layer and keep that size afterwards.
#[derive(Clone, Debug)]
pub struct Momentum {
    pub beta: f32,
    velocities: Vec<Vec<f32>>,
}

impl Momentum {
    pub fn new(beta: f32) -> Momentum {
        Momentum {
            beta,
            velocities: Vec::new(),
        }
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Momentum::new(0.9)
    }
}

impl Optimizer for Momentum {
    fn step(&mut self, layer: usize, params: &mut [f32], grads: &[f32], learning_rate: f32) {
        debug_assert_eq!(params.len(), grads.len());
        if self.velocities.len() <= layer {
            self.velocities.resize(layer + 1, Vec::new());
        }
        let velocity = &mut self.velocities[layer];
        if velocity.len() != params.len() {
            *velocity = vec![0.0; params.len()];
        }
        for ((p, &g), v) in params.iter_mut().zip(grads).zip(velocity.iter_mut()) {
            *v = self.beta * *v + (1.0 - self.beta) * g;
            *p -= learning_rate * *v;
        }
    }
}
