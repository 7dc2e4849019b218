use ndarray::linalg::{general_mat_mul, general_mat_vec_mul};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;

use super::traits::{Layer, OutputInfo, Phase};
use crate::activations::Activation;
use crate::error::{FfnError, Result};

/// A fully connected layer: a dense affine transform followed by an
/// elementwise activation function.
///
/// With input width `I` and `J` output units the layer owns a `J x I`
/// weight matrix (`J x (I+1)` when `bias` is set, the extra column weighting
/// an implicit constant-one input) and a gradient matrix of the same shape.
/// The weight matrix is drawn once in `initialize` from a zero-mean normal
/// distribution and is never mutated by propagation; the optimizer writes it
/// through [`parameter_slots`](Layer::parameter_slots).
pub struct FullyConnected {
    input_units: usize,
    output_units: usize,
    bias: bool,
    activation: Activation,
    std_dev: f32,
    weights: Array2<f32>,
    weight_grads: Array2<f32>,
    /// Owned copy of the most recent input, with a trailing 1.0 when biased.
    input: Array1<f32>,
    pre_activation: Array1<f32>,
    output: Array1<f32>,
    /// Activation derivative at the cached pre-activation values.
    derivative: Array1<f32>,
    deltas: Array1<f32>,
    upstream_error: Array1<f32>,
    phase: Phase,
}

impl FullyConnected {
    /// Create a new fully connected layer.
    ///
    /// `info` is the shape produced by the upstream layer (or
    /// [`OutputInfo::input`] for the network's raw input), `units` the number
    /// of output units, and `std_dev` the standard deviation of the zero-mean
    /// normal distribution the weights are drawn from. A `std_dev` of zero is
    /// accepted and yields all-zero weights.
    ///
    /// Fails with `InvalidConfiguration` on zero unit counts or a negative or
    /// non-finite `std_dev`; no propagation-time check repeats these.
    pub fn new(
        info: OutputInfo,
        units: usize,
        bias: bool,
        activation: Activation,
        std_dev: f32,
    ) -> Result<Self> {
        if info.units == 0 {
            return Err(FfnError::invalid_configuration(
                "info.units",
                "input width must be positive",
            ));
        }
        if units == 0 {
            return Err(FfnError::invalid_configuration(
                "units",
                "output unit count must be positive",
            ));
        }
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(FfnError::invalid_configuration(
                "std_dev",
                "standard deviation must be finite and non-negative",
            ));
        }

        Ok(FullyConnected {
            input_units: info.units,
            output_units: units,
            bias,
            activation,
            std_dev,
            weights: Array2::zeros((0, 0)),
            weight_grads: Array2::zeros((0, 0)),
            input: Array1::zeros(0),
            pre_activation: Array1::zeros(0),
            output: Array1::zeros(0),
            derivative: Array1::zeros(0),
            deltas: Array1::zeros(0),
            upstream_error: Array1::zeros(0),
            phase: Phase::Uninitialized,
        })
    }

    /// Overwrite the weight matrix, keeping its shape. Useful for tests and
    /// for loading externally computed weights.
    pub fn set_weights(&mut self, weights: ArrayView2<f32>) -> Result<()> {
        if self.phase == Phase::Uninitialized {
            return Err(FfnError::protocol_violation("set_weights", "initialize"));
        }
        if weights.dim() != self.weights.dim() {
            return Err(FfnError::shape_mismatch(self.weights.len(), weights.len()));
        }
        self.weights.assign(&weights);
        Ok(())
    }

    pub fn weights(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    pub fn gradients(&self) -> ArrayView2<'_, f32> {
        self.weight_grads.view()
    }

    pub fn has_bias(&self) -> bool {
        self.bias
    }

    /// Effective input width of the weight matrix, including the bias column.
    fn columns(&self) -> usize {
        self.input_units + self.bias as usize
    }
}

impl Layer for FullyConnected {
    fn initialize(&mut self) -> Result<OutputInfo> {
        if self.phase != Phase::Uninitialized {
            return Err(FfnError::protocol_violation("initialize", "an uninitialized layer"));
        }

        let columns = self.columns();
        let normal = Normal::new(0.0, self.std_dev).map_err(|_| {
            FfnError::invalid_configuration("std_dev", "not a valid normal distribution")
        })?;
        self.weights = Array2::random((self.output_units, columns), normal);
        self.weight_grads = Array2::zeros((self.output_units, columns));
        self.input = Array1::zeros(columns);
        if self.bias {
            // The constant-one input lives permanently in the last slot.
            self.input[columns - 1] = 1.0;
        }
        self.pre_activation = Array1::zeros(self.output_units);
        self.output = Array1::zeros(self.output_units);
        self.derivative = Array1::zeros(self.output_units);
        self.deltas = Array1::zeros(self.output_units);
        self.upstream_error = Array1::zeros(self.input_units);
        self.phase = Phase::Ready;

        Ok(OutputInfo {
            units: self.output_units,
            bias: self.bias,
        })
    }

    fn forward_propagate(&mut self, input: ArrayView1<f32>) -> Result<ArrayView1<'_, f32>> {
        if self.phase == Phase::Uninitialized {
            return Err(FfnError::protocol_violation("forward_propagate", "initialize"));
        }
        if input.len() != self.input_units {
            return Err(FfnError::shape_mismatch(self.input_units, input.len()));
        }

        self.input.slice_mut(s![..self.input_units]).assign(&input);
        // a = W x
        general_mat_vec_mul(1.0, &self.weights, &self.input, 0.0, &mut self.pre_activation);
        self.derivative = self.activation.derivative(&self.pre_activation);
        // y = act(a)
        self.output.assign(&self.pre_activation);
        self.activation.apply(&mut self.output);
        self.phase = Phase::AwaitingBackward;

        Ok(self.output.view())
    }

    fn backpropagate(&mut self, error: ArrayView1<f32>) -> Result<ArrayView1<'_, f32>> {
        match self.phase {
            Phase::AwaitingBackward => {}
            Phase::Uninitialized => {
                return Err(FfnError::protocol_violation("backpropagate", "initialize"));
            }
            Phase::Ready => {
                return Err(FfnError::protocol_violation("backpropagate", "forward_propagate"));
            }
        }
        if error.len() != self.output_units {
            return Err(FfnError::shape_mismatch(self.output_units, error.len()));
        }

        // deltas = ein (hadamard) act'(a)
        Zip::from(&mut self.deltas)
            .and(&error)
            .and(&self.derivative)
            .for_each(|d, &e, &yd| *d = e * yd);

        // Wd = deltas . x^T, overwritten per call; gradient accumulation
        // across examples is the optimizer's concern.
        let deltas_col = self.deltas.view().insert_axis(Axis(1));
        let input_row = self.input.view().insert_axis(Axis(0));
        general_mat_mul(1.0, &deltas_col, &input_row, 0.0, &mut self.weight_grads);

        // e = W^T . deltas over the non-bias columns only; the constant-one
        // input has no upstream layer to receive an error signal.
        let weights_in = self.weights.slice(s![.., ..self.input_units]);
        let weights_in_t = weights_in.t();
        general_mat_vec_mul(1.0, &weights_in_t, &self.deltas, 0.0, &mut self.upstream_error);
        self.phase = Phase::Ready;

        Ok(self.upstream_error.view())
    }

    fn parameter_slots(&mut self) -> (&mut [f32], &[f32]) {
        let FullyConnected { weights, weight_grads, .. } = self;
        (
            weights.as_slice_mut().expect("weight storage is contiguous"),
            weight_grads.as_slice().expect("gradient storage is contiguous"),
        )
    }

    fn input_size(&self) -> usize {
        self.input_units
    }

    fn output_size(&self) -> usize {
        self.output_units
    }
}
