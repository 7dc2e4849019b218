use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The shape a layer produces, consumed by the next layer to size its own
/// inputs. `bias` records whether the producing layer carries a bias unit;
/// the output vector itself is always exactly `units` long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfo {
    pub units: usize,
    pub bias: bool,
}

impl OutputInfo {
    /// Shape descriptor for a raw network input of the given width.
    pub fn input(units: usize) -> Self {
        OutputInfo { units, bias: false }
    }
}

/// Lifecycle of a layer instance. Propagation is a two-phase protocol:
/// every `backpropagate` consumes the cached state of the immediately
/// preceding `forward_propagate` (single-slot cache, not a stack).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, buffers not yet allocated.
    Uninitialized,
    /// Initialized; a forward pass may run, a backward pass may not.
    Ready,
    /// A forward pass has run and its cached state is live.
    AwaitingBackward,
}

/// Trait defining the interface every network stage must implement.
///
/// The owning network calls [`initialize`](Layer::initialize) once, then
/// alternates [`forward_propagate`](Layer::forward_propagate) and
/// [`backpropagate`](Layer::backpropagate) per training example, with
/// optimizer steps over [`parameter_slots`](Layer::parameter_slots) in
/// between. Out-of-order calls fail with
/// [`ProtocolViolation`](crate::error::FfnError::ProtocolViolation).
pub trait Layer {
    /// Allocate all owned buffers to their final size, draw initial weights
    /// and return the shape this layer will produce. Called exactly once;
    /// a second call is a protocol violation.
    fn initialize(&mut self) -> Result<OutputInfo>;

    /// Compute the layer's output for `input` and return a borrowed view of
    /// the owned output buffer. The view stays valid until the next
    /// propagation call on this layer. The input is copied into an owned
    /// buffer, so the caller's borrow ends when this call returns.
    ///
    /// Fails with `ShapeMismatch` if `input.len()` differs from
    /// [`input_size`](Layer::input_size), and with `ProtocolViolation`
    /// before `initialize`.
    fn forward_propagate(&mut self, input: ArrayView1<f32>) -> Result<ArrayView1<'_, f32>>;

    /// Combine the downstream error signal with the cached activation
    /// derivative from the most recent forward pass, overwrite the gradient
    /// accumulator and return a borrowed view of the upstream error signal
    /// (sized [`input_size`](Layer::input_size), bias component excluded).
    ///
    /// Fails with `ShapeMismatch` if `error.len()` differs from
    /// [`output_size`](Layer::output_size), and with `ProtocolViolation`
    /// unless a forward pass immediately precedes.
    fn backpropagate(&mut self, error: ArrayView1<f32>) -> Result<ArrayView1<'_, f32>>;

    /// Paired access to every learnable scalar and its gradient accumulator,
    /// in matching order (index is the parameter id). This is how the
    /// optimizer discovers and updates parameters without per-layer-type
    /// knowledge. Empty slices before `initialize`.
    fn parameter_slots(&mut self) -> (&mut [f32], &[f32]);

    /// The input width this layer expects from upstream.
    fn input_size(&self) -> usize;

    /// The output width this layer produces.
    fn output_size(&self) -> usize;
}
