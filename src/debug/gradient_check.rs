use ndarray::ArrayView1;

use crate::error::{FfnError, Result};
use crate::layers::Layer;

/// Compare a layer's analytic weight gradient against a central
/// finite-difference estimate under a half squared-error loss.
///
/// Returns the absolute difference per parameter, in parameter-slot order.
/// Every perturbed weight is restored, so the check is a pure diagnostic:
/// it never changes what the layer would compute afterwards.
pub fn gradient_check(
    layer: &mut dyn Layer,
    input: ArrayView1<f32>,
    target: ArrayView1<f32>,
    epsilon: f32,
) -> Result<Vec<f32>> {
    let output = layer.forward_propagate(input.view())?.to_owned();
    if target.len() != output.len() {
        return Err(FfnError::shape_mismatch(output.len(), target.len()));
    }
    let error = &output - &target;
    layer.backpropagate(error.view())?;
    let analytic: Vec<f32> = layer.parameter_slots().1.to_vec();

    let mut differences = Vec::with_capacity(analytic.len());
    for k in 0..analytic.len() {
        let original = layer.parameter_slots().0[k];

        layer.parameter_slots().0[k] = original + epsilon;
        let loss_plus = half_squared_error(layer, input.view(), target.view())?;

        layer.parameter_slots().0[k] = original - epsilon;
        let loss_minus = half_squared_error(layer, input.view(), target.view())?;

        layer.parameter_slots().0[k] = original;
        let numerical = (loss_plus - loss_minus) / (2.0 * epsilon);
        differences.push((numerical - analytic[k]).abs());
    }

    // Leave the cached forward state consistent with the restored weights.
    layer.forward_propagate(input.view())?;
    Ok(differences)
}

fn half_squared_error(
    layer: &mut dyn Layer,
    input: ArrayView1<f32>,
    target: ArrayView1<f32>,
) -> Result<f32> {
    let output = layer.forward_propagate(input)?;
    Ok(output
        .iter()
        .zip(target.iter())
        .map(|(&y, &t)| (y - t) * (y - t))
        .sum::<f32>()
        / 2.0)
}

/// Euclidean norm of a gradient slice, for clipping diagnostics.
pub fn gradient_norm(grads: &[f32]) -> f32 {
    grads.iter().map(|&g| g * g).sum::<f32>().sqrt()
}

/// Largest absolute gradient entry, for exploding-gradient checks.
pub fn max_abs_gradient(grads: &[f32]) -> f32 {
    grads.iter().map(|&g| g.abs()).fold(0.0, f32::max)
}
