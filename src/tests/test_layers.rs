use ndarray::{arr1, arr2};

use crate::activations::Activation;
use crate::error::FfnError;
use crate::layers::{FullyConnected, Layer, OutputInfo};

fn layer(inputs: usize, units: usize, bias: bool) -> FullyConnected {
    FullyConnected::new(OutputInfo::input(inputs), units, bias, Activation::Linear, 0.05)
        .expect("valid configuration")
}

#[test]
fn test_construction_rejects_zero_units() {
    let result = FullyConnected::new(OutputInfo::input(3), 0, false, Activation::Relu, 0.05);
    assert!(matches!(result, Err(FfnError::InvalidConfiguration { .. })));
}

#[test]
fn test_construction_rejects_zero_input_width() {
    let result = FullyConnected::new(OutputInfo::input(0), 2, false, Activation::Relu, 0.05);
    assert!(matches!(result, Err(FfnError::InvalidConfiguration { .. })));
}

#[test]
fn test_construction_rejects_bad_std_dev() {
    for bad in [-1.0, f32::NAN, f32::INFINITY] {
        let result = FullyConnected::new(OutputInfo::input(3), 2, false, Activation::Relu, bad);
        assert!(matches!(result, Err(FfnError::InvalidConfiguration { .. })));
    }
}

#[test]
fn test_zero_std_dev_yields_zero_weights() {
    let mut layer =
        FullyConnected::new(OutputInfo::input(3), 2, true, Activation::Relu, 0.0).unwrap();
    layer.initialize().unwrap();
    assert!(layer.weights().iter().all(|&w| w == 0.0));
}

#[test]
fn test_initialize_reports_output_shape() {
    let mut layer = layer(3, 5, true);
    let info = layer.initialize().unwrap();
    assert_eq!(info.units, 5);
    assert!(info.bias);
}

#[test]
fn test_initialize_twice_fails() {
    let mut layer = layer(3, 2, false);
    layer.initialize().unwrap();
    assert!(matches!(
        layer.initialize(),
        Err(FfnError::ProtocolViolation { .. })
    ));
}

#[test]
fn test_forward_before_initialize_fails() {
    let mut layer = layer(3, 2, false);
    let input = arr1(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        layer.forward_propagate(input.view()),
        Err(FfnError::ProtocolViolation { .. })
    ));
}

#[test]
fn test_backward_before_forward_fails() {
    let mut layer = layer(3, 2, false);
    layer.initialize().unwrap();
    let error = arr1(&[1.0, 1.0]);
    assert!(matches!(
        layer.backpropagate(error.view()),
        Err(FfnError::ProtocolViolation { .. })
    ));
}

#[test]
fn test_double_backward_fails() {
    let mut layer = layer(2, 2, false);
    layer.initialize().unwrap();
    let input = arr1(&[1.0, -1.0]);
    let error = arr1(&[0.5, 0.5]);
    layer.forward_propagate(input.view()).unwrap();
    layer.backpropagate(error.view()).unwrap();
    assert!(matches!(
        layer.backpropagate(error.view()),
        Err(FfnError::ProtocolViolation { .. })
    ));
}

#[test]
fn test_forward_shape_mismatch() {
    let mut layer = layer(3, 2, false);
    layer.initialize().unwrap();
    let input = arr1(&[1.0, 2.0]);
    assert_eq!(
        layer.forward_propagate(input.view()).unwrap_err(),
        FfnError::shape_mismatch(3, 2)
    );
}

#[test]
fn test_backward_shape_mismatch() {
    let mut layer = layer(3, 2, false);
    layer.initialize().unwrap();
    let input = arr1(&[1.0, 2.0, 3.0]);
    layer.forward_propagate(input.view()).unwrap();
    let error = arr1(&[1.0, 2.0, 3.0]);
    assert_eq!(
        layer.backpropagate(error.view()).unwrap_err(),
        FfnError::shape_mismatch(2, 3)
    );
}

#[test]
fn test_forward_output_sizing() {
    for &(inputs, units, bias) in &[(1usize, 1usize, false), (4, 7, true), (9, 2, false)] {
        let mut layer = layer(inputs, units, bias);
        layer.initialize().unwrap();
        let input = arr1(&vec![0.5; inputs]);
        let output = layer.forward_propagate(input.view()).unwrap();
        assert_eq!(output.len(), units);
    }
}

#[test]
fn test_upstream_error_excludes_bias() {
    // The upstream error must be input-sized whether or not the layer
    // carries a bias unit.
    for bias in [false, true] {
        let mut layer = layer(4, 3, bias);
        layer.initialize().unwrap();
        let input = arr1(&[1.0, 2.0, 3.0, 4.0]);
        layer.forward_propagate(input.view()).unwrap();
        let error = arr1(&[1.0, 1.0, 1.0]);
        let upstream = layer.backpropagate(error.view()).unwrap();
        assert_eq!(upstream.len(), 4);
    }
}

#[test]
fn test_reference_scenario() {
    // I=2, J=1, no bias, identity activation, W=[[2,-1]], x=[3,4].
    let mut layer = layer(2, 1, false);
    layer.initialize().unwrap();
    layer.set_weights(arr2(&[[2.0, -1.0]]).view()).unwrap();

    let input = arr1(&[3.0, 4.0]);
    let output = layer.forward_propagate(input.view()).unwrap().to_owned();
    assert_eq!(output, arr1(&[2.0]));

    let error = arr1(&[1.0]);
    let upstream = layer.backpropagate(error.view()).unwrap().to_owned();
    assert_eq!(layer.gradients(), arr2(&[[3.0, 4.0]]).view());
    assert_eq!(upstream, arr1(&[2.0, -1.0]));
}

#[test]
fn test_bias_column_in_forward_and_gradient() {
    // I=1, J=1, bias, W=[[2, 3]]: a = 2*5 + 3*1 = 13.
    let mut layer = layer(1, 1, true);
    layer.initialize().unwrap();
    layer.set_weights(arr2(&[[2.0, 3.0]]).view()).unwrap();

    let input = arr1(&[5.0]);
    let output = layer.forward_propagate(input.view()).unwrap().to_owned();
    assert_eq!(output, arr1(&[13.0]));

    let error = arr1(&[1.0]);
    let upstream = layer.backpropagate(error.view()).unwrap().to_owned();
    assert_eq!(layer.gradients(), arr2(&[[5.0, 1.0]]).view());
    assert_eq!(upstream, arr1(&[2.0]));
}

#[test]
fn test_forward_is_deterministic() {
    let mut layer = layer(3, 2, false);
    layer.initialize().unwrap();
    layer
        .set_weights(arr2(&[[0.25, -0.5, 1.0], [0.125, 2.0, -0.75]]).view())
        .unwrap();

    let input = arr1(&[0.3, -0.7, 0.9]);
    let first = layer.forward_propagate(input.view()).unwrap().to_owned();
    for _ in 0..10 {
        let again = layer.forward_propagate(input.view()).unwrap().to_owned();
        assert_eq!(first, again);
    }
}

#[test]
fn test_gradient_is_overwritten_per_backward() {
    let mut layer = layer(2, 1, false);
    layer.initialize().unwrap();
    layer.set_weights(arr2(&[[1.0, 1.0]]).view()).unwrap();

    let error = arr1(&[1.0]);
    layer.forward_propagate(arr1(&[1.0, 2.0]).view()).unwrap();
    layer.backpropagate(error.view()).unwrap();
    assert_eq!(layer.gradients(), arr2(&[[1.0, 2.0]]).view());

    // A second cycle must overwrite, not accumulate.
    layer.forward_propagate(arr1(&[3.0, 4.0]).view()).unwrap();
    layer.backpropagate(error.view()).unwrap();
    assert_eq!(layer.gradients(), arr2(&[[3.0, 4.0]]).view());
}

#[test]
fn test_parameter_slots_cover_every_weight() {
    let mut layer = layer(3, 2, true);
    layer.initialize().unwrap();
    {
        let (params, grads) = layer.parameter_slots();
        assert_eq!(params.len(), 2 * 4);
        assert_eq!(grads.len(), 2 * 4);
        // Writes through the slots must be the writes forward sees.
        for p in params.iter_mut() {
            *p = 1.0;
        }
    }
    let input = arr1(&[1.0, 1.0, 1.0]);
    let output = layer.forward_propagate(input.view()).unwrap();
    assert_eq!(output.to_owned(), arr1(&[4.0, 4.0]));
}

#[test]
fn test_parameter_slots_empty_before_initialize() {
    let mut layer = layer(3, 2, false);
    let (params, grads) = layer.parameter_slots();
    assert!(params.is_empty());
    assert!(grads.is_empty());
}

#[test]
fn test_set_weights_shape_mismatch() {
    let mut layer = layer(3, 2, false);
    layer.initialize().unwrap();
    let wrong = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
    assert!(matches!(
        layer.set_weights(wrong.view()),
        Err(FfnError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_relu_gates_the_backward_signal() {
    let mut layer = FullyConnected::new(
        OutputInfo::input(2),
        2,
        false,
        Activation::Relu,
        0.05,
    )
    .unwrap();
    layer.initialize().unwrap();
    layer
        .set_weights(arr2(&[[1.0, 0.0], [-1.0, 0.0]]).view())
        .unwrap();

    // Unit 0 fires (a=1), unit 1 does not (a=-1).
    let input = arr1(&[1.0, 0.0]);
    let output = layer.forward_propagate(input.view()).unwrap().to_owned();
    assert_eq!(output, arr1(&[1.0, 0.0]));

    let error = arr1(&[1.0, 1.0]);
    layer.backpropagate(error.view()).unwrap();
    // The dead unit contributes no gradient.
    assert_eq!(layer.gradients(), arr2(&[[1.0, 0.0], [0.0, 0.0]]).view());
}
