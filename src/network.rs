use std::fmt;

use log::{debug, trace};

use crate::activation::{Activation, DerivativeOrder};
use crate::layer::{Layer, Weights};
use crate::normalization::{NormPair, Normalizer, Regularization};
use crate::{Error, Result};

/// A configured dense feed-forward network.
///
/// Layers are stored in evaluation order `[input, hidden.., output]`; the hidden layers are
/// the range `1..n_layers() - 1`. Weight stage `s` connects layer `s` to layer `s + 1`.
///
/// The network owns the buffers of its most recent evaluation (output values, Jacobian,
/// Hessian). They are overwritten by every call to [`Network::evaluate`], which takes
/// `&mut self`; clone the network to evaluate from several threads.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    weights: Vec<Weights>,
    activations: Vec<Activation>,

    input_names: Vec<String>,
    output_names: Vec<String>,
    input_norms: Vec<NormPair>,
    output_norms: Vec<NormPair>,
    input_scaling: &'static dyn Normalizer,
    output_scaling: &'static dyn Normalizer,

    compute_gradient: bool,
    compute_second_gradient: bool,
    computed: DerivativeOrder,

    outputs: Vec<f64>,
    // Row-major (n_outputs, n_inputs).
    jacobian: Vec<f64>,
    // Row-major (n_outputs, n_inputs, n_inputs).
    hessian: Vec<f64>,
    psi: Vec<f64>,
}

impl Network {
    /// Size a network from its layers. `layers` holds at least input, one hidden and output.
    pub(crate) fn from_layers(mut layers: Vec<Layer>) -> Self {
        debug_assert!(layers.len() >= 3);

        let n_in = layers[0].neurons();
        let n_out = layers[layers.len() - 1].neurons();

        let weights: Vec<Weights> = layers
            .windows(2)
            .map(|w| Weights::new(w[0].neurons(), w[1].neurons()))
            .collect();
        for layer in &mut layers {
            layer.size_gradients(n_in);
        }

        let n_layers = layers.len();
        debug!(
            "network sized: {n_layers} layers, {} weight stages, {n_in} inputs, {n_out} outputs",
            weights.len()
        );

        Self {
            layers,
            weights,
            activations: vec![Activation::None; n_layers],
            input_names: vec![String::new(); n_in],
            output_names: vec![String::new(); n_out],
            input_norms: vec![(0.0, 1.0); n_in],
            output_norms: vec![(0.0, 1.0); n_out],
            input_scaling: Regularization::MinMax.normalizer(),
            output_scaling: Regularization::MinMax.normalizer(),
            compute_gradient: false,
            compute_second_gradient: false,
            computed: DerivativeOrder::None,
            outputs: vec![0.0; n_out],
            jacobian: vec![0.0; n_out * n_in],
            hessian: vec![0.0; n_out * n_in * n_in],
            psi: vec![0.0; n_in],
        }
    }

    /// Total number of layers, input and output included.
    #[inline]
    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    /// Number of weight matrices (gaps between layers).
    #[inline]
    pub fn n_weight_layers(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn n_hidden_layers(&self) -> usize {
        self.layers.len() - 2
    }

    #[inline]
    pub fn n_inputs(&self) -> usize {
        self.input_names.len()
    }

    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.output_names.len()
    }

    pub fn n_neurons(&self, layer: usize) -> Result<usize> {
        Ok(self.layer_at(layer)?.neurons())
    }

    pub fn layer(&self, layer: usize) -> Option<&Layer> {
        self.layers.get(layer)
    }

    /// The hidden layers, in evaluation order.
    pub fn hidden_layers(&self) -> &[Layer] {
        &self.layers[1..self.layers.len() - 1]
    }

    /// Weight matrix between layer `stage` and layer `stage + 1`.
    pub fn weights(&self, stage: usize) -> Option<&Weights> {
        self.weights.get(stage)
    }

    #[inline]
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn weight_stages(&self) -> &[Weights] {
        &self.weights
    }

    /// One tag per layer, the input layer's included.
    #[inline]
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn activations(&self) -> &[Activation] {
        &self.activations
    }

    #[inline]
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn input_norms(&self) -> &[NormPair] {
        &self.input_norms
    }

    #[inline]
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn output_norms(&self) -> &[NormPair] {
        &self.output_norms
    }

    // Configuration.

    /// Set the weight of the synapse from `from` in layer `layer` to `to` in layer `layer + 1`.
    pub fn set_weight(&mut self, layer: usize, from: usize, to: usize, value: f64) -> Result<()> {
        self.check_synapse(layer, from, to)?;
        self.weights[layer].set(from, to, value);
        Ok(())
    }

    pub fn weight(&self, layer: usize, from: usize, to: usize) -> Result<f64> {
        self.check_synapse(layer, from, to)?;
        Ok(self.weights[layer].get(from, to))
    }

    pub fn set_bias(&mut self, layer: usize, neuron: usize, value: f64) -> Result<()> {
        let n = self.n_neurons(layer)?;
        check_index("neuron", neuron, n)?;
        self.layers[layer].biases_mut()[neuron] = value;
        Ok(())
    }

    pub fn bias(&self, layer: usize, neuron: usize) -> Result<f64> {
        let l = self.layer_at(layer)?;
        check_index("neuron", neuron, l.neurons())?;
        Ok(l.biases()[neuron])
    }

    /// Set a layer's activation by its name (`"relu"`, `"tanh"`, ...).
    ///
    /// The tag of the input layer (index 0) is stored but never used.
    pub fn set_activation(&mut self, layer: usize, name: &str) -> Result<()> {
        let activation = name.parse()?;
        self.set_activation_function(layer, activation)
    }

    pub fn set_activation_function(&mut self, layer: usize, activation: Activation) -> Result<()> {
        check_index("layer", layer, self.layers.len())?;
        debug!("layer {layer} activation set to {activation}");
        self.activations[layer] = activation;
        Ok(())
    }

    pub fn activation_function(&self, layer: usize) -> Result<Activation> {
        check_index("layer", layer, self.layers.len())?;
        Ok(self.activations[layer])
    }

    pub fn set_input_name(&mut self, input: usize, name: impl Into<String>) -> Result<()> {
        check_index("input", input, self.n_inputs())?;
        self.input_names[input] = name.into();
        Ok(())
    }

    pub fn set_output_name(&mut self, output: usize, name: impl Into<String>) -> Result<()> {
        check_index("output", output, self.n_outputs())?;
        self.output_names[output] = name.into();
        Ok(())
    }

    pub fn input_name(&self, input: usize) -> Result<&str> {
        check_index("input", input, self.n_inputs())?;
        Ok(&self.input_names[input])
    }

    pub fn output_name(&self, output: usize) -> Result<&str> {
        check_index("output", output, self.n_outputs())?;
        Ok(&self.output_names[output])
    }

    #[inline]
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    #[inline]
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// Set the normalization pair of an input; its meaning follows the input regularization.
    ///
    /// The pair is not checked here since the policy may still change. A pair of zero width
    /// under the final policy (`lower == upper`, or a zero `std`/spread) makes `evaluate`
    /// produce non-finite values; JSON definitions reject it.
    pub fn set_input_norm(&mut self, input: usize, params: NormPair) -> Result<()> {
        check_index("input", input, self.n_inputs())?;
        self.input_norms[input] = params;
        Ok(())
    }

    /// Set the normalization pair of an output; its meaning follows the output regularization.
    ///
    /// Same caveat as [`Network::set_input_norm`] for zero-width pairs.
    pub fn set_output_norm(&mut self, output: usize, params: NormPair) -> Result<()> {
        check_index("output", output, self.n_outputs())?;
        self.output_norms[output] = params;
        Ok(())
    }

    pub fn input_norm(&self, input: usize) -> Result<NormPair> {
        check_index("input", input, self.n_inputs())?;
        Ok(self.input_norms[input])
    }

    pub fn output_norm(&self, output: usize) -> Result<NormPair> {
        check_index("output", output, self.n_outputs())?;
        Ok(self.output_norms[output])
    }

    pub fn set_input_regularization(&mut self, method: Regularization) {
        debug!("input regularization set to {method}");
        self.input_scaling = method.normalizer();
    }

    pub fn set_output_regularization(&mut self, method: Regularization) {
        debug!("output regularization set to {method}");
        self.output_scaling = method.normalizer();
    }

    pub fn input_regularization(&self) -> Regularization {
        self.input_scaling.regularization()
    }

    pub fn output_regularization(&self) -> Regularization {
        self.output_scaling.regularization()
    }

    /// Whether a raw value of `input` lies in the region the network was trained on.
    ///
    /// Advisory: `evaluate` extrapolates regardless.
    pub fn check_input_inclusion(&self, value: f64, input: usize) -> Result<bool> {
        check_index("input", input, self.n_inputs())?;
        Ok(self.input_scaling.includes(value, self.input_norms[input]))
    }

    // Evaluation.

    /// Request first-order derivatives from subsequent evaluations.
    pub fn set_first_order_gradient(&mut self, enabled: bool) {
        self.compute_gradient = enabled;
    }

    /// Request second-order derivatives from subsequent evaluations.
    ///
    /// Only effective while first-order derivatives are requested as well.
    pub fn set_second_order_gradient(&mut self, enabled: bool) {
        self.compute_second_gradient = enabled;
    }

    /// The derivative order the next evaluation will compute.
    pub fn requested_order(&self) -> DerivativeOrder {
        match (self.compute_gradient, self.compute_second_gradient) {
            (false, _) => DerivativeOrder::None,
            (true, false) => DerivativeOrder::First,
            (true, true) => DerivativeOrder::Second,
        }
    }

    /// The derivative order the last evaluation computed.
    pub fn computed_order(&self) -> DerivativeOrder {
        self.computed
    }

    /// Evaluate the network for raw (dimensional) inputs.
    ///
    /// Returns the de-normalized outputs. Derivatives w.r.t. the raw inputs are available
    /// through [`Network::d_output_d_input`] and [`Network::d2_output_d_input2`] when the
    /// corresponding orders were requested.
    ///
    /// Does not allocate.
    pub fn evaluate(&mut self, inputs: &[f64]) -> Result<&[f64]> {
        let n_in = self.n_inputs();
        if inputs.len() != n_in {
            return Err(Error::InvalidShape(format!(
                "input len {} does not match network inputs {n_in}",
                inputs.len()
            )));
        }

        let order = self.requested_order();
        trace!("evaluating network with {order} derivatives");

        self.layers[0].load_inputs(inputs, &self.input_norms, self.input_scaling, order);
        for idx in 1..self.layers.len() {
            // Borrow the previous layer immutably and the current one mutably.
            let (left, right) = self.layers.split_at_mut(idx);
            right[0].propagate(
                &left[idx - 1],
                &self.weights[idx - 1],
                self.activations[idx],
                order,
                &mut self.psi,
            );
        }

        self.denormalize_outputs(order);
        self.computed = order;
        Ok(&self.outputs)
    }

    /// Map the output layer back to dimensional values.
    ///
    /// Output de-normalization is affine, so derivatives only pick up the constant scale.
    fn denormalize_outputs(&mut self, order: DerivativeOrder) {
        let n_in = self.n_inputs();
        let nn = n_in * n_in;
        let output_layer = &self.layers[self.layers.len() - 1];

        for (o, &params) in self.output_norms.iter().enumerate() {
            let y = output_layer.outputs()[o];
            self.outputs[o] = self.output_scaling.denormalize(y, params);

            if !order.includes_first() {
                continue;
            }
            let scale = self.output_scaling.scale(params);
            let row = &mut self.jacobian[o * n_in..(o + 1) * n_in];
            for (dst, src) in row.iter_mut().zip(output_layer.d_output_row(o)) {
                *dst = scale * src;
            }

            if !order.includes_second() {
                continue;
            }
            let block = &mut self.hessian[o * nn..(o + 1) * nn];
            for (dst, src) in block.iter_mut().zip(output_layer.d2_output_block(o)) {
                *dst = scale * src;
            }
        }
    }

    /// Outputs of the last evaluation.
    #[inline]
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn output(&self, output: usize) -> Result<f64> {
        check_shape("output", output, self.n_outputs())?;
        Ok(self.outputs[output])
    }

    /// `d output / d input` from the last evaluation.
    pub fn d_output_d_input(&self, output: usize, input: usize) -> Result<f64> {
        self.require(DerivativeOrder::First)?;
        check_shape("output", output, self.n_outputs())?;
        check_shape("input", input, self.n_inputs())?;
        Ok(self.jacobian[output * self.n_inputs() + input])
    }

    /// `d² output / d input_a d input_b` from the last evaluation.
    pub fn d2_output_d_input2(&self, output: usize, input_a: usize, input_b: usize) -> Result<f64> {
        self.require(DerivativeOrder::Second)?;
        check_shape("output", output, self.n_outputs())?;
        check_shape("input", input_a, self.n_inputs())?;
        check_shape("input", input_b, self.n_inputs())?;
        let n = self.n_inputs();
        Ok(self.hessian[(output * n + input_a) * n + input_b])
    }

    /// Full Jacobian from the last evaluation, row-major `(n_outputs, n_inputs)`.
    pub fn jacobian(&self) -> Result<&[f64]> {
        self.require(DerivativeOrder::First)?;
        Ok(&self.jacobian)
    }

    /// Full Hessian from the last evaluation, row-major `(n_outputs, n_inputs, n_inputs)`.
    pub fn hessian(&self) -> Result<&[f64]> {
        self.require(DerivativeOrder::Second)?;
        Ok(&self.hessian)
    }

    fn require(&self, order: DerivativeOrder) -> Result<()> {
        if self.computed < order {
            return Err(Error::DerivativeNotComputed(order));
        }
        Ok(())
    }

    fn layer_at(&self, layer: usize) -> Result<&Layer> {
        self.layers.get(layer).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "layer index {layer} out of range for {} layers",
                self.layers.len()
            ))
        })
    }

    fn check_synapse(&self, layer: usize, from: usize, to: usize) -> Result<()> {
        let w = self.weights.get(layer).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "weight layer index {layer} out of range for {} weight layers",
                self.weights.len()
            ))
        })?;
        check_index("source neuron", from, w.from_neurons())?;
        check_index("target neuron", to, w.to_neurons())
    }
}

fn check_index(kind: &str, idx: usize, len: usize) -> Result<()> {
    if idx >= len {
        return Err(Error::InvalidConfig(format!(
            "{kind} index {idx} out of range (len {len})"
        )));
    }
    Ok(())
}

fn check_shape(kind: &str, idx: usize, len: usize) -> Result<()> {
    if idx >= len {
        return Err(Error::InvalidShape(format!(
            "{kind} index {idx} out of range (len {len})"
        )));
    }
    Ok(())
}

const COLUMN: usize = 18;

fn write_rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "+{}+", "-".repeat(3 * COLUMN + 4))
}

fn write_variables(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    names: &[String],
    norms: &[NormPair],
    method: Regularization,
) -> fmt::Result {
    let (a, b) = method.parameter_labels();
    write_rule(f)?;
    let heading = format!("{title} ({method} normalization)");
    writeln!(f, "| {heading:<w$}|", w = 3 * COLUMN + 2)?;
    write_rule(f)?;
    writeln!(f, "| {:<COLUMN$}| {:<COLUMN$}| {:<COLUMN$}|", "variable", a, b)?;
    write_rule(f)?;
    for (i, (name, (p, q))) in names.iter().zip(norms).enumerate() {
        let label = format!("{}: {name}", i + 1);
        writeln!(f, "| {label:<COLUMN$}| {p:>COLUMN$}| {q:>COLUMN$}|")?;
    }
    Ok(())
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_variables(
            f,
            "Inputs",
            &self.input_names,
            &self.input_norms,
            self.input_regularization(),
        )?;

        write_rule(f)?;
        writeln!(f, "| {:<w$}|", "Hidden layers", w = 3 * COLUMN + 2)?;
        write_rule(f)?;
        writeln!(
            f,
            "| {:<COLUMN$}| {:<COLUMN$}| {:<COLUMN$}|",
            "layer", "neurons", "activation"
        )?;
        write_rule(f)?;
        for (idx, layer) in self.hidden_layers().iter().enumerate() {
            let activation = self.activations[idx + 1].name();
            writeln!(
                f,
                "| {:>COLUMN$}| {:>COLUMN$}| {activation:>COLUMN$}|",
                idx + 1,
                layer.neurons()
            )?;
        }

        write_variables(
            f,
            "Outputs",
            &self.output_names,
            &self.output_norms,
            self.output_regularization(),
        )?;
        write_rule(f)?;
        write!(
            f,
            "output activation: {}",
            self.activations[self.layers.len() - 1]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkBuilder;

    fn small_network() -> Network {
        NetworkBuilder::from_sizes(&[2, 3, 1]).unwrap().build().unwrap()
    }

    #[test]
    fn defaults_after_sizing() {
        let net = small_network();
        assert_eq!(net.input_regularization(), Regularization::MinMax);
        assert_eq!(net.output_regularization(), Regularization::MinMax);
        assert_eq!(net.input_norm(1).unwrap(), (0.0, 1.0));
        assert_eq!(net.activation_function(2).unwrap(), Activation::None);
        assert_eq!(net.weight(0, 1, 2).unwrap(), 0.0);
        assert_eq!(net.requested_order(), DerivativeOrder::None);
        assert_eq!(net.hidden_layers().len(), 1);
        assert!(net.layer(0).unwrap().is_input());
        assert!(!net.layer(1).unwrap().is_input());
    }

    #[test]
    fn setters_reject_out_of_range_indices() {
        let mut net = small_network();
        assert!(matches!(net.set_weight(2, 0, 0, 1.0), Err(Error::InvalidConfig(_))));
        assert!(matches!(net.set_weight(0, 2, 0, 1.0), Err(Error::InvalidConfig(_))));
        assert!(matches!(net.set_weight(0, 0, 3, 1.0), Err(Error::InvalidConfig(_))));
        assert!(matches!(net.set_weight(1, 0, 1, 1.0), Err(Error::InvalidConfig(_))));
        assert!(net.set_weight(1, 2, 0, 1.0).is_ok());

        assert!(net.set_bias(3, 0, 1.0).is_err());
        assert!(net.set_bias(1, 3, 1.0).is_err());
        assert!(net.set_bias(2, 0, 1.0).is_ok());

        assert!(net.set_activation_function(3, Activation::Tanh).is_err());
        assert!(net.set_input_name(2, "w").is_err());
        assert!(net.set_output_name(1, "z").is_err());
        assert!(net.set_input_norm(2, (0.0, 1.0)).is_err());
        assert!(net.set_output_norm(1, (0.0, 1.0)).is_err());
        assert!(net.check_input_inclusion(0.0, 2).is_err());
        assert!(net.n_neurons(3).is_err());
    }

    #[test]
    fn setters_store_values() {
        let mut net = small_network();
        net.set_weight(0, 1, 2, 0.75).unwrap();
        net.set_bias(1, 2, -0.5).unwrap();
        net.set_activation(1, "selu").unwrap();
        net.set_input_name(0, "u").unwrap();
        net.set_output_name(0, "y").unwrap();
        net.set_output_norm(0, (-1.0, 3.0)).unwrap();

        assert_eq!(net.weight(0, 1, 2).unwrap(), 0.75);
        assert_eq!(net.weights(0).unwrap().get(1, 2), 0.75);
        assert_eq!(net.bias(1, 2).unwrap(), -0.5);
        assert_eq!(net.activation_function(1).unwrap(), Activation::Selu);
        assert_eq!(net.input_name(0).unwrap(), "u");
        assert_eq!(net.input_names(), &["u".to_owned(), String::new()]);
        assert_eq!(net.output_name(0).unwrap(), "y");
        assert_eq!(net.output_norm(0).unwrap(), (-1.0, 3.0));
    }

    #[test]
    fn unknown_activation_name_leaves_layer_unchanged() {
        let mut net = small_network();
        net.set_activation(1, "tanh").unwrap();
        let err = net.set_activation(1, "leaky_relu").unwrap_err();
        assert_eq!(err, Error::UnknownActivation("leaky_relu".to_owned()));
        assert_eq!(net.activation_function(1).unwrap(), Activation::Tanh);
    }

    #[test]
    fn second_order_flag_needs_first_order() {
        let mut net = small_network();
        net.set_second_order_gradient(true);
        assert_eq!(net.requested_order(), DerivativeOrder::None);
        net.set_first_order_gradient(true);
        assert_eq!(net.requested_order(), DerivativeOrder::Second);
        net.set_second_order_gradient(false);
        assert_eq!(net.requested_order(), DerivativeOrder::First);
    }

    #[test]
    fn derivative_reads_fail_until_computed() {
        let mut net = small_network();
        assert_eq!(
            net.d_output_d_input(0, 0),
            Err(Error::DerivativeNotComputed(DerivativeOrder::First))
        );

        net.evaluate(&[0.1, 0.2]).unwrap();
        assert!(net.jacobian().is_err());

        net.set_first_order_gradient(true);
        net.evaluate(&[0.1, 0.2]).unwrap();
        assert!(net.d_output_d_input(0, 1).is_ok());
        assert_eq!(
            net.d2_output_d_input2(0, 0, 0),
            Err(Error::DerivativeNotComputed(DerivativeOrder::Second))
        );

        net.set_second_order_gradient(true);
        net.evaluate(&[0.1, 0.2]).unwrap();
        assert_eq!(net.computed_order(), DerivativeOrder::Second);
        assert!(net.hessian().is_ok());
        assert!(matches!(
            net.d2_output_d_input2(0, 0, 2),
            Err(Error::InvalidShape(_))
        ));

        // Switching the flags off invalidates the next read, not the previous one.
        net.set_first_order_gradient(false);
        assert!(net.hessian().is_ok());
        net.evaluate(&[0.1, 0.2]).unwrap();
        assert!(net.jacobian().is_err());
    }

    #[test]
    fn evaluate_rejects_wrong_input_length() {
        let mut net = small_network();
        let err = net.evaluate(&[1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
        assert!(net.output(1).is_err());
    }

    #[test]
    fn output_side_policy_governs_denormalization() {
        // Single linear path: y_norm = x_norm.
        let mut net = NetworkBuilder::from_sizes(&[1, 1, 1]).unwrap().build().unwrap();
        net.set_weight(0, 0, 0, 1.0).unwrap();
        net.set_weight(1, 0, 0, 1.0).unwrap();
        net.set_activation_function(1, Activation::Linear).unwrap();
        net.set_activation_function(2, Activation::Linear).unwrap();
        net.set_input_regularization(Regularization::MinMax);
        net.set_input_norm(0, (0.0, 1.0)).unwrap();
        net.set_output_regularization(Regularization::Standard);
        net.set_output_norm(0, (10.0, 2.0)).unwrap();
        net.set_first_order_gradient(true);

        let y = net.evaluate(&[0.5]).unwrap()[0];
        assert_eq!(y, 11.0);
        assert_eq!(net.d_output_d_input(0, 0).unwrap(), 2.0);
    }

    #[test]
    fn zero_width_norm_is_stored_but_not_finite() {
        let mut net = NetworkBuilder::from_sizes(&[1, 1, 1]).unwrap().build().unwrap();
        net.set_weight(0, 0, 0, 1.0).unwrap();
        net.set_weight(1, 0, 0, 1.0).unwrap();
        net.set_activation_function(1, Activation::Linear).unwrap();
        net.set_activation_function(2, Activation::Linear).unwrap();
        net.set_input_norm(0, (2.0, 2.0)).unwrap();

        let y = net.evaluate(&[3.0]).unwrap()[0];
        assert!(!y.is_finite());
    }

    #[test]
    fn check_input_inclusion_uses_input_policy() {
        let mut net = small_network();
        net.set_input_norm(0, (0.0, 10.0)).unwrap();
        assert!(net.check_input_inclusion(10.0, 0).unwrap());
        assert!(!net.check_input_inclusion(10.000_000_1, 0).unwrap());

        net.set_input_regularization(Regularization::Standard);
        net.set_input_norm(0, (0.0, 1.0)).unwrap();
        assert!(net.check_input_inclusion(-2.0, 0).unwrap());
        assert!(!net.check_input_inclusion(2.5, 0).unwrap());
    }

    #[test]
    fn display_lists_variables_and_hidden_layers() {
        let mut net = NetworkBuilder::from_sizes(&[2, 4, 3, 1]).unwrap().build().unwrap();
        net.set_input_name(0, "u").unwrap();
        net.set_input_name(1, "v").unwrap();
        net.set_output_name(0, "y").unwrap();
        net.set_activation(1, "swish").unwrap();
        net.set_activation(2, "gelu").unwrap();
        net.set_output_regularization(Regularization::Robust);

        let text = net.to_string();
        assert!(text.contains("1: u"));
        assert!(text.contains("2: v"));
        assert!(text.contains("1: y"));
        assert!(text.contains("swish"));
        assert!(text.contains("gelu"));
        assert!(text.contains("robust normalization"));
        assert!(text.contains("IQ range"));
    }

    #[test]
    fn clones_evaluate_independently() {
        let mut a = small_network();
        a.set_activation_function(1, Activation::Linear).unwrap();
        a.set_activation_function(2, Activation::Linear).unwrap();
        a.set_weight(0, 0, 0, 1.0).unwrap();
        a.set_weight(1, 0, 0, 1.0).unwrap();
        let mut b = a.clone();

        let ya = a.evaluate(&[0.25, 0.0]).unwrap()[0];
        let yb = b.evaluate(&[0.75, 0.0]).unwrap()[0];
        assert_eq!(ya, 0.25);
        assert_eq!(yb, 0.75);
        assert_eq!(a.outputs(), &[0.25]);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn network_is_send_and_sync() {
        assert_send_sync::<Network>();
    }
}
