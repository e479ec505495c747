use crate::activation::{Activation, DerivativeOrder};
use crate::normalization::{NormPair, Normalizer};

/// One layer of neurons and its per-evaluation state.
///
/// Besides the biases, a layer keeps the output of every neuron from the most recent
/// evaluation and, when derivatives were requested, the derivatives of those outputs
/// with respect to every network input:
///
/// - `d_outputs`: row-major `(neurons, n_inputs)`
/// - `d2_outputs`: row-major `(neurons, n_inputs, n_inputs)`
///
/// The derivative buffers are only meaningful for the order the last evaluation computed.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: usize,
    n_inputs: usize,
    is_input: bool,
    biases: Vec<f64>,
    outputs: Vec<f64>,
    d_outputs: Vec<f64>,
    d2_outputs: Vec<f64>,
}

/// Dense weights between two adjacent layers.
///
/// Row-major matrix with shape `(to_neurons, from_neurons)`.
#[derive(Debug, Clone)]
pub struct Weights {
    from_neurons: usize,
    to_neurons: usize,
    data: Vec<f64>,
}

impl Layer {
    pub fn new(neurons: usize) -> Self {
        Self {
            neurons,
            n_inputs: 0,
            is_input: false,
            biases: vec![0.0; neurons],
            outputs: vec![0.0; neurons],
            d_outputs: Vec::new(),
            d2_outputs: Vec::new(),
        }
    }

    pub(crate) fn set_input(&mut self, is_input: bool) {
        self.is_input = is_input;
    }

    /// Allocate derivative buffers for a network with `n_inputs` inputs.
    pub(crate) fn size_gradients(&mut self, n_inputs: usize) {
        self.n_inputs = n_inputs;
        self.d_outputs = vec![0.0; self.neurons * n_inputs];
        self.d2_outputs = vec![0.0; self.neurons * n_inputs * n_inputs];
    }

    #[inline]
    pub fn neurons(&self) -> usize {
        self.neurons
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        self.is_input
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    #[inline]
    pub(crate) fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    #[inline]
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Derivatives of one neuron's output w.r.t. every network input.
    #[inline]
    pub(crate) fn d_output_row(&self, neuron: usize) -> &[f64] {
        let n = self.n_inputs;
        &self.d_outputs[neuron * n..(neuron + 1) * n]
    }

    /// Second derivatives of one neuron's output, row-major `(n_inputs, n_inputs)`.
    #[inline]
    pub(crate) fn d2_output_block(&self, neuron: usize) -> &[f64] {
        let nn = self.n_inputs * self.n_inputs;
        &self.d2_outputs[neuron * nn..(neuron + 1) * nn]
    }

    /// Seed the input layer from raw input values.
    ///
    /// Each neuron takes the normalized input. Its derivative row is the identity scaled by
    /// `1 / scale`; normalization is affine, so the second derivatives are zero.
    pub(crate) fn load_inputs(
        &mut self,
        raw: &[f64],
        norms: &[NormPair],
        scaling: &dyn Normalizer,
        order: DerivativeOrder,
    ) {
        debug_assert!(self.is_input);
        debug_assert_eq!(raw.len(), self.neurons);
        debug_assert_eq!(norms.len(), self.neurons);

        let n = self.n_inputs;
        for (i, (&x, &params)) in raw.iter().zip(norms).enumerate() {
            self.outputs[i] = scaling.normalize(x, params);

            if order.includes_first() {
                let row = &mut self.d_outputs[i * n..(i + 1) * n];
                row.fill(0.0);
                row[i] = 1.0 / scaling.scale(params);
            }
        }

        if order.includes_second() {
            self.d2_outputs.fill(0.0);
        }
    }

    /// Evaluate this layer from the previous one.
    ///
    /// For every neuron `i` with pre-activation `X = b_i + sum_j w_ij y_j`:
    /// - `dY_i/dx_k = Φ'(X) ψ_k` with `ψ_k = sum_j w_ij dy_j/dx_k`
    /// - `d²Y_i/dx_k dx_l = Φ''(X) ψ_k ψ_l + Φ'(X) χ_kl` with `χ_kl = sum_j w_ij d²y_j/dx_k dx_l`
    ///
    /// `psi` is caller-provided scratch of length `n_inputs`.
    pub(crate) fn propagate(
        &mut self,
        prev: &Layer,
        weights: &Weights,
        activation: Activation,
        order: DerivativeOrder,
        psi: &mut [f64],
    ) {
        debug_assert_eq!(weights.from_neurons, prev.neurons);
        debug_assert_eq!(weights.to_neurons, self.neurons);
        debug_assert_eq!(prev.n_inputs, self.n_inputs);
        debug_assert_eq!(psi.len(), self.n_inputs);

        let n = self.n_inputs;
        for i in 0..self.neurons {
            let w = weights.row(i);

            let mut x = self.biases[i];
            for (wj, yj) in w.iter().zip(&prev.outputs) {
                x = wj.mul_add(*yj, x);
            }

            let phi = activation.evaluate(x, order);
            self.outputs[i] = phi.value;

            if !order.includes_first() {
                continue;
            }

            psi.fill(0.0);
            for (j, wj) in w.iter().enumerate() {
                for (p, d) in psi.iter_mut().zip(prev.d_output_row(j)) {
                    *p = wj.mul_add(*d, *p);
                }
            }

            let row = &mut self.d_outputs[i * n..(i + 1) * n];
            for (r, p) in row.iter_mut().zip(psi.iter()) {
                *r = p * phi.first;
            }

            if !order.includes_second() {
                continue;
            }

            // Hessians are symmetric, fill the upper triangle and mirror it.
            let block = &mut self.d2_outputs[i * n * n..(i + 1) * n * n];
            for k in 0..n {
                for l in k..n {
                    let mut chi = 0.0;
                    for (j, wj) in w.iter().enumerate() {
                        chi = wj.mul_add(prev.d2_outputs[(j * n + k) * n + l], chi);
                    }
                    let v = phi.second * psi[k] * psi[l] + phi.first * chi;
                    block[k * n + l] = v;
                    block[l * n + k] = v;
                }
            }
        }
    }
}

impl Weights {
    pub fn new(from_neurons: usize, to_neurons: usize) -> Self {
        Self {
            from_neurons,
            to_neurons,
            data: vec![0.0; from_neurons * to_neurons],
        }
    }

    #[inline]
    pub fn from_neurons(&self) -> usize {
        self.from_neurons
    }

    #[inline]
    pub fn to_neurons(&self) -> usize {
        self.to_neurons
    }

    /// Weight of the synapse `from -> to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[to * self.from_neurons + from]
    }

    #[inline]
    pub(crate) fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[to * self.from_neurons + from] = value;
    }

    /// Incoming weights of neuron `to`.
    #[inline]
    pub fn row(&self, to: usize) -> &[f64] {
        let n = self.from_neurons;
        &self.data[to * n..(to + 1) * n]
    }

    /// Row-major `(to_neurons, from_neurons)`.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::Regularization;

    fn input_layer(n: usize) -> Layer {
        let mut layer = Layer::new(n);
        layer.set_input(true);
        layer.size_gradients(n);
        layer
    }

    #[test]
    fn weights_are_indexed_from_then_to() {
        let mut w = Weights::new(3, 2);
        w.set(2, 1, 5.0);
        w.set(0, 0, -1.0);
        assert_eq!(w.get(2, 1), 5.0);
        assert_eq!(w.row(1), &[0.0, 0.0, 5.0]);
        assert_eq!(w.row(0), &[-1.0, 0.0, 0.0]);
        assert_eq!(w.as_slice().len(), 6);
    }

    #[test]
    fn input_layer_seeds_scaled_identity() {
        let mut layer = input_layer(2);
        let norms = [(0.0, 4.0), (1.0, 3.0)];
        let scaling = Regularization::MinMax.normalizer();

        layer.load_inputs(&[2.0, 2.0], &norms, scaling, DerivativeOrder::Second);

        assert_eq!(layer.outputs(), &[0.5, 0.5]);
        assert_eq!(layer.d_output_row(0), &[0.25, 0.0]);
        assert_eq!(layer.d_output_row(1), &[0.0, 0.5]);
        assert!(layer.d2_output_block(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn propagate_applies_chain_rule_for_single_neuron() {
        // y = tanh(2 * x0 - x1 + 0.1), inputs unnormalized.
        let mut input = input_layer(2);
        let norms = [(0.0, 1.0), (0.0, 1.0)];
        let scaling = Regularization::MinMax.normalizer();
        let x = [0.3, -0.2];
        input.load_inputs(&x, &norms, scaling, DerivativeOrder::Second);

        let mut out = Layer::new(1);
        out.size_gradients(2);
        out.biases_mut()[0] = 0.1;
        let mut w = Weights::new(2, 1);
        w.set(0, 0, 2.0);
        w.set(1, 0, -1.0);

        let mut psi = vec![0.0; 2];
        out.propagate(&input, &w, Activation::Tanh, DerivativeOrder::Second, &mut psi);

        let z = 2.0 * x[0] - x[1] + 0.1;
        let t = z.tanh();
        let s = 1.0 - t * t;
        assert!((out.outputs()[0] - t).abs() < 1e-15);

        let grad = out.d_output_row(0);
        assert!((grad[0] - 2.0 * s).abs() < 1e-15);
        assert!((grad[1] + s).abs() < 1e-15);

        let second = -2.0 * t * s;
        let expected = [4.0 * second, -2.0 * second, -2.0 * second, second];
        for (h, e) in out.d2_output_block(0).iter().zip(expected) {
            assert!((h - e).abs() < 1e-14, "{h} vs {e}");
        }
    }

    #[test]
    fn value_only_propagation_leaves_derivatives_untouched() {
        let mut input = input_layer(1);
        input.load_inputs(
            &[0.5],
            &[(0.0, 1.0)],
            Regularization::MinMax.normalizer(),
            DerivativeOrder::None,
        );

        let mut out = Layer::new(1);
        out.size_gradients(1);
        let mut w = Weights::new(1, 1);
        w.set(0, 0, 3.0);

        let mut psi = vec![0.0; 1];
        out.propagate(&input, &w, Activation::Linear, DerivativeOrder::None, &mut psi);
        assert_eq!(out.outputs(), &[1.5]);
        assert_eq!(out.d_output_row(0), &[0.0]);
    }
}
