//! Network topology builder.
//!
//! `NetworkBuilder` fixes the structure of a network: the input layer, any number of hidden
//! layers in order, and the output layer. [`NetworkBuilder::build`] is the sizing step: it
//! allocates every weight matrix and derivative buffer from the now-fixed neuron counts.
//!
//! After `build`, the structure can no longer change; weights, biases, activations and
//! normalization parameters are written through the setters on [`Network`].

use log::debug;

use crate::{Error, Layer, Network, Result};

#[derive(Debug, Clone, Default)]
/// Builder for a [`Network`].
///
/// Example:
///
/// ```rust
/// use mlp_surrogate::NetworkBuilder;
///
/// # fn main() -> mlp_surrogate::Result<()> {
/// let network = NetworkBuilder::new()
///     .input_layer(2)?
///     .hidden_layer(8)?
///     .hidden_layer(8)?
///     .output_layer(1)?
///     .build()?;
/// assert_eq!(network.n_layers(), 4);
/// # Ok(())
/// # }
/// ```
pub struct NetworkBuilder {
    input: Option<usize>,
    hidden: Vec<usize>,
    output: Option<usize>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor from a sizes list `[inputs, hidden.., outputs]`.
    ///
    /// `sizes` must contain at least one hidden layer, so its length must be at least 3.
    pub fn from_sizes(sizes: &[usize]) -> Result<Self> {
        let [input, hidden @ .., output] = sizes else {
            return Err(Error::InvalidConfig(
                "sizes must include input and output layers".to_owned(),
            ));
        };

        let mut b = Self::new().input_layer(*input)?;
        for &n in hidden {
            b = b.hidden_layer(n)?;
        }
        b.output_layer(*output)
    }

    /// Define the input layer. Calling this again replaces the previous definition.
    pub fn input_layer(mut self, neurons: usize) -> Result<Self> {
        check_size("input", neurons)?;
        self.input = Some(neurons);
        Ok(self)
    }

    /// Append a hidden layer after the ones already added.
    pub fn hidden_layer(mut self, neurons: usize) -> Result<Self> {
        check_size("hidden", neurons)?;
        self.hidden.push(neurons);
        Ok(self)
    }

    /// Define the output layer. Calling this again replaces the previous definition.
    pub fn output_layer(mut self, neurons: usize) -> Result<Self> {
        check_size("output", neurons)?;
        self.output = Some(neurons);
        Ok(self)
    }

    /// Size the network and hand it over for configuration.
    pub fn build(self) -> Result<Network> {
        let input = self
            .input
            .ok_or_else(|| Error::InvalidConfig("input layer is not defined".to_owned()))?;
        let output = self
            .output
            .ok_or_else(|| Error::InvalidConfig("output layer is not defined".to_owned()))?;
        if self.hidden.is_empty() {
            return Err(Error::InvalidConfig(
                "network must have at least one hidden layer".to_owned(),
            ));
        }

        let mut layers = Vec::with_capacity(self.hidden.len() + 2);
        let mut input_layer = Layer::new(input);
        input_layer.set_input(true);
        layers.push(input_layer);
        layers.extend(self.hidden.iter().map(|&n| Layer::new(n)));
        layers.push(Layer::new(output));

        debug!(
            "sizing network: {input} inputs, hidden layers {:?}, {output} outputs",
            self.hidden
        );
        Ok(Network::from_layers(layers))
    }
}

fn check_size(kind: &str, neurons: usize) -> Result<()> {
    if neurons == 0 {
        return Err(Error::InvalidConfig(format!(
            "{kind} layer must have at least one neuron"
        )));
    }
    Ok(())
}
