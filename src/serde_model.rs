//! Network definitions as JSON (feature: `serde`).
//!
//! This module defines a versioned, stable on-disk format for a configured `Network`.
//!
//! Design notes:
//! - We do NOT directly serialize `Network`/`Layer`; evaluation buffers are not part of a
//!   definition and the format stays stable if the internal layout changes.
//! - Loading goes through `NetworkBuilder` and the `Network` setters, exactly like any other
//!   loader would.
//! - All deserialization validates layer sizes, array lengths, activation names, and that all
//!   parameters are finite.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Activation, Error, Network, NetworkBuilder, Regularization, Result};

pub const DEFINITION_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub format_version: u32,
    pub input_regularization: Regularization,
    pub output_regularization: Regularization,
    pub inputs: Vec<VariableDefinition>,
    pub outputs: Vec<VariableDefinition>,
    /// Neuron count of every hidden layer, in order.
    pub hidden_layers: Vec<usize>,
    /// One activation name per layer after the input layer.
    pub activations: Vec<String>,
    /// One bias vector per layer after the input layer.
    pub biases: Vec<Vec<f64>>,
    /// One weight matrix per stage, row-major `(to_neurons, from_neurons)`.
    pub weights: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub norm: (f64, f64),
}

impl NetworkDefinition {
    /// Neuron counts of all layers, input and output included.
    fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.inputs.len());
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(self.outputs.len());
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if self.format_version != DEFINITION_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported definition format_version {}; expected {}",
                self.format_version, DEFINITION_FORMAT_VERSION
            )));
        }
        if self.hidden_layers.is_empty() {
            return Err(Error::InvalidData(
                "definition must have at least one hidden layer".to_owned(),
            ));
        }

        let sizes = self.layer_sizes();
        if sizes.contains(&0) {
            return Err(Error::InvalidData(format!(
                "all layer sizes must be > 0, got {sizes:?}"
            )));
        }

        let stages = sizes.len() - 1;
        for (what, len) in [
            ("activations", self.activations.len()),
            ("biases", self.biases.len()),
            ("weights", self.weights.len()),
        ] {
            if len != stages {
                return Err(Error::InvalidData(format!(
                    "{what} has {len} entries, expected one per layer after the input ({stages})"
                )));
            }
        }

        for (stage, pair) in sizes.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let expected = from.checked_mul(to).ok_or_else(|| {
                Error::InvalidData(format!("weights[{stage}] size overflows ({to} * {from})"))
            })?;
            if self.weights[stage].len() != expected {
                return Err(Error::InvalidData(format!(
                    "weights[{stage}] length {} does not match to * from ({to} * {from})",
                    self.weights[stage].len()
                )));
            }
            if self.biases[stage].len() != to {
                return Err(Error::InvalidData(format!(
                    "biases[{stage}] length {} does not match layer size {to}",
                    self.biases[stage].len()
                )));
            }
        }

        for name in &self.activations {
            name.parse::<Activation>()
                .map_err(|e| Error::InvalidData(format!("invalid activation: {e}")))?;
        }

        let params = self
            .weights
            .iter()
            .chain(&self.biases)
            .flatten()
            .copied()
            .chain(
                self.inputs
                    .iter()
                    .chain(&self.outputs)
                    .flat_map(|v| [v.norm.0, v.norm.1]),
            );
        for v in params {
            if !v.is_finite() {
                return Err(Error::InvalidData(
                    "weights, biases and norms must contain only finite values".to_owned(),
                ));
            }
        }

        for (side, vars, method) in [
            ("input", &self.inputs, self.input_regularization),
            ("output", &self.outputs, self.output_regularization),
        ] {
            for var in vars {
                if method.normalizer().scale(var.norm) == 0.0 {
                    return Err(Error::InvalidData(format!(
                        "{side} `{}` has a zero-width {method} norm {:?}",
                        var.name, var.norm
                    )));
                }
            }
        }

        Ok(())
    }
}

impl From<&Network> for NetworkDefinition {
    fn from(network: &Network) -> Self {
        let variables = |names: &[String], norms: &[(f64, f64)]| {
            names
                .iter()
                .zip(norms)
                .map(|(name, &norm)| VariableDefinition {
                    name: name.clone(),
                    norm,
                })
                .collect::<Vec<_>>()
        };

        let activations = network.activations()[1..]
            .iter()
            .map(|act| act.name().to_owned())
            .collect();
        let biases = network.layers()[1..]
            .iter()
            .map(|layer| layer.biases().to_vec())
            .collect();
        let weights = network
            .weight_stages()
            .iter()
            .map(|w| w.as_slice().to_vec())
            .collect();

        Self {
            format_version: DEFINITION_FORMAT_VERSION,
            input_regularization: network.input_regularization(),
            output_regularization: network.output_regularization(),
            inputs: variables(network.input_names(), network.input_norms()),
            outputs: variables(network.output_names(), network.output_norms()),
            hidden_layers: network.hidden_layers().iter().map(|l| l.neurons()).collect(),
            activations,
            biases,
            weights,
        }
    }
}

impl TryFrom<NetworkDefinition> for Network {
    type Error = Error;

    fn try_from(value: NetworkDefinition) -> std::result::Result<Self, Self::Error> {
        value.validate()?;

        let invalid = |e: Error| Error::InvalidData(format!("definition rejected: {e}"));

        let mut network = NetworkBuilder::from_sizes(&value.layer_sizes())
            .and_then(NetworkBuilder::build)
            .map_err(invalid)?;

        network.set_input_regularization(value.input_regularization);
        network.set_output_regularization(value.output_regularization);
        for (i, var) in value.inputs.into_iter().enumerate() {
            network.set_input_name(i, var.name).map_err(invalid)?;
            network.set_input_norm(i, var.norm).map_err(invalid)?;
        }
        for (i, var) in value.outputs.into_iter().enumerate() {
            network.set_output_name(i, var.name).map_err(invalid)?;
            network.set_output_norm(i, var.norm).map_err(invalid)?;
        }

        for (stage, name) in value.activations.iter().enumerate() {
            network.set_activation(stage + 1, name).map_err(invalid)?;
        }
        for (stage, biases) in value.biases.iter().enumerate() {
            for (neuron, &b) in biases.iter().enumerate() {
                network.set_bias(stage + 1, neuron, b).map_err(invalid)?;
            }
        }
        for (stage, weights) in value.weights.iter().enumerate() {
            let from_neurons = network.n_neurons(stage).map_err(invalid)?;
            for (idx, &w) in weights.iter().enumerate() {
                let (to, from) = (idx / from_neurons, idx % from_neurons);
                network.set_weight(stage, from, to, w).map_err(invalid)?;
            }
        }

        Ok(network)
    }
}

impl Network {
    /// Serialize the network definition to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let def = NetworkDefinition::from(self);
        serde_json::to_string_pretty(&def)
            .map_err(|e| Error::InvalidData(format!("failed to serialize network: {e}")))
    }

    /// Serialize the network definition to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        let def = NetworkDefinition::from(self);
        serde_json::to_string(&def)
            .map_err(|e| Error::InvalidData(format!("failed to serialize network: {e}")))
    }

    /// Parse and configure a network from a JSON definition.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let def: NetworkDefinition = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse network json: {e}")))?;
        def.try_into()
    }

    /// Save the network definition to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s)
            .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))?;
        Ok(())
    }

    /// Load a network from a JSON definition file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::InvalidData(format!("failed to read {}: {e}", p.display())))?;
        Self::from_json_str(&s)
    }
}
