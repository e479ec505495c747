//! Pairing a caller's named variables with a network's inputs and outputs.
//!
//! A network can only run when every one of its inputs is supplied, but a caller may want any
//! subset of what it produces. Matching is therefore strict on inputs and permissive on outputs.

use std::collections::HashMap;

use crate::Network;

/// `(candidate_index, network_index)`.
pub type IndexPair = (usize, usize);

/// Index correspondence between a caller's variables and a network's variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableMatch {
    /// One pair per network input, in network input order.
    pub inputs: Vec<IndexPair>,
    /// One pair per network output found among the candidates, in network output order.
    pub outputs: Vec<IndexPair>,
}

impl Network {
    /// Match candidate input/output names against this network's variable names.
    ///
    /// Returns `None` unless every network input appears among `candidate_inputs` and at
    /// least one network output appears among `candidate_outputs`. Names are compared exactly;
    /// if a candidate name occurs more than once, its last occurrence is used.
    pub fn match_variables<S: AsRef<str>>(
        &self,
        candidate_inputs: &[S],
        candidate_outputs: &[S],
    ) -> Option<VariableMatch> {
        if self.n_inputs() > candidate_inputs.len() {
            return None;
        }

        let lookup_inputs = index_by_name(candidate_inputs);
        let inputs = self
            .input_names()
            .iter()
            .enumerate()
            .map(|(i, name)| lookup_inputs.get(name.as_str()).map(|&c| (c, i)))
            .collect::<Option<Vec<_>>>()?;

        let lookup_outputs = index_by_name(candidate_outputs);
        let outputs: Vec<IndexPair> = self
            .output_names()
            .iter()
            .enumerate()
            .filter_map(|(i, name)| lookup_outputs.get(name.as_str()).map(|&c| (c, i)))
            .collect();
        if outputs.is_empty() {
            return None;
        }

        Some(VariableMatch { inputs, outputs })
    }
}

fn index_by_name<S: AsRef<str>>(names: &[S]) -> HashMap<&str, usize> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_ref(), i))
        .collect()
}
