//! Dense MLP surrogate evaluation with analytic input derivatives.
//!
//! `mlp-surrogate` evaluates an already-trained dense feed-forward network and, on request,
//! the exact first and second derivatives of every output with respect to every raw input.
//! It is meant for surrogate models inside numerical solvers, where a network stands in for an
//! expensive lookup and the solver needs gradients and Hessians of the fitted relation.
//!
//! # Design goals
//!
//! - Exact derivatives: the Jacobian and Hessian are propagated alongside the values, layer by
//!   layer, with the chain rule. No finite differences.
//! - Predictable performance: all buffers are sized once by [`NetworkBuilder::build`];
//!   [`Network::evaluate`] does not allocate.
//! - Clear contracts: indices and shapes are validated at the API boundary and reported as
//!   [`Error`] values.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - Weight stage `s` connects layer `s` to layer `s + 1` and is row-major with shape
//!   `(to_neurons, from_neurons)`.
//! - The Jacobian is row-major `(n_outputs, n_inputs)` and the Hessian is row-major
//!   `(n_outputs, n_inputs, n_inputs)`.
//! - Inputs and outputs are dimensional; each side is normalized by its own
//!   [`Regularization`] policy and per-variable [`NormPair`].
//!
//! # MSRV
//!
//! This crate's minimum supported Rust version (MSRV) is specified in `Cargo.toml`.

//! # Quick start
//!
//! ```rust
//! use mlp_surrogate::{Activation, NetworkBuilder};
//!
//! # fn main() -> mlp_surrogate::Result<()> {
//! let mut net = NetworkBuilder::from_sizes(&[2, 2, 1])?.build()?;
//! net.set_input_name(0, "u")?;
//! net.set_input_name(1, "v")?;
//! net.set_output_name(0, "y")?;
//!
//! // y = u + v through a linear hidden layer.
//! net.set_weight(0, 0, 0, 1.0)?;
//! net.set_weight(0, 1, 1, 1.0)?;
//! net.set_weight(1, 0, 0, 1.0)?;
//! net.set_weight(1, 1, 0, 1.0)?;
//! net.set_activation_function(1, Activation::Linear)?;
//! net.set_activation_function(2, Activation::Linear)?;
//!
//! let m = net.match_variables(&["v", "u"], &["y"]).expect("u and v are available");
//! assert_eq!(m.inputs, vec![(1, 0), (0, 1)]);
//!
//! net.set_first_order_gradient(true);
//! let y = net.evaluate(&[0.25, 0.5])?[0];
//! assert_eq!(y, 0.75);
//! assert_eq!(net.d_output_d_input(0, 1)?, 1.0);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod builder;
pub mod error;
pub mod layer;
pub mod matching;
pub mod network;
pub mod normalization;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use activation::{Activation, DerivativeOrder, Response};
pub use builder::NetworkBuilder;
pub use error::{Error, Result};
pub use layer::{Layer, Weights};
pub use matching::{IndexPair, VariableMatch};
pub use network::Network;
pub use normalization::{MinMax, NormPair, Normalizer, Regularization, Robust, Standard};
