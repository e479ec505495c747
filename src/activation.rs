//! Activation functions.
//!
//! A layer computes a pre-activation value `x = W y_prev + b` per neuron and then applies a
//! scalar activation `Φ(x)`. Evaluation is a pure function of `x` that returns `Φ` together with
//! `Φ'` and `Φ''` when they are requested; nothing is cached between calls.
//!
//! The set of activations is closed. Layers resolve their activation once, at configuration
//! time (see [`Activation::from_str`]), so the hot path is a single `match`.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Scale parameters of the scaled exponential linear unit.
pub const SELU_ALPHA: f64 = 1.673_263_24;
pub const SELU_LAMBDA: f64 = 1.050_700_98;

/// Slope of the logistic approximation `Φ(x) ≈ x σ(1.702 x)` used for GELU derivatives.
pub const GELU_SIGMOID_SLOPE: f64 = 1.702;

/// How many derivatives of the network outputs an evaluation computes.
///
/// Ordered: `None < First < Second`. Second order always implies first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DerivativeOrder {
    #[default]
    None,
    First,
    Second,
}

impl DerivativeOrder {
    #[inline]
    pub fn includes_first(self) -> bool {
        self >= DerivativeOrder::First
    }

    #[inline]
    pub fn includes_second(self) -> bool {
        self == DerivativeOrder::Second
    }
}

impl fmt::Display for DerivativeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DerivativeOrder::None => "zeroth-order",
            DerivativeOrder::First => "first-order",
            DerivativeOrder::Second => "second-order",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Element-wise activation function.
pub enum Activation {
    /// Outputs zero regardless of input. Also the tag of the input layer.
    #[default]
    None,
    Linear,
    ReLU,
    Elu,
    Gelu,
    Selu,
    Sigmoid,
    Swish,
    Tanh,
    Exponential,
}

/// Activation value and its derivatives with respect to the pre-activation input.
///
/// Derivatives that were not requested are left at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Response {
    pub value: f64,
    pub first: f64,
    pub second: f64,
}

impl Response {
    #[inline]
    fn gated(order: DerivativeOrder, value: f64, first: f64, second: f64) -> Self {
        Self {
            value,
            first: if order.includes_first() { first } else { 0.0 },
            second: if order.includes_second() { second } else { 0.0 },
        }
    }
}

impl Activation {
    /// Every variant, in lookup-table order.
    pub const ALL: [Activation; 10] = [
        Activation::None,
        Activation::Linear,
        Activation::ReLU,
        Activation::Elu,
        Activation::Gelu,
        Activation::Selu,
        Activation::Sigmoid,
        Activation::Swish,
        Activation::Tanh,
        Activation::Exponential,
    ];

    /// Name used in network definitions.
    pub fn name(self) -> &'static str {
        match self {
            Activation::None => "none",
            Activation::Linear => "linear",
            Activation::ReLU => "relu",
            Activation::Elu => "elu",
            Activation::Gelu => "gelu",
            Activation::Selu => "selu",
            Activation::Sigmoid => "sigmoid",
            Activation::Swish => "swish",
            Activation::Tanh => "tanh",
            Activation::Exponential => "exponential",
        }
    }

    /// Activation value only.
    #[inline]
    pub fn value(self, x: f64) -> f64 {
        self.evaluate(x, DerivativeOrder::None).value
    }

    /// Evaluate `Φ(x)` and, depending on `order`, `Φ'(x)` and `Φ''(x)`.
    #[inline]
    pub fn evaluate(self, x: f64, order: DerivativeOrder) -> Response {
        match self {
            Activation::None => Response::default(),
            Activation::Linear => linear(x, order),
            Activation::ReLU => relu(x, order),
            Activation::Elu => elu(x, order),
            Activation::Gelu => gelu(x, order),
            Activation::Selu => selu(x, order),
            Activation::Sigmoid => sigmoid(x, order),
            Activation::Swish => swish(x, order),
            Activation::Tanh => tanh(x, order),
            Activation::Exponential => exponential(x, order),
        }
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Activation::ALL
            .into_iter()
            .find(|act| act.name() == s)
            .ok_or_else(|| Error::UnknownActivation(s.to_owned()))
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn linear(x: f64, order: DerivativeOrder) -> Response {
    Response::gated(order, x, 1.0, 0.0)
}

#[inline]
fn relu(x: f64, order: DerivativeOrder) -> Response {
    // x == 0 takes the inactive branch.
    if x > 0.0 {
        Response::gated(order, x, 1.0, 0.0)
    } else {
        Response::gated(order, 0.0, 0.0, 0.0)
    }
}

#[inline]
fn elu(x: f64, order: DerivativeOrder) -> Response {
    if x > 0.0 {
        Response::gated(order, x, 1.0, 0.0)
    } else {
        let e = x.exp();
        Response::gated(order, e - 1.0, e, e)
    }
}

#[inline]
fn selu(x: f64, order: DerivativeOrder) -> Response {
    if x > 0.0 {
        Response::gated(order, SELU_LAMBDA * x, SELU_LAMBDA, 0.0)
    } else {
        let value = SELU_LAMBDA * SELU_ALPHA * (x.exp() - 1.0);
        let first = value + SELU_LAMBDA * SELU_ALPHA;
        Response::gated(order, value, first, first)
    }
}

#[inline]
fn exponential(x: f64, order: DerivativeOrder) -> Response {
    let e = x.exp();
    Response::gated(order, e, e, e)
}

#[inline]
fn tanh(x: f64, order: DerivativeOrder) -> Response {
    let t = x.tanh();
    if !order.includes_first() {
        return Response::gated(order, t, 0.0, 0.0);
    }
    let sech2 = 1.0 / x.cosh().powi(2);
    Response::gated(order, t, sech2, -2.0 * t * sech2)
}

/// `1 / (1 + e^-x)` through [`Logistic`].
#[inline]
fn sigmoid(x: f64, order: DerivativeOrder) -> Response {
    let l = Logistic::new(x);
    Response::gated(order, l.s, l.ds, l.ds * l.tilt)
}

#[inline]
fn swish(x: f64, order: DerivativeOrder) -> Response {
    let l = Logistic::new(x);
    let first = l.s + x * l.ds;
    let second = l.ds * (2.0 + x * l.tilt);
    Response::gated(order, x * l.s, first, second)
}

#[inline]
fn gelu(x: f64, order: DerivativeOrder) -> Response {
    let value = 0.5 * x * (1.0 + libm::erf(x / std::f64::consts::SQRT_2));
    if !order.includes_first() {
        return Response::gated(order, value, 0.0, 0.0);
    }

    // Derivatives of the logistic approximation x σ(c x).
    let c = GELU_SIGMOID_SLOPE;
    let l = Logistic::new(c * x);
    let first = l.s + c * x * l.ds;
    let second = l.ds * (2.0 * c + c * c * x * l.tilt);
    Response::gated(order, value, first, second)
}

/// Logistic function `σ(x) = 1 / (1 + e^-x)` with `σ(1 - σ)` and `1 - 2σ`.
///
/// Sigmoid, swish and GELU derivatives use these in place of the textbook forms such as
/// `e^-x / (e^-x + 1)^2`. The two are algebraically identical; results agree to rounding,
/// not bit for bit.
///
/// Everything is expressed through `z = e^-|x|`, so no intermediate overflows:
/// for `x >= 0` this is exactly `σ' = e^-x / (1 + e^-x)^2`, and for `x < 0` the mirrored
/// form `e^x / (1 + e^x)^2` of the same expression.
struct Logistic {
    s: f64,
    ds: f64,
    tilt: f64,
}

impl Logistic {
    #[inline]
    fn new(x: f64) -> Self {
        let z = (-x.abs()).exp();
        let d = 1.0 + z;
        let (s, tilt) = if x >= 0.0 {
            (1.0 / d, (z - 1.0) / d)
        } else {
            (z / d, (1.0 - z) / d)
        };
        Self {
            s,
            ds: z / (d * d),
            tilt,
        }
    }
}
