use thiserror::Error;

use crate::activation::DerivativeOrder;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown activation function `{0}`")]
    UnknownActivation(String),

    #[error("{0} derivatives were not computed by the last evaluation")]
    DerivativeNotComputed(DerivativeOrder),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
