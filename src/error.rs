use std::fmt;

use thiserror::Error;

/// Position of an operand in a three-operand propagation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    X,
    Y,
    W,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::W => write!(f, "w"),
        }
    }
}

/// Failures raised by the propagation and regression engines
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// A zero operand leaves its relative uncertainty undefined
    #[error("operand {operand} is zero at position {position}, relative uncertainty is undefined")]
    InvalidOperand { operand: Operand, position: usize },
    /// The independent variable has no spread, so the slope is undefined
    #[error("x values are degenerate, the least squares system is singular")]
    DegenerateFit,
    #[error("{samples} samples supplied, at least {required} are needed")]
    InsufficientData { samples: usize, required: usize },
    /// An uncertainty is zero where it divides, or negative where a measurement is built
    #[error("uncertainty at position {position} is invalid: {reason}")]
    InvalidUncertainty {
        position: usize,
        reason: &'static str,
    },
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

pub(crate) fn check_shape(expected: &[usize], found: &[usize]) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}
