//! Defines the `Error` type for the sumout library

use std::io;
use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, SumoutError>;

#[derive(Debug, Error)]
pub enum SumoutError {

    /// The source handed to a `Factor` constructor could not be interpreted as a table. The
    /// value describes what was wrong with it.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Marginalization was requested over a variable outside of the `Factor`'s scope
    #[error("variable '{variable}' is not in scope {scope:?}")]
    VariableNotInScope {
        variable: String,
        scope: Vec<String>
    },

    /// A `Factor` held (or an operation would have produced) two rows with the same assignment.
    #[error("malformed factor ({operand}): duplicate or invalid row {key:?}")]
    MalformedFactor {
        /// Which operand the offending row came from
        operand: String,
        /// The assignment values of the offending row, in scope order
        key: Vec<String>
    },

    /// A product would have produced a zero-variable `Factor` from operands that do not each
    /// hold exactly one row
    #[error("product over an empty scope requires single-row operands (got {left} and {right} rows)")]
    EmptyScope {
        left: usize,
        right: usize
    },

    /// Represents an incomplete assignment where a complete assignment was required.
    /// The value is the names of the variables that were missing from the assignment.
    #[error("missing assignments to the required variables {0:?}")]
    IncompleteAssignment(Vec<String>),

    /// Represents an attempt to build a `Factor` with an incompatible `Initialization`
    #[error("invalid initialization: {0}")]
    InvalidInitialization(String),

    /// The tabular source or destination could not be read or written
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The tabular source was readable, but was not a well formed table
    #[error("format error: {0}")]
    Format(String)

}

impl From<csv::Error> for SumoutError {

    fn from(err: csv::Error) -> Self {
        let msg = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => SumoutError::Io(e),
            _ => SumoutError::Format(msg)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = SumoutError::VariableNotInScope {
            variable: String::from("NotAVariable"),
            scope: vec![String::from("Rain")]
        };
        assert_eq!(err.to_string(), "variable 'NotAVariable' is not in scope [\"Rain\"]");

        let err = SumoutError::EmptyScope { left: 0, right: 1 };
        assert!(err.to_string().contains("0 and 1"));
    }

    #[test]
    fn io_conversion() {
        let err: SumoutError = io::Error::new(io::ErrorKind::NotFound, "FactorA.csv").into();
        match err {
            SumoutError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            _ => panic!("wrong error type")
        };
    }
}
