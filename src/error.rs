//! Error Types
//!
//! Three failure families surface from the core:
//! - [`FormatError`] for malformed input shapes,
//! - [`ValidationError`] for a named assertion that failed,
//! - [`ProofError`] for the proving backend refusing a claim.
//!
//! The first failing assertion aborts the call. Nothing is aggregated or retried.

use thiserror::Error;

/// Malformed input shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Wrong number of rows.
    #[error("board must have {expected} rows, got {got}")]
    RowCount {
        /// Required row count.
        expected: usize,
        /// Rows supplied.
        got: usize,
    },

    /// A row has the wrong number of cells.
    #[error("row {row} must have {expected} cells, got {got}")]
    RowLength {
        /// Offending row index.
        row: usize,
        /// Required cell count.
        expected: usize,
        /// Cells supplied.
        got: usize,
    },

    /// Text form could not be parsed.
    #[error("cannot parse cell {row},{col}: {reason}")]
    Parse {
        /// Row of the unparsable cell.
        row: usize,
        /// Column of the unparsable cell.
        col: usize,
        /// Parser message.
        reason: String,
    },
}

/// A named assertion failed.
///
/// Messages are stable: callers and tests match on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Cell value outside {0,1}.
    #[error("{row},{col} has invalid value")]
    InvalidCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The value found.
        value: u32,
    },

    /// `to` is not the successor of `from` at this cell.
    #[error("transition is not correct for {row},{col}")]
    IncorrectTransition {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// Base state does not start from its own initial board.
    #[error("invalid initial state")]
    InvalidInitialState,

    /// Base state has a non-zero step counter.
    #[error("step starts with 0")]
    StepNotZero {
        /// Step found in the base state.
        got: u32,
    },

    /// Step counter skipped or repeated.
    #[error("step must advance by one: expected {expected}, got {got}")]
    StepMismatch {
        /// `prior.step + 1`.
        expected: u32,
        /// Step found in the new state.
        got: u32,
    },

    /// Chain anchor changed between steps.
    #[error("initial states not same")]
    InitialStatesDiffer,

    /// Repeater chain does not end on its starting board.
    #[error("first and last board must be the same")]
    BoardsDiffer,

    /// Repeater chain is too short to be anything but a still life.
    #[error("steps >= 2")]
    InsufficientSteps {
        /// Step count of the submitted chain.
        steps: u32,
    },
}

/// The proving backend refused to construct or verify a proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Seal does not attest this claim under the backend key.
    #[error("proof seal does not match claim")]
    SealMismatch,

    /// Base/Step tag disagrees with the bound step counter.
    #[error("proof tag does not match step {step}")]
    TagMismatch {
        /// Step bound in the proof.
        step: u32,
    },

    /// Folded accumulator cannot be reproduced from the proof contents.
    #[error("accumulator does not fold from prior")]
    AccumulatorMismatch,

    /// Proof bytes could not be decoded.
    #[error("proof encoding error: {0}")]
    Encoding(String),

    /// Construction was cancelled by the caller.
    #[error("proof construction cancelled")]
    Cancelled,

    /// Backend-internal failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Any failure of a core operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    /// Malformed input.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Assertion failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend refusal.
    #[error(transparent)]
    Proof(#[from] ProofError),
}

impl LifeError {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, LifeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_strings() {
        let cell = ValidationError::InvalidCell { row: 4, col: 3, value: 2 };
        assert_eq!(cell.to_string(), "4,3 has invalid value");

        let transition = ValidationError::IncorrectTransition { row: 4, col: 3 };
        assert_eq!(transition.to_string(), "transition is not correct for 4,3");

        assert_eq!(ValidationError::InsufficientSteps { steps: 1 }.to_string(), "steps >= 2");
    }

    #[test]
    fn test_transparent_wrapping() {
        let err: LifeError = ValidationError::InitialStatesDiffer.into();
        assert_eq!(err.to_string(), "initial states not same");
        assert_eq!(err.as_validation(), Some(&ValidationError::InitialStatesDiffer));

        let err: LifeError = ProofError::Cancelled.into();
        assert!(err.as_validation().is_none());
    }
}
