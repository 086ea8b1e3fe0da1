//! Error types for the solver and its output sinks.

use crate::grid::FieldKind;

/// Errors a run can end with.
#[derive(Debug)]
pub enum SimError {
    /// A snapshot sink failed; fatal wherever it happens, and opening the
    /// output files fails the run before the first iteration.
    Io(std::io::Error),
    /// A reaction step produced NaN and the run is configured strict.
    NumericalAnomaly {
        /// Iteration at which the anomaly appeared.
        iteration: u64,
        /// Field whose update produced the anomaly.
        field: FieldKind,
        /// Cell coordinate of the anomaly.
        coordinate: (usize, usize, usize),
    },
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "output error: {err}"),
            Self::NumericalAnomaly {
                iteration,
                field,
                coordinate: (x, y, z),
            } => write!(
                f,
                "NaN in field {field} at iteration {iteration}, cell ({x}, {y}, {z})"
            ),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::NumericalAnomaly { .. } => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
