//! Errors raised while building, inverting or flattening circuits.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Circuit construction and transformation failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An operand refers to a qubit the circuit does not have.
    #[error("no qubit {qubit} in circuit{}", on_gate(.gate_name))]
    QubitNotFound {
        qubit: QubitId,
        /// Gate being applied, when known.
        gate_name: Option<String>,
    },

    /// A measurement targets a missing classical bit.
    #[error("no classical bit {clbit} in circuit{}", on_gate(.gate_name))]
    ClbitNotFound {
        clbit: ClbitId,
        gate_name: Option<String>,
    },

    /// The same qubit appears twice in one operation.
    #[error("qubit {qubit} used twice{}", on_gate(.gate_name))]
    DuplicateQubit {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    /// Arity of a gate does not match its operand list.
    #[error("'{gate_name}' acts on {expected} qubit(s) but was given {got}")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    /// The wire graph is inconsistent.
    #[error("corrupt circuit graph: {0}")]
    InvalidDag(String),

    /// An angle still contains a free symbol.
    #[error("angle '{0}' has no numeric value")]
    UnboundParameter(String),

    /// Measure and reset cannot be inverted.
    #[error("'{0}' is not unitary and has no inverse")]
    NonUnitaryOperation(String),

    /// A sub-circuit cannot be wrapped as a composite gate.
    #[error("cannot use '{name}' as a composite gate: {reason}")]
    InvalidComposite { name: String, reason: String },
}

#[allow(clippy::ref_option)]
fn on_gate(gate_name: &Option<String>) -> String {
    gate_name
        .as_deref()
        .map(|name| format!(" (applying {name})"))
        .unwrap_or_default()
}

/// Shorthand for results carrying an [`IrError`].
pub type IrResult<T> = Result<T, IrError>;
