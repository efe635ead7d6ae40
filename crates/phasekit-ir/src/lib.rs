//! Circuit representation for phasekit.
//!
//! Circuits are built through [`Circuit`], which keeps a wire DAG
//! ([`CircuitDag`]) underneath and hands back `IrResult<&mut Circuit>` from
//! every gate method so calls chain with `?`. Angles are
//! [`ParameterExpression`]s, which lets inverted rotations stay exact
//! (`-π/2` rather than `-1.5707963267948966`) for drawing.
//!
//! Sub-circuits become [`CompositeGate`]s through [`Circuit::append`]. They
//! stay a single instruction until [`Circuit::decompose`] splices their
//! definitions back in, and [`Circuit::inverse`] reverses and adjoints a
//! whole circuit, composites included.
//!
//! # Example: Inverting a Sub-circuit
//!
//! ```rust
//! use phasekit_ir::{Circuit, QubitId};
//! use std::f64::consts::PI;
//!
//! let mut rotation = Circuit::with_size("rot", 2, 0);
//! rotation.h(QubitId(1)).unwrap();
//! rotation.cp(PI / 2.0, QubitId(0), QubitId(1)).unwrap();
//!
//! let mut host = Circuit::with_size("host", 3, 0);
//! host.append(&rotation.inverse().unwrap(), [QubitId(0), QubitId(1)])
//!     .unwrap();
//!
//! // The composite is a single instruction until it is flattened.
//! assert_eq!(host.num_ops(), 1);
//! assert_eq!(host.decompose().unwrap().num_ops(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase fractions of Z |
//! | `Rz`, `P` | 1 | Z rotation and phase gates |
//! | `CX`, `CZ` | 2 | Controlled-NOT and controlled-Z |
//! | `CP`, `CRz` | 2 | Controlled-phase and controlled-Rz |
//! | `Swap` | 2 | SWAP gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod inverse;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{CompositeGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use inverse::{inverse_gate, inverse_instruction, is_self_inverse};
pub use parameter::ParameterExpression;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId, RegisterSlot};
