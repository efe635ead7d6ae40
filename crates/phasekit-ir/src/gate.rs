//! Gate definitions.

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;

/// Built-in gates the simulator knows how to apply.
///
/// Two-qubit gates take `[control, target]`, except `Swap`, which is
/// symmetric. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    I,
    X,
    Z,
    H,
    /// `diag(1, i)`
    S,
    Sdg,
    /// `diag(1, e^{iπ/4})`
    T,
    Tdg,
    /// `diag(e^{-iθ/2}, e^{iθ/2})`
    Rz(ParameterExpression),
    /// `diag(1, e^{iλ})`
    P(ParameterExpression),
    CX,
    CZ,
    Swap,
    CRz(ParameterExpression),
    /// Phase on |11⟩ only.
    CP(ParameterExpression),
}

impl StandardGate {
    /// Lower-case name as used in counts and gate sets.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CZ
            | StandardGate::Swap
            | StandardGate::CRz(_)
            | StandardGate::CP(_) => 2,
            _ => 1,
        }
    }

    /// Angle of `Rz`, `P`, `CRz` and `CP`.
    pub fn angle(&self) -> Option<&ParameterExpression> {
        match self {
            StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p) => Some(p),
            _ => None,
        }
    }
}

/// A named sub-circuit used as a single gate, e.g. `qft_dg`.
///
/// `definition` addresses local qubits `0..num_qubits`. The host
/// instruction's operand list says where local qubit `i` really lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeGate {
    pub name: String,
    pub num_qubits: u32,
    pub definition: Vec<Instruction>,
}

impl CompositeGate {
    pub fn new(name: impl Into<String>, num_qubits: u32, definition: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            definition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    Standard(StandardGate),
    Composite(CompositeGate),
}

impl GateKind {
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Composite(g) => &g.name,
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Composite(g) => g.num_qubits,
        }
    }
}

/// A gate plus an optional display label.
///
/// The label only affects drawings; it survives inversion unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: GateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Composite(_) => None,
        }
    }
}

impl From<GateKind> for Gate {
    fn from(kind: GateKind) -> Self {
        Self { kind, label: None }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate).into()
    }
}

impl From<CompositeGate> for Gate {
    fn from(gate: CompositeGate) -> Self {
        GateKind::Composite(gate).into()
    }
}
