//! Operations placed on wires.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{CompositeGate, Gate, GateKind, StandardGate};
use crate::qubit::{ClbitId, QubitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    Gate(Gate),
    /// Read `qubits[i]` into `clbits[i]`.
    Measure,
    /// Force the qubit back to |0⟩.
    Reset,
    /// Layout fence; leaves the state alone.
    Barrier,
}

/// One operation with its operands.
///
/// For gates, `qubits` follows the gate's own operand order (control first
/// for controlled gates). `clbits` is empty for everything except
/// measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    fn on(kind: InstructionKind, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Gate(gate.into()), qubits)
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Pairwise measurement of `qubits` into `clbits`; both lists must have
    /// the same length.
    pub fn measure_many(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::InvalidDag(format!(
                "{} qubits measured into {} classical bits",
                qubits.len(),
                clbits.len(),
            )));
        }
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    pub fn reset(qubit: QubitId) -> Self {
        Self::on(InstructionKind::Reset, [qubit])
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Barrier, qubits)
    }

    pub fn is_measure(&self) -> bool {
        self.kind == InstructionKind::Measure
    }

    pub fn is_reset(&self) -> bool {
        self.kind == InstructionKind::Reset
    }

    pub fn is_barrier(&self) -> bool {
        self.kind == InstructionKind::Barrier
    }

    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.as_standard(),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeGate> {
        match &self.kind {
            InstructionKind::Gate(Gate {
                kind: GateKind::Composite(c),
                ..
            }) => Some(c),
            _ => None,
        }
    }

    /// Gate name, or `measure` / `reset` / `barrier`.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Copy with local qubit `i` replaced by `layout[i]`.
    pub fn remap_qubits(&self, layout: &[QubitId]) -> IrResult<Self> {
        let qubits = self
            .qubits
            .iter()
            .map(|&q| {
                layout.get(q.index()).copied().ok_or_else(|| IrError::QubitNotFound {
                    qubit: q,
                    gate_name: Some(self.name().to_string()),
                })
            })
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Self {
            qubits,
            ..self.clone()
        })
    }
}
