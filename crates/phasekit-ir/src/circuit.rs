//! Circuits as a named list of wires plus a DAG of operations.

use std::collections::BTreeMap;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{CompositeGate, Gate, StandardGate};
use crate::instruction::Instruction;
use crate::inverse::{dagger_name, inverse_instruction};
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A named circuit over a fixed set of qubits and classical bits.
///
/// Gate methods validate operands against the wire DAG and return
/// `&mut Self`, so a whole layer can be written as one `?` chain:
///
/// ```rust
/// # use phasekit_ir::{Circuit, QubitId};
/// let mut c = Circuit::with_size("pair", 2, 0);
/// c.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
/// # Ok::<(), phasekit_ir::IrError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    dag: CircuitDag,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            dag: CircuitDag::new(),
        }
    }

    /// `num_qubits` anonymous qubits and `num_clbits` anonymous bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Same wires as `self`, no instructions.
    fn empty_like(&self, name: impl Into<String>) -> Self {
        let mut dag = CircuitDag::new();
        self.qubits.iter().for_each(|q| dag.add_qubit(q.id));
        self.clbits.iter().for_each(|c| dag.add_clbit(c.id));
        Self {
            name: name.into(),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            dag,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_qubit(&self) -> QubitId {
        QubitId(self.qubits.len() as u32)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_clbit(&self) -> ClbitId {
        ClbitId(self.clbits.len() as u32)
    }

    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit();
        self.qubits.push(Qubit::new(id));
        self.dag.add_qubit(id);
        id
    }

    /// Allocate `size` qubits displayed as `name[0]`, `name[1]`, ...
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = self.next_qubit();
                self.qubits.push(Qubit::in_register(id, &name, i));
                self.dag.add_qubit(id);
                id
            })
            .collect()
    }

    pub fn add_clbit(&mut self) -> ClbitId {
        let id = self.next_clbit();
        self.clbits.push(Clbit::new(id));
        self.dag.add_clbit(id);
        id
    }

    /// Allocate `size` classical bits displayed as `name[0]`, `name[1]`, ...
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = self.next_clbit();
                self.clbits.push(Clbit::in_register(id, &name, i));
                self.dag.add_clbit(id);
                id
            })
            .collect()
    }

    fn push(&mut self, inst: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(inst)?;
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::H, [qubit]))
    }

    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::X, [qubit]))
    }

    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Z, [qubit]))
    }

    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::S, [qubit]))
    }

    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Sdg, [qubit]))
    }

    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::T, [qubit]))
    }

    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Tdg, [qubit]))
    }

    /// `Rz(θ) = diag(e^{-iθ/2}, e^{iθ/2})`.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Rz(theta.into()), [qubit]))
    }

    /// `P(λ) = diag(1, e^{iλ})`.
    pub fn p(
        &mut self,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::P(lambda.into()), [qubit]))
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CX, [control, target]))
    }

    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CZ, [control, target]))
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Swap, [a, b]))
    }

    /// Rz on `target`, conditioned on `control`.
    pub fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            StandardGate::CRz(theta.into()),
            [control, target],
        ))
    }

    /// Phase `e^{iλ}` on |11⟩; symmetric in its two qubits.
    pub fn cp(
        &mut self,
        lambda: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            StandardGate::CP(lambda.into()),
            [control, target],
        ))
    }

    /// Any [`Gate`], standard or composite.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure qubit `i` into classical bit `i`, adding bits if needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits: Vec<_> = self.clbits.iter().map(|c| c.id).take(qubits.len()).collect();
        self.push(Instruction::measure_many(qubits, clbits)?)
    }

    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.push(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Splice `sub` onto `qubits` as a single composite gate named after it.
    ///
    /// Local qubit `i` of `sub` is wired to the `i`-th entry of `qubits`.
    /// The sub-circuit must be purely unitary: no classical bits, no
    /// measurement and no reset.
    #[allow(clippy::cast_possible_truncation)]
    pub fn append(
        &mut self,
        sub: &Circuit,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        if qubits.len() != sub.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: sub.name.clone(),
                expected: sub.num_qubits() as u32,
                got: qubits.len() as u32,
            });
        }
        if sub.num_clbits() > 0 {
            return Err(IrError::InvalidComposite {
                name: sub.name.clone(),
                reason: "sub-circuit declares classical bits".into(),
            });
        }
        if let Some(inst) = sub
            .instructions()
            .find(|inst| inst.is_measure() || inst.is_reset())
        {
            return Err(IrError::InvalidComposite {
                name: sub.name.clone(),
                reason: format!("sub-circuit contains {}", inst.name()),
            });
        }

        let definition = sub.instructions().cloned().collect();
        let composite = CompositeGate::new(&sub.name, sub.num_qubits() as u32, definition);
        self.dag.apply(Instruction::gate(composite, qubits))?;
        Ok(self)
    }

    /// The inverse circuit: instructions reversed and each one inverted.
    ///
    /// The result is named `<name>_dg`. Fails if the circuit measures or
    /// resets any qubit.
    pub fn inverse(&self) -> IrResult<Self> {
        let mut inverse = self.empty_like(dagger_name(&self.name));
        let ops: Vec<&Instruction> = self.instructions().collect();
        for inst in ops.into_iter().rev() {
            inverse.dag.apply(inverse_instruction(inst)?)?;
        }
        Ok(inverse)
    }

    /// Expand every composite gate into its definition, recursively, so the
    /// result contains only standard gates, measurements, resets and barriers.
    pub fn decompose(&self) -> IrResult<Self> {
        let mut flat = self.empty_like(self.name.clone());
        let mut expanded = Vec::with_capacity(self.num_ops());
        for inst in self.instructions() {
            flatten_into(inst, &mut expanded)?;
        }
        for inst in expanded {
            flat.dag.apply(inst)?;
        }
        Ok(flat)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Instruction count, with each composite counted once.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Longest chain of operations along any wire.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Instructions in the order they were appended.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.ops_in_order().map(|(_, inst)| inst)
    }

    /// Number of instructions per name, e.g. `{"cp": 10, "h": 5, "swap": 2}`.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions() {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn has_measurements(&self) -> bool {
        self.instructions().any(Instruction::is_measure)
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }
}

fn flatten_into(inst: &Instruction, out: &mut Vec<Instruction>) -> IrResult<()> {
    match inst.as_composite() {
        Some(composite) => {
            for local in &composite.definition {
                flatten_into(&local.remap_qubits(&inst.qubits)?, out)?;
            }
        }
        None => out.push(inst.clone()),
    }
    Ok(())
}
