//! Wire graph behind [`Circuit`](crate::Circuit).
//!
//! Every qubit and classical bit is a wire running from an `In` node to an
//! `Out` node. Applying an instruction cuts the last edge of each wire it
//! touches and threads the new `Op` node in, so the graph is always a DAG
//! whose edges carry the wire they belong to.
//!
//! Nodes are only ever appended. Walking op nodes by index therefore
//! replays instructions in application order, which is also a topological
//! order.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

pub type NodeIndex = PetNodeIndex<u32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    In(WireId),
    Out(WireId),
    Op(Instruction),
}

impl DagNode {
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            DagNode::In(_) | DagNode::Out(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    Qubit(QubitId),
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// Edge weight: the wire this segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    pub wire: WireId,
}

/// Endpoints of one wire, plus the node currently feeding its `Out` node.
#[derive(Debug, Clone, Copy)]
struct Wire {
    input: NodeIndex,
    output: NodeIndex,
    front: NodeIndex,
}

#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    wires: FxHashMap<WireId, Wire>,
    num_qubits: usize,
    num_clbits: usize,
}

impl CircuitDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qubit wire. Adding the same qubit twice is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.num_qubits += 1;
        }
    }

    /// Add a classical wire. Adding the same bit twice is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(WireId::Clbit(clbit)) {
            self.num_clbits += 1;
        }
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.wires.contains_key(&wire) {
            return false;
        }
        let input = self.graph.add_node(DagNode::In(wire));
        let output = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(input, output, DagEdge { wire });
        self.wires.insert(
            wire,
            Wire {
                input,
                output,
                front: input,
            },
        );
        true
    }

    /// Append `instruction` to the end of its wires.
    ///
    /// Nothing is added unless the gate arity matches, every operand exists
    /// and no qubit repeats.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.check(&instruction)?;

        let touched: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let op = self.graph.add_node(DagNode::Op(instruction));
        for wire in touched {
            let ends = self.wires[&wire];
            let last = self
                .graph
                .find_edge(ends.front, ends.output)
                .ok_or_else(|| IrError::InvalidDag(format!("{wire:?} lost its final edge")))?;
            self.graph.remove_edge(last);
            self.graph.add_edge(ends.front, op, DagEdge { wire });
            self.graph.add_edge(op, ends.output, DagEdge { wire });
            if let Some(w) = self.wires.get_mut(&wire) {
                w.front = op;
            }
        }
        Ok(op)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn check(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits();
                let got = instruction.qubits.len() as u32;
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected,
                        got,
                    });
                }
                Some(gate.name().to_string())
            }
            _ => None,
        };

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.wires.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound { qubit, gate_name });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }
        if let Some(&clbit) = instruction
            .clbits
            .iter()
            .find(|c| !self.wires.contains_key(&WireId::Clbit(**c)))
        {
            return Err(IrError::ClbitNotFound { clbit, gate_name });
        }
        Ok(())
    }

    /// Operations in application order.
    pub fn ops_in_order(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Operations in an order derived from the edges alone.
    pub fn topological_ops(&self) -> IrResult<Vec<(NodeIndex, &Instruction)>> {
        let order = petgraph::algo::toposort(&self.graph, None).map_err(|cycle| {
            IrError::InvalidDag(format!("cycle through node {:?}", cycle.node_id()))
        })?;
        Ok(order
            .into_iter()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
            .collect())
    }

    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Everything that is not an `In` or `Out` node.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count() - 2 * self.wires.len()
    }

    /// Length of the longest op chain, classical wires included.
    pub fn depth(&self) -> usize {
        let mut layer: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        for (node, _) in self.ops_in_order() {
            let below = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .filter_map(|pred| layer.get(&pred).copied())
                .max()
                .unwrap_or(0);
            layer.insert(node, below + 1);
        }
        layer.into_values().max().unwrap_or(0)
    }

    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Check that the graph is acyclic and that every wire can be followed
    /// edge by edge from its `In` node to its `Out` node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("graph has a cycle".into()));
        }

        for (&wire, ends) in &self.wires {
            let mut at = ends.input;
            for _ in 0..self.graph.node_count() {
                if at == ends.output {
                    break;
                }
                at = self
                    .graph
                    .edges_directed(at, Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!("{wire:?} breaks after node {at:?}"))
                    })?;
            }
            if at != ends.output {
                return Err(IrError::InvalidDag(format!("{wire:?} never reaches its end")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;
    use std::f64::consts::PI;

    fn dag_with(qubits: u32, clbits: u32) -> CircuitDag {
        let mut dag = CircuitDag::new();
        (0..qubits).for_each(|q| dag.add_qubit(QubitId(q)));
        (0..clbits).for_each(|c| dag.add_clbit(ClbitId(c)));
        dag
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_wires_are_added_once() {
        let mut dag = dag_with(2, 1);
        dag.add_qubit(QubitId(0));
        dag.add_clbit(ClbitId(0));
        assert_eq!(dag.num_qubits(), 2);
        assert_eq!(dag.num_clbits(), 1);
        assert_eq!(dag.graph().node_count(), 6);
    }

    #[test]
    fn test_apply_returns_op_node() {
        let mut dag = dag_with(1, 0);
        let inst = Instruction::gate(StandardGate::H, [QubitId(0)]);
        let node = dag.apply(inst.clone()).unwrap();

        assert_eq!(dag.num_ops(), 1);
        assert_eq!(dag.depth(), 1);
        assert_eq!(dag.get_instruction(node), Some(&inst));
    }

    #[test]
    fn test_parallel_gates_share_a_layer() {
        let mut dag = dag_with(2, 0);
        dag.apply(Instruction::gate(StandardGate::H, [QubitId(0)])).unwrap();
        dag.apply(Instruction::gate(StandardGate::H, [QubitId(1)])).unwrap();
        assert_eq!(dag.depth(), 1);

        let cp = Instruction::gate(StandardGate::CP(PI.into()), [QubitId(0), QubitId(1)]);
        dag.apply(cp).unwrap();
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_application_order_is_kept() {
        let mut dag = dag_with(2, 0);
        dag.apply(Instruction::gate(StandardGate::X, [QubitId(1)])).unwrap();
        dag.apply(Instruction::gate(StandardGate::H, [QubitId(0)])).unwrap();
        dag.apply(Instruction::gate(StandardGate::Swap, [QubitId(0), QubitId(1)]))
            .unwrap();

        let names: Vec<_> = dag.ops_in_order().map(|(_, i)| i.name()).collect();
        assert_eq!(names, vec!["x", "h", "swap"]);

        // The swap depends on both earlier gates in any valid order.
        let topo = dag.topological_ops().unwrap();
        assert_eq!(topo.len(), 3);
        assert_eq!(topo[2].1.name(), "swap");
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = dag_with(2, 0);
        match dag.apply(Instruction::gate(StandardGate::Swap, [QubitId(0)])) {
            Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            }) => {
                assert_eq!(gate_name, "swap");
                assert_eq!((expected, got), (2, 1));
            }
            other => panic!("expected arity error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_qubit_names_the_gate() {
        let mut dag = dag_with(1, 0);
        let inst = Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(99)]);
        match dag.apply(inst) {
            Err(IrError::QubitNotFound { qubit, gate_name }) => {
                assert_eq!(qubit, QubitId(99));
                assert_eq!(gate_name.as_deref(), Some("cx"));
            }
            other => panic!("expected QubitNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_clbit() {
        let mut dag = dag_with(1, 0);
        let result = dag.apply(Instruction::measure(QubitId(0), ClbitId(0)));
        assert!(matches!(result, Err(IrError::ClbitNotFound { gate_name: None, .. })));
    }

    #[test]
    fn test_rejected_instruction_leaves_graph_untouched() {
        let mut dag = dag_with(1, 0);
        let inst = Instruction::gate(StandardGate::CZ, [QubitId(0), QubitId(0)]);
        assert!(matches!(dag.apply(inst), Err(IrError::DuplicateQubit { .. })));
        assert_eq!(dag.num_ops(), 0);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_integrity_with_measurement() {
        let mut dag = dag_with(2, 1);
        dag.apply(Instruction::gate(StandardGate::H, [QubitId(0)])).unwrap();
        dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)]))
            .unwrap();
        dag.apply(Instruction::measure(QubitId(0), ClbitId(0))).unwrap();

        dag.verify_integrity().unwrap();
        assert_eq!(dag.depth(), 3);
    }
}
