//! Dense statevector evolution.
//!
//! Amplitude index bit `q` is the value of qubit `q`, so `QubitId(0)` is the
//! least significant bit. Every gate reduces to one of two kernels: a 2x2
//! update over amplitude pairs differing in one bit ([`Statevector::mix`]),
//! or a per-index phase ([`Statevector::scale`]).

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use phasekit_hal::{HalError, HalResult};
use phasekit_ir::{GateKind, Instruction, InstructionKind, ParameterExpression, StandardGate};

const ONE: Complex64 = Complex64::new(1.0, 0.0);
const ZERO: Complex64 = Complex64::new(0.0, 0.0);

pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// `|0…0⟩` over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Evolve by one instruction.
    ///
    /// Composites run their definition on the host qubits. Measure and
    /// barrier are no-ops here: outcomes are sampled from the final state.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        match &instruction.kind {
            InstructionKind::Gate(gate) => match &gate.kind {
                GateKind::Standard(std_gate) => {
                    self.check_operands(std_gate, &qubits)?;
                    self.apply_standard(std_gate, &qubits)
                }
                GateKind::Composite(composite) => composite.definition.iter().try_for_each(|step| {
                    let host = step
                        .remap_qubits(&instruction.qubits)
                        .map_err(|e| HalError::InvalidCircuit(e.to_string()))?;
                    self.apply(&host)
                }),
            },
            InstructionKind::Reset => {
                for &q in &qubits {
                    self.in_range(q)?;
                    self.reset(q);
                }
                Ok(())
            }
            InstructionKind::Measure | InstructionKind::Barrier => Ok(()),
        }
    }

    fn in_range(&self, qubit: usize) -> HalResult<()> {
        if qubit < self.num_qubits {
            Ok(())
        } else {
            Err(HalError::InvalidCircuit(format!(
                "qubit {qubit} is outside a {}-qubit statevector",
                self.num_qubits
            )))
        }
    }

    fn check_operands(&self, gate: &StandardGate, qubits: &[usize]) -> HalResult<()> {
        if qubits.len() != gate.num_qubits() as usize {
            return Err(HalError::InvalidCircuit(format!(
                "'{}' needs {} operand(s), got {}",
                gate.name(),
                gate.num_qubits(),
                qubits.len()
            )));
        }
        qubits.iter().try_for_each(|&q| self.in_range(q))
    }

    fn apply_standard(&mut self, gate: &StandardGate, q: &[usize]) -> HalResult<()> {
        match gate {
            StandardGate::I => {}
            StandardGate::X => self.mix(q[0], |_, a, b| (b, a)),
            StandardGate::H => self.mix(q[0], |_, a, b| {
                (FRAC_1_SQRT_2 * (a + b), FRAC_1_SQRT_2 * (a - b))
            }),
            StandardGate::Z => self.phase_where(bit(q[0]), PI),
            StandardGate::S => self.phase_where(bit(q[0]), PI / 2.0),
            StandardGate::Sdg => self.phase_where(bit(q[0]), -PI / 2.0),
            StandardGate::T => self.phase_where(bit(q[0]), PI / 4.0),
            StandardGate::Tdg => self.phase_where(bit(q[0]), -PI / 4.0),
            StandardGate::P(lambda) => self.phase_where(bit(q[0]), angle(gate, lambda)?),
            StandardGate::Rz(theta) => self.rz_where(0, q[0], angle(gate, theta)?),

            StandardGate::CX => {
                let control = bit(q[0]);
                self.mix(q[1], |i, a, b| if i & control != 0 { (b, a) } else { (a, b) });
            }
            StandardGate::CZ => self.phase_where(bit(q[0]) | bit(q[1]), PI),
            StandardGate::CP(lambda) => {
                self.phase_where(bit(q[0]) | bit(q[1]), angle(gate, lambda)?);
            }
            StandardGate::CRz(theta) => self.rz_where(bit(q[0]), q[1], angle(gate, theta)?),
            StandardGate::Swap => {
                let (lo, hi) = (bit(q[0]), bit(q[1]));
                for i in 0..self.amplitudes.len() {
                    if i & lo != 0 && i & hi == 0 {
                        self.amplitudes.swap(i, i ^ lo ^ hi);
                    }
                }
            }
        }
        Ok(())
    }

    /// Rewrite each pair `(i, i | bit(qubit))` with `i`'s bit clear.
    fn mix(
        &mut self,
        qubit: usize,
        op: impl Fn(usize, Complex64, Complex64) -> (Complex64, Complex64),
    ) {
        let mask = bit(qubit);
        for i in (0..self.amplitudes.len()).filter(|i| i & mask == 0) {
            let j = i | mask;
            (self.amplitudes[i], self.amplitudes[j]) =
                op(i, self.amplitudes[i], self.amplitudes[j]);
        }
    }

    /// Multiply every amplitude whose index has a factor.
    fn scale(&mut self, factor: impl Fn(usize) -> Option<Complex64>) {
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if let Some(f) = factor(i) {
                *amp *= f;
            }
        }
    }

    /// `e^{iθ}` on indices with every bit of `mask` set.
    fn phase_where(&mut self, mask: usize, theta: f64) {
        let phase = Complex64::from_polar(1.0, theta);
        self.scale(|i| (i & mask == mask).then_some(phase));
    }

    /// `Rz(θ)` on `target`, restricted to indices with every bit of `control` set.
    fn rz_where(&mut self, control: usize, target: usize, theta: f64) {
        let down = Complex64::from_polar(1.0, -theta / 2.0);
        let up = Complex64::from_polar(1.0, theta / 2.0);
        let t = bit(target);
        self.scale(|i| (i & control == control).then_some(if i & t == 0 { down } else { up }));
    }

    /// Project `qubit` onto |0⟩ and renormalize.
    ///
    /// A qubit that is certainly |1⟩ is flipped instead, so the result is
    /// always a valid state.
    fn reset(&mut self, qubit: usize) {
        let mask = bit(qubit);
        let zero_weight: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();

        if zero_weight < 1e-15 {
            self.mix(qubit, |_, a, b| (b, a));
            return;
        }

        let norm = zero_weight.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp = if i & mask == 0 { *amp / norm } else { ZERO };
        }
    }

    /// `|amplitude|²` per basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }
}

#[inline]
fn bit(qubit: usize) -> usize {
    1 << qubit
}

fn angle(gate: &StandardGate, expr: &ParameterExpression) -> HalResult<f64> {
    expr.evaluate()
        .map_err(|e| HalError::InvalidCircuit(format!("gate '{}': {e}", gate.name())))
}
