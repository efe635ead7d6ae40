//! Adjoints of gates, instructions and composites.

use crate::error::{IrError, IrResult};
use crate::gate::{CompositeGate, Gate, GateKind, StandardGate};
use crate::instruction::{Instruction, InstructionKind};

/// The adjoint U† of a standard gate.
///
/// Rotations negate their angle symbolically, so `CP(π/4)` inverts to
/// `CP(-π/4)` rather than to a float.
pub fn inverse_gate(gate: &StandardGate) -> StandardGate {
    match gate {
        StandardGate::I
        | StandardGate::X
        | StandardGate::Z
        | StandardGate::H
        | StandardGate::CX
        | StandardGate::CZ
        | StandardGate::Swap => gate.clone(),
        StandardGate::S => StandardGate::Sdg,
        StandardGate::Sdg => StandardGate::S,
        StandardGate::T => StandardGate::Tdg,
        StandardGate::Tdg => StandardGate::T,

        StandardGate::Rz(theta) => StandardGate::Rz(-theta.clone()),
        StandardGate::P(lambda) => StandardGate::P(-lambda.clone()),
        StandardGate::CRz(theta) => StandardGate::CRz(-theta.clone()),
        StandardGate::CP(lambda) => StandardGate::CP(-lambda.clone()),
    }
}

/// The adjoint of one instruction, on the same operands.
///
/// Composites get their definition reversed and each step inverted, and
/// their name toggles the `_dg` suffix. Barriers pass through. Measure and
/// reset have no adjoint.
pub fn inverse_instruction(instruction: &Instruction) -> IrResult<Instruction> {
    match &instruction.kind {
        InstructionKind::Gate(gate) => {
            let kind = match &gate.kind {
                GateKind::Standard(std_gate) => GateKind::Standard(inverse_gate(std_gate)),
                GateKind::Composite(composite) => GateKind::Composite(inverse_composite(composite)?),
            };

            Ok(Instruction {
                kind: InstructionKind::Gate(Gate {
                    kind,
                    label: gate.label.clone(),
                }),
                qubits: instruction.qubits.clone(),
                clbits: instruction.clbits.clone(),
            })
        }

        InstructionKind::Barrier => Ok(instruction.clone()),

        InstructionKind::Measure => Err(IrError::NonUnitaryOperation("measure".into())),

        InstructionKind::Reset => Err(IrError::NonUnitaryOperation("reset".into())),
    }
}

fn inverse_composite(composite: &CompositeGate) -> IrResult<CompositeGate> {
    let definition = composite
        .definition
        .iter()
        .rev()
        .map(inverse_instruction)
        .collect::<IrResult<Vec<_>>>()?;
    Ok(CompositeGate::new(
        dagger_name(&composite.name),
        composite.num_qubits,
        definition,
    ))
}

/// `qft` becomes `qft_dg`, and `qft_dg` becomes `qft` again.
pub(crate) fn dagger_name(name: &str) -> String {
    match name.strip_suffix("_dg") {
        Some(base) => base.to_string(),
        None => format!("{name}_dg"),
    }
}

/// `true` for Hermitian gates, which are their own inverse.
pub fn is_self_inverse(gate: &StandardGate) -> bool {
    inverse_gate(gate) == *gate && gate.angle().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParameterExpression;
    use crate::qubit::{ClbitId, QubitId};
    use std::f64::consts::PI;

    #[test]
    fn test_self_inverse_gates() {
        assert!(is_self_inverse(&StandardGate::H));
        assert!(is_self_inverse(&StandardGate::Swap));
        assert!(!is_self_inverse(&StandardGate::S));
        assert!(!is_self_inverse(&StandardGate::CP(PI.into())));
    }

    #[test]
    fn test_inverse_h_and_swap() {
        assert_eq!(inverse_gate(&StandardGate::H), StandardGate::H);
        assert_eq!(inverse_gate(&StandardGate::Swap), StandardGate::Swap);
    }

    #[test]
    fn test_inverse_s_t() {
        assert_eq!(inverse_gate(&StandardGate::S), StandardGate::Sdg);
        assert_eq!(inverse_gate(&StandardGate::Tdg), StandardGate::T);
    }

    #[test]
    fn test_inverse_cp_negates_angle() {
        let cp = StandardGate::CP(ParameterExpression::constant(PI / 4.0));
        match inverse_gate(&cp) {
            StandardGate::CP(param) => {
                assert!((param.as_f64().unwrap() + PI / 4.0).abs() < 1e-12);
            }
            other => panic!("Expected CP gate, got {other:?}"),
        }
    }

    #[test]
    fn test_inverse_composite_reverses_definition() {
        let body = vec![
            Instruction::gate(StandardGate::S, [QubitId(0)]),
            Instruction::gate(StandardGate::H, [QubitId(0)]),
        ];
        let inst = Instruction::gate(CompositeGate::new("block", 1, body), [QubitId(2)]);
        let inv = inverse_instruction(&inst).unwrap();

        let composite = inv.as_composite().unwrap();
        assert_eq!(composite.name, "block_dg");
        assert_eq!(composite.definition[0].as_standard(), Some(&StandardGate::H));
        assert_eq!(
            composite.definition[1].as_standard(),
            Some(&StandardGate::Sdg)
        );
        assert_eq!(inv.qubits, vec![QubitId(2)]);
    }

    #[test]
    fn test_dagger_name_round_trip() {
        assert_eq!(dagger_name("qft"), "qft_dg");
        assert_eq!(dagger_name("qft_dg"), "qft");
    }

    #[test]
    fn test_measure_not_invertible() {
        let inst = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(matches!(
            inverse_instruction(&inst),
            Err(IrError::NonUnitaryOperation(_))
        ));
    }
}
