//! Text rendering of circuits and outcome histograms.
//!
//! Rendering is never required for an estimate: the driver takes a
//! `&mut dyn Renderer` and [`NullRenderer`] discards everything.

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::io::{self, Write};

use phasekit_hal::Counts;
use phasekit_ir::{Circuit, GateKind, Instruction, InstructionKind, ParameterExpression, StandardGate};

/// Receives the circuit before execution and the counts after it.
pub trait Renderer {
    /// Render the circuit about to be executed.
    fn circuit(&mut self, circuit: &Circuit) -> io::Result<()>;

    /// Render the measured outcome distribution.
    fn histogram(&mut self, counts: &Counts) -> io::Result<()>;
}

/// Renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn circuit(&mut self, _circuit: &Circuit) -> io::Result<()> {
        Ok(())
    }

    fn histogram(&mut self, _counts: &Counts) -> io::Result<()> {
        Ok(())
    }
}

/// Renderer writing plain text diagrams to any [`Write`] sink.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    circuits: bool,
    histograms: bool,
}

impl<W: Write> TextRenderer<W> {
    /// Render both circuits and histograms into `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            circuits: true,
            histograms: true,
        }
    }

    /// Enable or disable circuit diagrams.
    #[must_use]
    pub fn with_circuits(mut self, enabled: bool) -> Self {
        self.circuits = enabled;
        self
    }

    /// Enable or disable histograms.
    #[must_use]
    pub fn with_histograms(mut self, enabled: bool) -> Self {
        self.histograms = enabled;
        self
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn circuit(&mut self, circuit: &Circuit) -> io::Result<()> {
        if self.circuits {
            writeln!(self.out, "{}", draw_circuit(circuit))?;
        }
        Ok(())
    }

    fn histogram(&mut self, counts: &Counts) -> io::Result<()> {
        if self.histograms {
            write!(self.out, "{}", format_histogram(counts))?;
        }
        Ok(())
    }
}

// =============================================================================
// Circuit diagram
// =============================================================================

/// One column of the diagram: a label per wire plus the vertical connector.
struct Column {
    cells: Vec<Option<String>>,
    /// Wires `lo..hi` joined to the wire below by a connector.
    link: Option<(usize, usize, char)>,
}

/// Draw `circuit` with one row per qubit and instructions packed into columns.
///
/// Controls are drawn as `●`, swaps as `×`, barriers as `░` and measurements
/// as `M`. A multi-qubit instruction reserves every wire between its
/// outermost operands so connectors never overlap another gate.
pub fn draw_circuit(circuit: &Circuit) -> String {
    let num_wires = circuit.num_qubits();
    let mut columns: Vec<Column> = Vec::new();
    let mut next_free = vec![0usize; num_wires];

    for inst in circuit.instructions() {
        let wires: Vec<usize> = inst.qubits.iter().map(|q| q.index()).collect();
        let (Some(&lo), Some(&hi)) = (wires.iter().min(), wires.iter().max()) else {
            continue;
        };
        let col = (lo..=hi).map(|w| next_free[w]).max().unwrap_or(0);
        for slot in &mut next_free[lo..=hi] {
            *slot = col + 1;
        }
        if col == columns.len() {
            columns.push(Column {
                cells: vec![None; num_wires],
                link: None,
            });
        }

        let column = &mut columns[col];
        let labels = operand_labels(inst);
        for (wire, label) in wires.iter().zip(labels) {
            column.cells[*wire] = Some(label);
        }
        let joiner = if inst.is_barrier() { '░' } else { '│' };
        for wire in lo + 1..hi {
            if column.cells[wire].is_none() {
                column.cells[wire] = Some(if inst.is_barrier() { "░" } else { "┼" }.into());
            }
        }
        if hi > lo {
            column.link = Some((lo, hi, joiner));
        }
    }

    let names: Vec<String> = circuit.qubits().iter().map(ToString::to_string).collect();
    let name_width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            c.cells
                .iter()
                .flatten()
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(1)
        })
        .collect();

    let mut text = String::new();
    for wire in 0..num_wires {
        let _ = write!(text, "{:>name_width$}: ─", names[wire]);
        for (column, &width) in columns.iter().zip(&widths) {
            match &column.cells[wire] {
                Some(label) => text.push_str(&center(label, width, '─')),
                None => text.push_str(&"─".repeat(width)),
            }
            text.push('─');
        }
        text.push('\n');

        if wire + 1 < num_wires {
            let mut gap = " ".repeat(name_width + 3);
            for (column, &width) in columns.iter().zip(&widths) {
                match column.link {
                    Some((lo, hi, joiner)) if lo <= wire && wire < hi => {
                        gap.push_str(&center(&joiner.to_string(), width, ' '));
                    }
                    _ => gap.push_str(&" ".repeat(width)),
                }
                gap.push(' ');
            }
            text.push_str(gap.trim_end());
            text.push('\n');
        }
    }
    text
}

/// Label for each operand of `inst`, in operand order.
fn operand_labels(inst: &Instruction) -> Vec<String> {
    let arity = inst.qubits.len();
    match &inst.kind {
        InstructionKind::Measure => vec!["M".into()],
        InstructionKind::Reset => vec!["|0⟩".into()],
        InstructionKind::Barrier => vec!["░".into(); arity],
        InstructionKind::Gate(gate) => match &gate.kind {
            GateKind::Composite(composite) => {
                vec![gate.label.clone().unwrap_or_else(|| composite.name.clone()); arity]
            }
            GateKind::Standard(std_gate) => match std_gate {
                StandardGate::CX => vec!["●".into(), "⊕".into()],
                StandardGate::CZ => vec!["●".into(), "●".into()],
                StandardGate::Swap => vec!["×".into(), "×".into()],
                StandardGate::CP(a) => vec!["●".into(), format!("P({})", format_angle(a))],
                StandardGate::CRz(a) => vec!["●".into(), format!("Rz({})", format_angle(a))],
                StandardGate::Rz(a) => vec![format!("Rz({})", format_angle(a))],
                StandardGate::P(a) => vec![format!("P({})", format_angle(a))],
                StandardGate::I => vec!["I".into()],
                StandardGate::X => vec!["X".into()],
                StandardGate::Z => vec!["Z".into()],
                StandardGate::H => vec!["H".into()],
                StandardGate::S => vec!["S".into()],
                StandardGate::Sdg => vec!["S†".into()],
                StandardGate::T => vec!["T".into()],
                StandardGate::Tdg => vec!["T†".into()],
            },
        },
    }
}

fn center(label: &str, width: usize, fill: char) -> String {
    let len = label.chars().count();
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(len + left);
    let mut cell = String::with_capacity(width * 3);
    cell.extend(std::iter::repeat_n(fill, left));
    cell.push_str(label);
    cell.extend(std::iter::repeat_n(fill, right));
    cell
}

/// Format an angle as a multiple of π when it is a simple fraction of it.
pub fn format_angle(angle: &ParameterExpression) -> String {
    let Some(value) = angle.as_f64() else {
        return angle.to_string();
    };
    if value.abs() < 1e-12 {
        return "0".into();
    }

    let ratio = value / PI;
    let denominators = (1..=16u32).chain((5..=20).map(|k| 1u32 << k));
    for den in denominators {
        let scaled = ratio * f64::from(den);
        let num = scaled.round();
        if (scaled - num).abs() < 1e-9 {
            let sign = if num < 0.0 { "-" } else { "" };
            let num = num.abs();
            let numerator = if (num - 1.0).abs() < f64::EPSILON {
                "π".to_string()
            } else {
                format!("{num}π")
            };
            return if den == 1 {
                format!("{sign}{numerator}")
            } else {
                format!("{sign}{numerator}/{den}")
            };
        }
    }
    format!("{value:.4}")
}

// =============================================================================
// Histogram
// =============================================================================

/// Rows shown before the remainder is summarised.
const MAX_HISTOGRAM_ROWS: usize = 16;

/// Format outcome probabilities as a bar chart, most frequent first.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_histogram(counts: &Counts) -> String {
    let total = counts.total_shots();
    let mut text = format!("Results ({total} shots):\n");
    if total == 0 {
        text.push_str("  (no outcomes)\n");
        return text;
    }

    let sorted = counts.sorted();
    for &(bitstring, &count) in sorted.iter().take(MAX_HISTOGRAM_ROWS) {
        let percent = count as f64 / total as f64 * 100.0;
        let bar = "█".repeat((percent / 2.0).round() as usize);
        let _ = writeln!(text, "  {bitstring}: {count:>6} ({percent:>5.2}%) {bar}");
    }
    if sorted.len() > MAX_HISTOGRAM_ROWS {
        let _ = writeln!(
            text,
            "  ... and {} more outcomes",
            sorted.len() - MAX_HISTOGRAM_ROWS
        );
    }
    text
}
