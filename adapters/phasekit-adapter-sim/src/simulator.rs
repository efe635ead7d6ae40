//! [`SimulatorBackend`]: runs jobs to completion inside `submit`.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use phasekit_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, GateSet, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use phasekit_ir::{Circuit, Instruction, InstructionKind, QubitId};

use crate::statevector::Statevector;

/// Default register limit: 2^20 amplitudes is 16 MiB of state.
const DEFAULT_MAX_QUBITS: u32 = 20;

struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Each job evolves one statevector through the whole circuit, then draws
/// `shots` samples from the final distribution. Measurements must be terminal:
/// a qubit may not be acted on after it has been measured.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<JobId, SimJob>>>,
    /// Shot sampler.
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// A 20-qubit simulator seeded from OS entropy.
    pub fn new() -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            DEFAULT_MAX_QUBITS,
            StdRng::from_entropy(),
        )
    }

    /// Same as [`new`](Self::new) but capped at `max_qubits`.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            max_qubits,
            StdRng::from_entropy(),
        )
    }

    /// Create a simulator whose shot sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            DEFAULT_MAX_QUBITS,
            StdRng::seed_from_u64(seed),
        )
    }

    fn build(config: BackendConfig, max_qubits: u32, rng: StdRng) -> Self {
        let mut capabilities = Capabilities::simulator(max_qubits);
        capabilities.name.clone_from(&config.name);
        Self {
            config,
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(rng),
        }
    }

    /// Exact outcome distribution of `circuit`, keyed like [`Counts`].
    ///
    /// Outcomes with probability below 1e-12 are omitted.
    pub fn probabilities(&self, circuit: &Circuit) -> HalResult<BTreeMap<String, f64>> {
        self.ensure_valid(circuit)?;
        let layout = OutcomeLayout::of(circuit);
        let probs = evolve(circuit)?.probabilities();

        let mut distribution = BTreeMap::new();
        for (index, p) in probs.into_iter().enumerate() {
            if p > 1e-12 {
                *distribution.entry(layout.bitstring(index)).or_insert(0.0) += p;
            }
        }
        Ok(distribution)
    }

    fn too_wide(&self, circuit: &Circuit) -> Option<String> {
        (circuit.num_qubits() > self.capabilities.num_qubits as usize).then(|| {
            format!(
                "{} qubits requested, simulator holds {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )
        })
    }

    /// Everything that stops `circuit` from running here, apart from its width.
    fn problems(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = vec![];
        let mut unsupported: Vec<&str> = vec![];
        for inst in circuit.instructions() {
            collect_unsupported(inst, &self.capabilities.gate_set, &mut unsupported);
        }
        if !unsupported.is_empty() {
            reasons.push(format!("unsupported gates: {}", unsupported.join(", ")));
        }
        reasons.extend(structural_problems(circuit));
        reasons
    }

    fn ensure_valid(&self, circuit: &Circuit) -> HalResult<()> {
        if let Some(reason) = self.too_wide(circuit) {
            return Err(HalError::CircuitTooLarge(reason));
        }
        let reasons = self.problems(circuit);
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(HalError::InvalidCircuit(reasons.join("; ")))
        }
    }

    /// Evolve once, then sample `shots` outcomes.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    #[allow(clippy::cast_possible_truncation)]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        debug!(
            qubits = circuit.num_qubits(),
            ops = circuit.num_ops(),
            shots,
            "evolving statevector"
        );

        let layout = OutcomeLayout::of(circuit);
        let probs = evolve(circuit)?.probabilities();

        // Cumulative distribution for inverse-transform sampling.
        let mut cumulative = Vec::with_capacity(probs.len());
        let mut acc = 0.0;
        for p in &probs {
            acc += p;
            cumulative.push(acc);
        }
        let last = cumulative.len().saturating_sub(1);

        let mut hits: FxHashMap<usize, u64> = FxHashMap::default();
        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            for _ in 0..shots {
                let r: f64 = rng.r#gen::<f64>() * acc;
                let index = cumulative.partition_point(|&c| c <= r).min(last);
                *hits.entry(index).or_insert(0) += 1;
            }
        }

        let mut counts = Counts::new();
        for (index, n) in hits {
            counts.insert(layout.bitstring(index), n);
        }

        let elapsed = start.elapsed();
        debug!(?elapsed, outcomes = counts.len(), "sampling done");

        Ok(ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64))
    }

    fn set_status(&self, job_id: &JobId, status: JobStatus, result: Option<ExecutionResult>) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sim_job) = jobs.get_mut(job_id) {
            if sim_job.job.advance(status) && result.is_some() {
                sim_job.result = result;
            }
        }
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply every instruction of `circuit` to a fresh statevector.
fn evolve(circuit: &Circuit) -> HalResult<Statevector> {
    let mut sv = Statevector::new(circuit.num_qubits());
    for inst in circuit.instructions() {
        sv.apply(inst)?;
    }
    Ok(sv)
}

/// Problems that make a circuit unrunnable regardless of its size.
fn structural_problems(circuit: &Circuit) -> Vec<String> {
    let mut reasons = vec![];
    let mut measured: FxHashSet<QubitId> = FxHashSet::default();

    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Measure => measured.extend(inst.qubits.iter().copied()),
            InstructionKind::Barrier => {}
            InstructionKind::Gate(_) | InstructionKind::Reset => {
                if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                    reasons.push(format!(
                        "'{}' acts on {q} after it was measured (mid-circuit measurement is not supported)",
                        inst.name()
                    ));
                }
                if let Some(symbol) = first_unbound(inst) {
                    reasons.push(format!(
                        "'{}' has unbound parameter '{symbol}'",
                        inst.name()
                    ));
                }
            }
        }
    }
    reasons
}

fn collect_unsupported<'a>(inst: &'a Instruction, gates: &GateSet, out: &mut Vec<&'a str>) {
    if let Some(composite) = inst.as_composite() {
        for sub in &composite.definition {
            collect_unsupported(sub, gates, out);
        }
    } else if let Some(gate) = inst.as_standard() {
        if !gates.contains(gate.name()) && !out.contains(&gate.name()) {
            out.push(gate.name());
        }
    }
}

fn first_unbound(inst: &Instruction) -> Option<String> {
    if let Some(composite) = inst.as_composite() {
        return composite.definition.iter().find_map(first_unbound);
    }
    inst.as_standard()
        .and_then(|g| g.angle())
        .and_then(|angle| angle.first_symbol())
        .map(str::to_string)
}

/// How basis-state indices map onto classical bitstrings.
struct OutcomeLayout {
    /// `(qubit, clbit)` pairs, last measurement of a clbit wins.
    wiring: Vec<(usize, usize)>,
    /// Number of characters in each bitstring.
    width: usize,
}

impl OutcomeLayout {
    fn of(circuit: &Circuit) -> Self {
        let mut by_clbit: BTreeMap<usize, usize> = BTreeMap::new();
        for inst in circuit.instructions().filter(|i| i.is_measure()) {
            for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                by_clbit.insert(c.index(), q.index());
            }
        }

        if by_clbit.is_empty() {
            // No measurements: report every qubit, qubit i at bit i.
            let n = circuit.num_qubits();
            return Self {
                wiring: (0..n).map(|q| (q, q)).collect(),
                width: n,
            };
        }

        Self {
            wiring: by_clbit.into_iter().map(|(c, q)| (q, c)).collect(),
            width: circuit.num_clbits(),
        }
    }

    /// Render basis state `index` with classical bit 0 as the rightmost character.
    fn bitstring(&self, index: usize) -> String {
        let mut bits = vec![b'0'; self.width];
        for &(qubit, clbit) in &self.wiring {
            if (index >> qubit) & 1 == 1 {
                bits[self.width - 1 - clbit] = b'1';
            }
        }
        bits.into_iter().map(char::from).collect()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let reasons: Vec<String> = self
            .too_wide(circuit)
            .into_iter()
            .chain(self.problems(circuit))
            .collect();

        Ok(if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        })
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} (must be between 1 and {})",
                self.capabilities.max_shots
            )));
        }
        self.ensure_valid(circuit)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::queued(job_id.clone(), shots, self.config.name.clone());
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.clone(), SimJob { job, result: None });
        debug!(job = %job_id, shots, "queued");

        self.set_status(&job_id, JobStatus::Running, None);
        match self.run_simulation(circuit, shots) {
            Ok(result) => self.set_status(&job_id, JobStatus::Completed, Some(result)),
            Err(e) => self.set_status(&job_id, JobStatus::Failed(e.to_string()), None),
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(job_id)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::Backend(format!(
                "job {job_id} has no result yet (status: {status})"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !sim_job.job.advance(JobStatus::Cancelled) {
            debug!(job = %job_id, status = %sim_job.job.status, "cancel ignored");
        }
        Ok(())
    }
}

impl BackendFactory for SimulatorBackend {
    #[allow(clippy::cast_possible_truncation)]
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(n @ 1..=30) => n as u32,
            Some(n) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits must be between 1 and 30, got {n}"
                )));
            }
        };
        let rng = match config.extra_u64("seed")? {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::build(config, max_qubits, rng))
    }
}
