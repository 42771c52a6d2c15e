use chrono::{DateTime, Utc};

/// Inputs to the five L0 checks.
///
/// The caller resolves these ahead of time (parsed workflow text, the
/// verified binding's issuance timestamp, the baseline series) — workflow
/// parsing and identity verification live outside the core. `now` is
/// carried explicitly so every check is deterministic under test.
#[derive(Clone, Debug)]
pub struct L0Input {
    /// Raw content whose digest is verified by L0-001.
    pub content: String,
    /// Expected lowercase-hex blake3 digest of `content`.
    pub expected_digest: String,
    /// Workflow text scanned by L0-002.
    pub workflow_text: String,
    /// Numeric pair checked for drift by L0-003.
    pub drift: DriftInput,
    /// Issuance timestamp of the nonce checked for freshness by L0-004.
    pub nonce_issued_at: DateTime<Utc>,
    /// False-positive-rate contraction claim checked by L0-005.
    pub contraction: ContractionInput,
    /// The evaluation instant all time-based checks measure against.
    pub now: DateTime<Utc>,
}

/// `(current, baseline)` pair for the drift magnitude check.
#[derive(Clone, Copy, Debug)]
pub struct DriftInput {
    pub current: f64,
    pub baseline: f64,
}

/// A claimed false-positive-rate decrease plus its witness review events.
#[derive(Clone, Debug)]
pub struct ContractionInput {
    pub previous_fpr: f64,
    pub current_fpr: f64,
    pub witnesses: Vec<ReviewWitness>,
}

/// One witness review event backing a contraction claim.
#[derive(Clone, Debug)]
pub struct ReviewWitness {
    pub event_id: String,
    pub reviewed_by: Option<String>,
}

impl ReviewWitness {
    pub fn is_reviewed(&self) -> bool {
        self.reviewed_by
            .as_deref()
            .map(|r| !r.is_empty())
            .unwrap_or(false)
    }
}

/// Tunable thresholds for the L0 checks.
#[derive(Clone, Debug)]
pub struct L0Config {
    /// Maximum accepted relative drift (boundary inclusive). Default 0.5.
    pub drift_threshold: f64,
    /// Maximum accepted nonce age in seconds (boundary inclusive).
    /// Default 3600.
    pub max_nonce_age_secs: i64,
    /// Minimum reviewed witness events required to accept an FPR decrease
    /// of more than one percentage point. Default 10.
    pub min_witness_events: usize,
}

impl Default for L0Config {
    fn default() -> Self {
        Self {
            drift_threshold: 0.5,
            max_nonce_age_secs: 3600,
            min_witness_events: 10,
        }
    }
}
