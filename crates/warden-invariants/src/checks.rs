use std::time::Instant;

use serde_json::json;

use crate::input::{L0Config, L0Input};
use warden_types::L0Result;

/// L0 check trait — each of the five safety invariants implements this.
///
/// Checks are pure functions of `(input, config)`: calling one twice with
/// the same arguments yields identical `passed` and `evidence`.
pub trait L0Check: Send + Sync {
    /// Unique invariant identifier (e.g., "L0-001").
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Run the check against the supplied input.
    fn check(&self, input: &L0Input, config: &L0Config) -> L0Result;
}

/// Over-broad workflow permission grants flagged by L0-002.
pub const OVER_BROAD_PERMISSION_PATTERNS: &[&str] = &[
    "write-all",
    "contents: write",
    "packages: write",
    "actions: write",
    "administration: write",
];

// =========================================================================
// L0-001: CONTENT DIGEST INTEGRITY
// =========================================================================

/// Recompute the content digest and compare to the expected digest.
pub struct ContentDigestCheck;

impl L0Check for ContentDigestCheck {
    fn id(&self) -> &'static str {
        "L0-001"
    }
    fn name(&self) -> &'static str {
        "Content Digest Integrity"
    }
    fn check(&self, input: &L0Input, _config: &L0Config) -> L0Result {
        let started = Instant::now();
        let computed = blake3::hash(input.content.as_bytes()).to_hex().to_string();
        let expected = input.expected_digest.to_lowercase();
        let result = if computed == expected {
            L0Result::pass(self.id(), "content digest matches expected digest")
        } else {
            L0Result::fail(self.id(), "content digest does not match expected digest")
        };
        result
            .with_evidence("computed_digest", json!(computed))
            .with_evidence("expected_digest", json!(expected))
            .with_latency(started.elapsed().as_micros() as u64)
    }
}

// =========================================================================
// L0-002: LEAST-PRIVILEGE PERMISSION SCAN
// =========================================================================

/// Scan workflow text for a fixed set of over-broad permission grants.
pub struct LeastPrivilegeCheck;

impl L0Check for LeastPrivilegeCheck {
    fn id(&self) -> &'static str {
        "L0-002"
    }
    fn name(&self) -> &'static str {
        "Least-Privilege Permission Scan"
    }
    fn check(&self, input: &L0Input, _config: &L0Config) -> L0Result {
        let started = Instant::now();
        let matched: Vec<&str> = OVER_BROAD_PERMISSION_PATTERNS
            .iter()
            .copied()
            .filter(|p| input.workflow_text.contains(p))
            .collect();
        let result = if matched.is_empty() {
            L0Result::pass(self.id(), "no over-broad permission grants found")
        } else {
            L0Result::fail(
                self.id(),
                format!("over-broad permission grants found: {}", matched.join(", ")),
            )
        };
        result
            .with_evidence("matched_patterns", json!(matched))
            .with_latency(started.elapsed().as_micros() as u64)
    }
}

// =========================================================================
// L0-003: DRIFT MAGNITUDE
// =========================================================================

/// Relative drift between a current value and its baseline.
pub struct DriftMagnitudeCheck;

impl DriftMagnitudeCheck {
    /// `|current - baseline| / baseline`; a zero baseline counts as drift 1
    /// when the current value is non-zero, 0 otherwise.
    pub fn drift(current: f64, baseline: f64) -> f64 {
        if baseline == 0.0 {
            if current == 0.0 {
                0.0
            } else {
                1.0
            }
        } else {
            (current - baseline).abs() / baseline.abs()
        }
    }
}

impl L0Check for DriftMagnitudeCheck {
    fn id(&self) -> &'static str {
        "L0-003"
    }
    fn name(&self) -> &'static str {
        "Drift Magnitude"
    }
    fn check(&self, input: &L0Input, config: &L0Config) -> L0Result {
        let started = Instant::now();
        let drift = Self::drift(input.drift.current, input.drift.baseline);
        // Boundary inclusive: drift exactly at the threshold passes.
        let result = if drift <= config.drift_threshold {
            L0Result::pass(
                self.id(),
                format!("drift {:.4} within threshold {}", drift, config.drift_threshold),
            )
        } else {
            L0Result::fail(
                self.id(),
                format!("drift {:.4} exceeds threshold {}", drift, config.drift_threshold),
            )
        };
        result
            .with_evidence("drift", json!(drift))
            .with_evidence("current", json!(input.drift.current))
            .with_evidence("baseline", json!(input.drift.baseline))
            .with_evidence("threshold", json!(config.drift_threshold))
            .with_latency(started.elapsed().as_micros() as u64)
    }
}

// =========================================================================
// L0-004: NONCE FRESHNESS
// =========================================================================

/// Age of the nonce against `now`: negative ages (future issuance — clock
/// skew or forgery) and ages past the configured maximum both fail.
pub struct NonceFreshnessCheck;

impl L0Check for NonceFreshnessCheck {
    fn id(&self) -> &'static str {
        "L0-004"
    }
    fn name(&self) -> &'static str {
        "Nonce Freshness"
    }
    fn check(&self, input: &L0Input, config: &L0Config) -> L0Result {
        let started = Instant::now();
        let age_secs = (input.now - input.nonce_issued_at).num_seconds();
        let result = if age_secs < 0 {
            L0Result::fail(
                self.id(),
                format!("nonce issued {}s in the future", -age_secs),
            )
        } else if age_secs > config.max_nonce_age_secs {
            L0Result::fail(
                self.id(),
                format!(
                    "nonce age {}s exceeds max age {}s",
                    age_secs, config.max_nonce_age_secs
                ),
            )
        } else {
            L0Result::pass(self.id(), format!("nonce age {}s is fresh", age_secs))
        };
        result
            .with_evidence("age_secs", json!(age_secs))
            .with_evidence("max_age_secs", json!(config.max_nonce_age_secs))
            .with_latency(started.elapsed().as_micros() as u64)
    }
}

// =========================================================================
// L0-005: CONTRACTION WITNESS
// =========================================================================

/// A false-positive-rate decrease of more than one percentage point must be
/// backed by enough witness review events, all carrying a non-empty
/// reviewer. An unverified decrease is treated as gaming and fails.
pub struct ContractionWitnessCheck;

const CONTRACTION_TOLERANCE_PP: f64 = 0.01;

impl L0Check for ContractionWitnessCheck {
    fn id(&self) -> &'static str {
        "L0-005"
    }
    fn name(&self) -> &'static str {
        "Contraction Witness"
    }
    fn check(&self, input: &L0Input, config: &L0Config) -> L0Result {
        let started = Instant::now();
        let c = &input.contraction;
        let decrease = c.previous_fpr - c.current_fpr;

        let result = if decrease <= CONTRACTION_TOLERANCE_PP {
            // Small or no decrease needs no evidence.
            L0Result::pass(
                self.id(),
                format!("FPR decrease {:.4} within tolerance, no witnesses required", decrease),
            )
        } else {
            let reviewed = c.witnesses.iter().filter(|w| w.is_reviewed()).count();
            let unreviewed = c.witnesses.len() - reviewed;
            if c.witnesses.len() < config.min_witness_events {
                L0Result::fail(
                    self.id(),
                    format!(
                        "FPR decrease {:.4} requires at least {} witness events, got {}",
                        decrease,
                        config.min_witness_events,
                        c.witnesses.len()
                    ),
                )
            } else if unreviewed > 0 {
                L0Result::fail(
                    self.id(),
                    format!(
                        "FPR decrease {:.4} has {} unreviewed witness events",
                        decrease, unreviewed
                    ),
                )
            } else {
                L0Result::pass(
                    self.id(),
                    format!(
                        "FPR decrease {:.4} verified by {} reviewed witness events",
                        decrease, reviewed
                    ),
                )
            }
        };
        result
            .with_evidence("previous_fpr", json!(c.previous_fpr))
            .with_evidence("current_fpr", json!(c.current_fpr))
            .with_evidence("witness_count", json!(c.witnesses.len()))
            .with_latency(started.elapsed().as_micros() as u64)
    }
}
