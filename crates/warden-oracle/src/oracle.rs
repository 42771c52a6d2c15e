use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::OracleError;
use crate::rule::{PolicyRule, RuleContext};
use warden_breaker::BlockCounter;
use warden_calibration::CalibrationStore;
use warden_invariants::{L0Input, L0Validator};
use warden_types::{Decision, EvaluationStats, L0Result, Outcome, Severity, Violation};

pub use warden_invariants::L0Config;

/// Everything one evaluation call consumes: the L0 invariant inputs and the
/// rule-facing context. `input.l0.now` is the single evaluation instant —
/// breaker buckets and freshness checks all measure against it.
#[derive(Clone, Debug)]
pub struct OracleInput {
    pub l0: L0Input,
    pub context: RuleContext,
}

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// Escalate high-severity violations to block. Default false.
    pub strict_mode: bool,
    /// Per-hour block count at which a rule's breaker trips. Default 10.
    pub breaker_threshold: u64,
    /// When true, a tripped breaker keeps the block and only flags the
    /// decision as degraded, instead of downgrading it to warn.
    pub degraded_is_failure: bool,
    pub l0: L0Config,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            breaker_threshold: 10,
            degraded_is_failure: false,
            l0: L0Config::default(),
        }
    }
}

/// The rule evaluation and decision engine.
///
/// One call runs the L0 gate, evaluates every registered rule, folds the
/// violations into a single decision, and feeds the circuit breaker. The
/// engine is fail-closed end to end:
///
/// - an L0 failure blocks before any rule runs;
/// - a rule that errors contributes a synthetic critical violation instead
///   of silently contributing nothing;
/// - a failed suppression lookup keeps the violation it would have relaxed.
pub struct Oracle {
    rules: Vec<Arc<dyn PolicyRule>>,
    validator: L0Validator,
    calibration: Option<Arc<CalibrationStore>>,
    breaker: BlockCounter,
    config: OracleConfig,
}

impl Oracle {
    pub fn new(rules: Vec<Arc<dyn PolicyRule>>, breaker: BlockCounter, config: OracleConfig) -> Self {
        let validator = L0Validator::new(config.l0.clone());
        Self {
            rules,
            validator,
            calibration: None,
            breaker,
            config,
        }
    }

    /// Attach the calibration store consulted for suppression lookups.
    pub fn with_calibration(mut self, calibration: Arc<CalibrationStore>) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Evaluate one request to a terminal decision.
    pub async fn evaluate(&self, input: &OracleInput) -> Result<Decision, OracleError> {
        // Stage 1: the L0 gate. Any invariant failure blocks outright, with
        // the failing checks' evidence carried into the reasons — no rule
        // ever runs against input the invariants reject.
        let l0_results = self.validator.validate(&input.l0);
        if !L0Validator::gate(&l0_results) {
            let decision = l0_block_decision(&l0_results);
            info!(
                org_id = %input.context.org_id,
                reasons = decision.reasons.len(),
                "evaluation blocked at the L0 gate"
            );
            return Ok(decision);
        }

        // Stage 2: run every rule. An errored rule yields a synthetic
        // critical violation carrying the failure's phase and type.
        let mut violations: Vec<Violation> = Vec::new();
        for rule in &self.rules {
            match rule.evaluate(&input.context).await {
                Ok(found) => violations.extend(found),
                Err(e) => {
                    warn!(rule_id = rule.id(), error = %e, "rule errored, recording synthetic violation");
                    violations.push(Violation::evaluation_error(
                        rule.id(),
                        &e.phase,
                        &e.kind,
                        &e.message,
                    ));
                }
            }
        }

        // The fold must not depend on rule registration order.
        violations.sort_by(|a, b| {
            (a.severity, &a.rule_id, &a.message).cmp(&(b.severity, &b.rule_id, &b.message))
        });

        // Stage 3: calibration suppression. Only real, non-critical findings
        // are ever relaxed; a failed lookup keeps the violation.
        if let Some(calibration) = &self.calibration {
            let candidates: BTreeSet<String> = violations
                .iter()
                .filter(|v| !v.is_evaluation_error && v.severity != Severity::Critical)
                .map(|v| v.rule_id.clone())
                .collect();
            let mut suppressed: BTreeSet<String> = BTreeSet::new();
            for rule_id in candidates {
                match calibration.is_suppressed(&rule_id).await {
                    Ok(true) => {
                        info!(rule_id = %rule_id, "findings suppressed by calibration");
                        suppressed.insert(rule_id);
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!(rule_id = %rule_id, error = %e, "suppression lookup failed, keeping findings");
                    }
                }
            }
            violations.retain(|v| {
                v.is_evaluation_error
                    || v.severity == Severity::Critical
                    || !suppressed.contains(&v.rule_id)
            });
        }

        let stats = EvaluationStats {
            rules_attempted: self.rules.len(),
            real_violations: violations.iter().filter(|v| !v.is_evaluation_error).count(),
            synthetic_violations: violations.iter().filter(|v| v.is_evaluation_error).count(),
        };

        // Stage 4: feed the breaker, once per rule with real violations.
        let org_id = &input.context.org_id;
        let at = input.l0.now;
        let violating_rules: BTreeSet<&str> = violations
            .iter()
            .filter(|v| !v.is_evaluation_error)
            .map(|v| v.rule_id.as_str())
            .collect();
        for rule_id in &violating_rules {
            self.breaker.increment_at(rule_id, org_id, at).await?;
        }

        // Stage 5: fold to an outcome.
        let is_blocking = |v: &Violation| {
            v.severity == Severity::Critical
                || (self.config.strict_mode && v.severity == Severity::High)
        };
        let mut outcome = if violations.iter().any(|v| is_blocking(v)) {
            Outcome::Block
        } else if violations.is_empty() {
            Outcome::Allow
        } else {
            Outcome::Warn
        };

        // Stage 6: degraded mode. When every rule behind the block has
        // tripped its breaker, enforcement is likely misfiring at volume;
        // downgrade to warn (or keep the block and flag it, per config).
        // Synthetic criticals are infrastructure failures and never degrade.
        let mut degraded = false;
        let mut tripped: Vec<(String, u64)> = Vec::new();
        if outcome == Outcome::Block {
            let blocking: Vec<&Violation> =
                violations.iter().filter(|v| is_blocking(v)).collect();
            let all_real = blocking.iter().all(|v| !v.is_evaluation_error);
            if all_real {
                let blocking_rules: BTreeSet<&str> =
                    blocking.iter().map(|v| v.rule_id.as_str()).collect();
                let mut all_broken = true;
                for rule_id in &blocking_rules {
                    let count = self.breaker.count_at(rule_id, org_id, at).await?;
                    if count >= self.config.breaker_threshold {
                        tripped.push((rule_id.to_string(), count));
                    } else {
                        all_broken = false;
                        break;
                    }
                }
                if all_broken {
                    degraded = true;
                    if !self.config.degraded_is_failure {
                        outcome = Outcome::Warn;
                    }
                }
            }
        }

        let mut reasons = Vec::new();
        if !violations.is_empty() {
            let count = |s: Severity| violations.iter().filter(|v| v.severity == s).count();
            reasons.push(format!(
                "violations: critical={} high={} medium={} low={}",
                count(Severity::Critical),
                count(Severity::High),
                count(Severity::Medium),
                count(Severity::Low)
            ));
            for v in &violations {
                reasons.push(format!("[{}] {}: {}", v.severity, v.rule_id, v.message));
            }
        }
        if degraded {
            for (rule_id, count) in &tripped {
                reasons.push(format!(
                    "circuit breaker tripped: rule {} count {} threshold {}",
                    rule_id, count, self.config.breaker_threshold
                ));
            }
            reasons.push("enforcement degraded, every blocking rule has tripped its breaker".to_string());
        }

        info!(
            org_id = %org_id,
            outcome = %outcome,
            degraded,
            rules = stats.rules_attempted,
            real = stats.real_violations,
            synthetic = stats.synthetic_violations,
            "evaluation complete"
        );
        Ok(Decision {
            outcome,
            reasons,
            degraded_mode: degraded,
            stats,
        })
    }
}

/// A block decision built from L0 failures. The failing checks' messages and
/// evidence are carried verbatim; no rule stats exist because no rule ran.
fn l0_block_decision(results: &[L0Result]) -> Decision {
    let mut reasons = Vec::new();
    for r in results.iter().filter(|r| !r.passed) {
        reasons.push(format!("{}: {}", r.invariant_id, r.message));
        if !r.evidence.is_empty() {
            reasons.push(format!(
                "{} evidence: {}",
                r.invariant_id,
                serde_json::to_string(&r.evidence).unwrap_or_default()
            ));
        }
    }
    Decision {
        outcome: Outcome::Block,
        reasons,
        degraded_mode: false,
        stats: EvaluationStats::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{FailingRule, StaticRule};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use warden_breaker::BreakerConfig;
    use warden_calibration::CalibrationConfig;
    use warden_invariants::{ContractionInput, DriftInput};
    use warden_store::{
        KeyValueStore, MemoryConsentStore, MemoryEventStore, MemoryKvStore, StoreError,
        StoreResult,
    };
    use warden_types::{ConsentRecord, FpEvent};

    fn eval_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 23, 14, 30, 0).unwrap()
    }

    fn healthy_input(org_id: &str) -> OracleInput {
        let content = "name: ci\non: push\n".to_string();
        let expected_digest = blake3::hash(content.as_bytes()).to_hex().to_string();
        let now = eval_instant();
        OracleInput {
            l0: L0Input {
                content,
                expected_digest,
                workflow_text: "permissions:\n  contents: read\n".to_string(),
                drift: DriftInput {
                    current: 100.0,
                    baseline: 100.0,
                },
                nonce_issued_at: now - Duration::seconds(60),
                contraction: ContractionInput {
                    previous_fpr: 0.05,
                    current_fpr: 0.05,
                    witnesses: vec![],
                },
                now,
            },
            context: RuleContext {
                org_id: org_id.to_string(),
                repository: "org/repo".to_string(),
                workflow_text: "permissions:\n  contents: read\n".to_string(),
                metadata: Default::default(),
            },
        }
    }

    fn oracle_over(
        kv: Arc<MemoryKvStore>,
        rules: Vec<Arc<dyn PolicyRule>>,
        config: OracleConfig,
    ) -> Oracle {
        Oracle::new(rules, BlockCounter::new(kv, BreakerConfig::default()), config)
    }

    fn oracle(rules: Vec<Arc<dyn PolicyRule>>, config: OracleConfig) -> Oracle {
        oracle_over(Arc::new(MemoryKvStore::new()), rules, config)
    }

    #[tokio::test]
    async fn clean_input_with_no_violations_allows() {
        let oracle = oracle(
            vec![Arc::new(StaticRule::allow_all("WD-001"))],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Allow);
        assert!(decision.reasons.is_empty());
        assert_eq!(decision.stats.rules_attempted, 1);
        assert!(!decision.degraded_mode);
    }

    #[tokio::test]
    async fn l0_failure_blocks_before_any_rule_runs() {
        let oracle = oracle(
            vec![Arc::new(StaticRule::violating(
                "WD-001",
                Severity::Critical,
                "should never be reached",
            ))],
            OracleConfig::default(),
        );
        let mut input = healthy_input("org-a");
        input.l0.workflow_text = "permissions: write-all\n".to_string();

        let decision = oracle.evaluate(&input).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
        // No rule ran, so no rule stats and no rule-sourced reason.
        assert_eq!(decision.stats.rules_attempted, 0);
        assert!(decision.reasons.iter().all(|r| !r.contains("WD-001")));
        assert!(decision.reasons.iter().any(|r| r.starts_with("L0-002:")));
        // Evidence is carried verbatim into the reasons.
        assert!(decision
            .reasons
            .iter()
            .any(|r| r.contains("evidence") && r.contains("write-all")));
    }

    #[tokio::test]
    async fn medium_violation_warns() {
        let oracle = oracle(
            vec![Arc::new(StaticRule::violating(
                "WD-010",
                Severity::Medium,
                "pinned action is out of date",
            ))],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Warn);
        assert_eq!(decision.stats.real_violations, 1);
        assert_eq!(
            decision.reasons[0],
            "violations: critical=0 high=0 medium=1 low=0"
        );
    }

    #[tokio::test]
    async fn critical_violation_blocks() {
        let oracle = oracle(
            vec![Arc::new(StaticRule::violating(
                "WD-002",
                Severity::Critical,
                "secret exfiltration pattern",
            ))],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
    }

    #[tokio::test]
    async fn high_severity_blocks_only_in_strict_mode() {
        let rule =
            || -> Arc<dyn PolicyRule> { Arc::new(StaticRule::violating("WD-003", Severity::High, "untrusted input")) };

        let lenient = oracle(vec![rule()], OracleConfig::default());
        let decision = lenient.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Warn);

        let strict = oracle(
            vec![rule()],
            OracleConfig {
                strict_mode: true,
                ..OracleConfig::default()
            },
        );
        let decision = strict.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
    }

    #[tokio::test]
    async fn failing_rule_becomes_synthetic_critical_and_blocks() {
        let oracle = oracle(
            vec![
                Arc::new(FailingRule::timing_out("WD-004")),
                Arc::new(StaticRule::violating(
                    "WD-005",
                    Severity::Low,
                    "missing timeout on job",
                )),
            ],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
        assert_eq!(decision.stats.rules_attempted, 2);
        assert_eq!(decision.stats.real_violations, 1);
        assert_eq!(decision.stats.synthetic_violations, 1);
        assert!(decision
            .reasons
            .iter()
            .any(|r| r.contains("WD-004") && r.contains("failed during evaluation")));
    }

    #[tokio::test]
    async fn fold_is_deterministic_across_registration_order() {
        let rules = |flip: bool| -> Vec<Arc<dyn PolicyRule>> {
            let a: Arc<dyn PolicyRule> =
                Arc::new(StaticRule::violating("WD-001", Severity::Low, "a"));
            let b: Arc<dyn PolicyRule> =
                Arc::new(StaticRule::violating("WD-002", Severity::Medium, "b"));
            if flip {
                vec![b, a]
            } else {
                vec![a, b]
            }
        };
        let d1 = oracle(rules(false), OracleConfig::default())
            .evaluate(&healthy_input("org-a"))
            .await
            .unwrap();
        let d2 = oracle(rules(true), OracleConfig::default())
            .evaluate(&healthy_input("org-a"))
            .await
            .unwrap();
        assert_eq!(d1.reasons, d2.reasons);
        assert_eq!(d1.outcome, d2.outcome);
    }

    #[tokio::test]
    async fn breaker_downgrades_block_to_warn_in_degraded_mode() {
        let kv = Arc::new(MemoryKvStore::new());
        // Seed the rule's bucket to the threshold ahead of the call.
        let seeder = BlockCounter::new(kv.clone(), BreakerConfig::default());
        for _ in 0..10 {
            seeder
                .increment_at("WD-002", "org-a", eval_instant())
                .await
                .unwrap();
        }

        let oracle = oracle_over(
            kv,
            vec![Arc::new(StaticRule::violating(
                "WD-002",
                Severity::Critical,
                "secret exfiltration pattern",
            ))],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Warn);
        assert!(decision.degraded_mode);
        // The tripped rule's observed count and the threshold travel as
        // evidence: 10 seeded plus this evaluation's own increment.
        assert!(decision
            .reasons
            .iter()
            .any(|r| r.contains("circuit breaker tripped")
                && r.contains("WD-002")
                && r.contains("count 11")
                && r.contains("threshold 10")));
    }

    #[tokio::test]
    async fn degraded_is_failure_keeps_the_block_but_flags_it() {
        let kv = Arc::new(MemoryKvStore::new());
        let seeder = BlockCounter::new(kv.clone(), BreakerConfig::default());
        for _ in 0..10 {
            seeder
                .increment_at("WD-002", "org-a", eval_instant())
                .await
                .unwrap();
        }

        let oracle = oracle_over(
            kv,
            vec![Arc::new(StaticRule::violating(
                "WD-002",
                Severity::Critical,
                "secret exfiltration pattern",
            ))],
            OracleConfig {
                degraded_is_failure: true,
                ..OracleConfig::default()
            },
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
        assert!(decision.degraded_mode);
    }

    #[tokio::test]
    async fn synthetic_criticals_are_never_downgraded() {
        let kv = Arc::new(MemoryKvStore::new());
        let seeder = BlockCounter::new(kv.clone(), BreakerConfig::default());
        for _ in 0..20 {
            seeder
                .increment_at("WD-004", "org-a", eval_instant())
                .await
                .unwrap();
        }

        let oracle = oracle_over(
            kv,
            vec![Arc::new(FailingRule::timing_out("WD-004"))],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
        assert!(!decision.degraded_mode);
    }

    #[tokio::test]
    async fn breaker_isolates_organizations() {
        let kv = Arc::new(MemoryKvStore::new());
        let seeder = BlockCounter::new(kv.clone(), BreakerConfig::default());
        for _ in 0..10 {
            seeder
                .increment_at("WD-002", "org-a", eval_instant())
                .await
                .unwrap();
        }

        // org-b never tripped anything; its blocks stay blocks.
        let oracle = oracle_over(
            kv,
            vec![Arc::new(StaticRule::violating(
                "WD-002",
                Severity::Critical,
                "secret exfiltration pattern",
            ))],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-b")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
        assert!(!decision.degraded_mode);
    }

    async fn calibration_with_high_fpr(rule_id: &str) -> Arc<CalibrationStore> {
        let consent = Arc::new(MemoryConsentStore::new());
        consent
            .grant(ConsentRecord {
                org_id: "org-a".to_string(),
                resource: "calibration".to_string(),
                scope: "fp-events".to_string(),
                granted_at: Utc::now(),
                expires_at: None,
            })
            .unwrap();
        let store = Arc::new(CalibrationStore::new(
            Arc::new(MemoryEventStore::new()),
            consent,
            CalibrationConfig::default(),
        ));
        for i in 0..5 {
            store
                .record_event(
                    "org-a",
                    FpEvent::new(rule_id, "1.0.0", format!("f-{}", i), Outcome::Block, Utc::now()),
                    None,
                )
                .await
                .unwrap();
            store
                .mark_false_positive(&format!("f-{}", i), "alice", None)
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn suppressed_rule_findings_are_filtered() {
        let calibration = calibration_with_high_fpr("WD-010").await;
        let oracle = oracle(
            vec![Arc::new(StaticRule::violating(
                "WD-010",
                Severity::Medium,
                "pinned action is out of date",
            ))],
            OracleConfig::default(),
        )
        .with_calibration(calibration);

        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Allow);
        assert_eq!(decision.stats.real_violations, 0);
    }

    #[tokio::test]
    async fn critical_findings_are_never_suppressed() {
        let calibration = calibration_with_high_fpr("WD-010").await;
        let oracle = oracle(
            vec![Arc::new(StaticRule::violating(
                "WD-010",
                Severity::Critical,
                "secret exfiltration pattern",
            ))],
            OracleConfig::default(),
        )
        .with_calibration(calibration);

        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
    }

    #[tokio::test]
    async fn suppression_lookup_failure_keeps_the_violation() {
        struct FailingEventStore;

        #[async_trait]
        impl warden_store::CalibrationEventStore for FailingEventStore {
            async fn append(&self, _event: FpEvent) -> StoreResult<()> {
                Err(StoreError::Timeout("event store unreachable".into()))
            }
            async fn find_by_finding(&self, _finding_id: &str) -> StoreResult<Option<FpEvent>> {
                Err(StoreError::Timeout("event store unreachable".into()))
            }
            async fn update(&self, _event: FpEvent) -> StoreResult<()> {
                Err(StoreError::Timeout("event store unreachable".into()))
            }
            async fn query_recent(
                &self,
                _rule_id: &str,
                _limit: usize,
            ) -> StoreResult<Vec<FpEvent>> {
                Err(StoreError::Timeout("event store unreachable".into()))
            }
            async fn query_since(
                &self,
                _rule_id: &str,
                _since: DateTime<Utc>,
            ) -> StoreResult<Vec<FpEvent>> {
                Err(StoreError::Timeout("event store unreachable".into()))
            }
        }

        let calibration = Arc::new(CalibrationStore::new(
            Arc::new(FailingEventStore),
            Arc::new(MemoryConsentStore::new()),
            CalibrationConfig::default(),
        ));
        let oracle = oracle(
            vec![Arc::new(StaticRule::violating(
                "WD-010",
                Severity::Medium,
                "pinned action is out of date",
            ))],
            OracleConfig::default(),
        )
        .with_calibration(calibration);

        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Warn);
        assert_eq!(decision.stats.real_violations, 1);
    }

    #[tokio::test]
    async fn breaker_store_failure_aborts_the_call() {
        struct FailingKvStore;

        #[async_trait]
        impl KeyValueStore for FailingKvStore {
            async fn get(&self, _key: &str) -> StoreResult<Option<serde_json::Value>> {
                Err(StoreError::Timeout("kv unreachable".into()))
            }
            async fn put(
                &self,
                _key: &str,
                _value: serde_json::Value,
                _ttl: Option<Duration>,
            ) -> StoreResult<()> {
                Err(StoreError::Timeout("kv unreachable".into()))
            }
            async fn put_if_absent(
                &self,
                _key: &str,
                _value: serde_json::Value,
                _ttl: Option<Duration>,
            ) -> StoreResult<()> {
                Err(StoreError::Timeout("kv unreachable".into()))
            }
            async fn increment(&self, _key: &str, _ttl: Option<Duration>) -> StoreResult<u64> {
                Err(StoreError::Timeout("kv unreachable".into()))
            }
        }

        let oracle = Oracle::new(
            vec![Arc::new(StaticRule::violating(
                "WD-002",
                Severity::Critical,
                "secret exfiltration pattern",
            ))],
            BlockCounter::new(Arc::new(FailingKvStore), BreakerConfig::default()),
            OracleConfig::default(),
        );
        assert!(oracle.evaluate(&healthy_input("org-a")).await.is_err());
    }

    #[tokio::test]
    async fn multiple_violations_are_listed_in_severity_order() {
        let oracle = oracle(
            vec![Arc::new(StaticRule::with_violations(
                "WD-007",
                vec![
                    Violation::new("WD-007", Severity::Low, "low finding"),
                    Violation::new("WD-007", Severity::Critical, "critical finding"),
                    Violation::new("WD-007", Severity::Medium, "medium finding"),
                ],
            ))],
            OracleConfig::default(),
        );
        let decision = oracle.evaluate(&healthy_input("org-a")).await.unwrap();
        assert_eq!(decision.outcome, Outcome::Block);
        assert_eq!(
            decision.reasons[0],
            "violations: critical=1 high=0 medium=1 low=1"
        );
        assert!(decision.reasons[1].starts_with("[critical]"));
        assert!(decision.reasons[2].starts_with("[medium]"));
        assert!(decision.reasons[3].starts_with("[low]"));
    }
}
