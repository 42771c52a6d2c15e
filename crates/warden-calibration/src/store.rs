use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::CalibrationError;
use crate::window::window_of;
use warden_store::{CalibrationEventStore, ConsentStore, StoreError};
use warden_trust::{BindingStatus, NonceBindingProtocol};
use warden_types::{FpEvent, FpWindow};

/// A submission's claim to an active nonce binding.
#[derive(Clone, Debug)]
pub struct BindingClaim {
    pub nonce: String,
}

/// Configuration for calibration ingestion and suppression lookups.
#[derive(Clone, Debug)]
pub struct CalibrationConfig {
    /// Consent resource consulted before persisting org-referencing events.
    pub consent_resource: String,
    /// Consent scope consulted alongside the resource.
    pub consent_scope: String,
    /// Window size used by suppression lookups.
    pub suppression_window: usize,
    /// Minimum reviewed events before a rule can be suppressed.
    pub suppression_min_reviewed: usize,
    /// Observed FPR at or above which a rule's findings are suppressed.
    pub suppression_fpr: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            consent_resource: "calibration".to_string(),
            consent_scope: "fp-events".to_string(),
            suppression_window: 50,
            suppression_min_reviewed: 5,
            suppression_fpr: 0.8,
        }
    }
}

/// The false-positive calibration store.
pub struct CalibrationStore {
    events: Arc<dyn CalibrationEventStore>,
    consent: Arc<dyn ConsentStore>,
    trust: Option<Arc<NonceBindingProtocol>>,
    config: CalibrationConfig,
}

impl CalibrationStore {
    pub fn new(
        events: Arc<dyn CalibrationEventStore>,
        consent: Arc<dyn ConsentStore>,
        config: CalibrationConfig,
    ) -> Self {
        Self {
            events,
            consent,
            trust: None,
            config,
        }
    }

    /// Attach the trust protocol used to verify nonce-binding claims.
    pub fn with_trust(mut self, trust: Arc<NonceBindingProtocol>) -> Self {
        self.trust = Some(trust);
        self
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Record one rule outcome for an organization.
    ///
    /// Submitted events must arrive unreviewed: review state only ever
    /// enters through [`Self::mark_false_positive`], so an event carrying a
    /// false-positive flag or reviewer stamp is rejected up front. Consent
    /// is checked next; absence (or a failed consent lookup) is a hard
    /// rejection. A nonce-binding claim, when present, must verify as
    /// `Valid` before the event is persisted — any non-valid result rejects
    /// the submission. Duplicate `(rule_id, timestamp, event_id)` appends
    /// are rejected at the adapter.
    pub async fn record_event(
        &self,
        org_id: &str,
        event: FpEvent,
        claim: Option<BindingClaim>,
    ) -> Result<(), CalibrationError> {
        if event.is_false_positive || event.reviewed_by.is_some() || event.reviewed_at.is_some() {
            warn!(org_id, rule_id = %event.rule_id, "calibration event rejected: pre-reviewed");
            return Err(CalibrationError::InvalidEvent(
                "submitted event already carries review state".to_string(),
            ));
        }

        let consented = self
            .consent
            .has_valid_consent(org_id, &self.config.consent_resource, &self.config.consent_scope)
            .await?;
        if !consented {
            warn!(org_id, rule_id = %event.rule_id, "calibration event rejected: no consent");
            return Err(CalibrationError::ConsentDenied {
                org_id: org_id.to_string(),
                resource: self.config.consent_resource.clone(),
            });
        }

        if let Some(claim) = claim {
            let Some(trust) = &self.trust else {
                return Err(CalibrationError::BindingRejected(
                    "no trust protocol configured to verify binding claim".to_string(),
                ));
            };
            match trust.verify_binding(&claim.nonce, org_id).await? {
                BindingStatus::Valid(_) => {}
                BindingStatus::Invalid { reason } => {
                    warn!(org_id, %reason, "calibration event rejected: binding invalid");
                    return Err(CalibrationError::BindingRejected(reason));
                }
            }
        }

        let key = event.storage_key();
        self.events.append(event).await.map_err(|e| match e {
            StoreError::Conflict(_) => CalibrationError::DuplicateEvent(key),
            other => CalibrationError::Store(other),
        })?;
        debug!(org_id, "calibration event recorded");
        Ok(())
    }

    /// Mark a finding's event as a confirmed false positive.
    ///
    /// Resolves the finding through the secondary index and stamps reviewer
    /// and review time exactly once. Fails loudly when the finding does not
    /// exist or was already reviewed — never a silent no-op.
    pub async fn mark_false_positive(
        &self,
        finding_id: &str,
        reviewed_by: &str,
        ticket: Option<&str>,
    ) -> Result<FpEvent, CalibrationError> {
        let mut event = self
            .events
            .find_by_finding(finding_id)
            .await?
            .ok_or_else(|| CalibrationError::FindingNotFound(finding_id.to_string()))?;

        if event.is_reviewed() {
            return Err(CalibrationError::AlreadyReviewed(finding_id.to_string()));
        }

        event.is_false_positive = true;
        event.reviewed_by = Some(reviewed_by.to_string());
        event.reviewed_at = Some(Utc::now());
        if let Some(ticket) = ticket {
            event
                .context
                .insert("review_ticket".to_string(), serde_json::json!(ticket));
        }

        self.events.update(event.clone()).await?;
        info!(finding_id, reviewed_by, rule_id = %event.rule_id, "finding marked false positive");
        Ok(event)
    }

    /// Statistics over the `n` most recent events for a rule.
    pub async fn window_by_count(
        &self,
        rule_id: &str,
        n: usize,
    ) -> Result<FpWindow, CalibrationError> {
        let events = self.events.query_recent(rule_id, n).await?;
        Ok(window_of(rule_id, &events))
    }

    /// Statistics over all events for a rule at or after `since`.
    pub async fn window_by_since(
        &self,
        rule_id: &str,
        since: DateTime<Utc>,
    ) -> Result<FpWindow, CalibrationError> {
        let events = self.events.query_since(rule_id, since).await?;
        Ok(window_of(rule_id, &events))
    }

    /// Suppression lookup for the decision engine: a rule is suppressed when
    /// enough of its recent findings were reviewed and the observed FPR is
    /// at or above the configured bar. Errors propagate; callers must treat
    /// a failed lookup as "not suppressed" — suppression only ever relaxes
    /// enforcement.
    pub async fn is_suppressed(&self, rule_id: &str) -> Result<bool, CalibrationError> {
        let window = self
            .window_by_count(rule_id, self.config.suppression_window)
            .await?;
        let stats = window.statistics;
        let reviewed = stats.total - stats.pending;
        Ok(reviewed >= self.config.suppression_min_reviewed
            && stats.observed_fpr >= self.config.suppression_fpr)
    }
}
