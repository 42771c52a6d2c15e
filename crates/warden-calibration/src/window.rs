use warden_types::{FpEvent, FpStatistics, FpWindow};

/// Compute windowed statistics over the exact event set, no sampling.
///
/// `observed_fpr = false_positives / (total - pending)`, `0.0` when no
/// reviewed events exist. The false-positive flag only counts on reviewed
/// events: a flag without a reviewer stamp is an unreviewed claim and the
/// event stays pending.
pub fn statistics(events: &[FpEvent]) -> FpStatistics {
    let total = events.len();
    let reviewed = events.iter().filter(|e| e.is_reviewed()).count();
    let pending = total - reviewed;
    let false_positives = events
        .iter()
        .filter(|e| e.is_reviewed() && e.is_false_positive)
        .count();
    let true_positives = reviewed - false_positives;
    let observed_fpr = if reviewed == 0 {
        0.0
    } else {
        false_positives as f64 / reviewed as f64
    };
    FpStatistics {
        total,
        false_positives,
        true_positives,
        pending,
        observed_fpr,
    }
}

/// Assemble the derived window view for a rule. The rule version is taken
/// from the newest event in the window (the adapter returns newest first).
pub fn window_of(rule_id: &str, events: &[FpEvent]) -> FpWindow {
    FpWindow {
        rule_id: rule_id.to_string(),
        rule_version: events
            .first()
            .map(|e| e.rule_version.clone())
            .unwrap_or_default(),
        window_size: events.len(),
        statistics: statistics(events),
    }
}
