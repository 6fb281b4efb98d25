//! Desired-vs-observed comparison.
//!
//! Both sides are serialized to JSON with the GCP API models. Desired is a
//! subset of observed when every field it sets is present in observed with
//! an equal value; fields it leaves unset are ignored. Arrays compare whole.

use serde::Serialize;
use serde_json::Value;

/// Whether every value set in `desired` matches `observed`
pub fn is_subset(desired: &Value, observed: &Value) -> bool {
    match (desired, observed) {
        (Value::Null, _) => true,
        (Value::Object(d), Value::Object(o)) => d
            .iter()
            .all(|(k, dv)| dv.is_null() || o.get(k).is_some_and(|ov| is_subset(dv, ov))),
        _ => desired == observed,
    }
}

/// Serialize both values and compare with [`is_subset`]
pub fn desired_matches_observed<D, O>(desired: &D, observed: &O) -> bool
where
    D: Serialize,
    O: Serialize,
{
    // Plain data models always serialize.
    match (serde_json::to_value(desired), serde_json::to_value(observed)) {
        (Ok(d), Ok(o)) => is_subset(&d, &o),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_fields_ignored() {
        let desired = json!({ "settings": { "tier": "db-1" } });
        let observed = json!({ "settings": { "tier": "db-1", "pricingPlan": "PER_USE" }, "state": "RUNNABLE" });
        assert!(is_subset(&desired, &observed));
    }

    #[test]
    fn test_drift_detected() {
        let desired = json!({ "settings": { "tier": "db-2" } });
        let observed = json!({ "settings": { "tier": "db-1" } });
        assert!(!is_subset(&desired, &observed));
    }

    #[test]
    fn test_missing_in_observed_is_drift() {
        let desired = json!({ "description": "main" });
        assert!(!is_subset(&desired, &json!({})));
    }

    #[test]
    fn test_arrays_compare_whole() {
        let desired = json!({ "flags": [{ "name": "a" }] });
        let observed = json!({ "flags": [{ "name": "a" }, { "name": "b" }] });
        assert!(!is_subset(&desired, &observed));
    }
}
