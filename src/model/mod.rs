//! Typed views over the controller's application, dashboard and health-rule documents.
//!
//! Only the fields the matching logic reads are modelled; everything else in the
//! controller payloads is ignored during deserialization.

pub mod application;
pub mod dashboard;
pub mod health_rule;

pub use application::Application;
pub use dashboard::{
    Dashboard, DashboardSummary, EventFilter, HealthListWidget, ListWidget, MetricWidget,
    Widget, WidgetKind, WidgetMetricMatchCriteria,
};
pub use health_rule::{
    Affects, AffectedInformationPoints, Condition, Criteria, EvalCriterias, EvalDetail,
    HealthRule, HealthRuleSummary, MatchResult,
};

/// Best-effort identifier of a raw record, for warnings about records that failed to parse.
pub(crate) fn raw_id(value: &serde_json::Value) -> String {
    match value.get("id") {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => "<unknown>".to_string(),
    }
}
