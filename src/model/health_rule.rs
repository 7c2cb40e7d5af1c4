use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entry of the per-application health rule list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRuleSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRule {
    pub id: i64,
    pub name: String,
    pub affects: Affects,
    pub eval_criterias: EvalCriterias,
}

impl HealthRule {
    /// Parses a health rule detail document.
    ///
    /// `id`, `name`, `affects` and `evalCriterias` must be present and every
    /// criteria object must carry a `conditions` list.
    pub fn from_value(value: &Value) -> Result<Self> {
        for field in ["id", "name", "affects", "evalCriterias"] {
            if value.get(field).map_or(true, Value::is_null) {
                return Err(CheckError::malformed(
                    "health rule",
                    super::raw_id(value),
                    format!("missing field '{field}'"),
                ));
            }
        }
        serde_json::from_value(value.clone())
            .map_err(|e| CheckError::malformed("health rule", super::raw_id(value), e))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affects {
    pub affected_entity_type: String,
    #[serde(default)]
    pub affected_information_points: Option<AffectedInformationPoints>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedInformationPoints {
    pub information_point_scope: String,
    #[serde(default)]
    pub information_points: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalCriterias {
    #[serde(default)]
    pub critical_criteria: Option<Criteria>,
    #[serde(default)]
    pub warning_criteria: Option<Criteria>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Criteria {
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub name: Option<String>,
    pub eval_detail: EvalDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "evalDetailType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvalDetail {
    MetricExpression(MetricExpressionDetail),
    SingleMetric(SingleMetricDetail),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricExpressionDetail {
    #[serde(default)]
    pub metric_expression_variables: Vec<MetricExpressionVariable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricExpressionVariable {
    #[serde(default)]
    pub metric_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleMetricDetail {
    #[serde(default)]
    pub metric_path: Option<String>,
}

impl EvalDetail {
    /// Metric paths referenced by this condition.
    pub fn metric_paths(&self) -> Vec<Option<&str>> {
        match self {
            Self::MetricExpression(detail) => detail
                .metric_expression_variables
                .iter()
                .map(|v| v.metric_path.as_deref())
                .collect(),
            Self::SingleMetric(detail) => vec![detail.metric_path.as_deref()],
            Self::Other => Vec::new(),
        }
    }
}

/// Which parts of a health rule matched the requested metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub critical_criteria: bool,
    pub warning_criteria: bool,
    pub information_point: bool,
}

impl MatchResult {
    pub fn any(&self) -> bool {
        self.critical_criteria || self.warning_criteria || self.information_point
    }
}
