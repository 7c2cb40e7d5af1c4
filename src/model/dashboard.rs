use crate::error::{CheckError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Entry of the dashboard list endpoint; the widget tree needs a detail fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub id: i64,
    pub name: String,
}

/// A dashboard with its widget tree.
///
/// Widgets are kept raw so that one malformed widget can be reported and skipped
/// without losing the rest of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub widgets: Vec<Value>,
}

impl Dashboard {
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| CheckError::malformed("dashboard", super::raw_id(value), e))
    }

    /// Typed widgets in declaration order.
    pub fn widgets(&self) -> impl Iterator<Item = Result<Widget>> + '_ {
        self.widgets.iter().map(Widget::from_value)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Widget {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

impl Widget {
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| CheckError::malformed("widget", super::raw_id(value), e))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetKind {
    TimeseriesGraph(MetricWidget),
    Pie(MetricWidget),
    Gauge(MetricWidget),
    MetricLabel(MetricWidget),
    HealthList(HealthListWidget),
    List(ListWidget),
    #[serde(other)]
    Other,
}

impl WidgetKind {
    /// Criteria of the metric-bearing widget types.
    pub fn metric_widget(&self) -> Option<&MetricWidget> {
        match self {
            Self::TimeseriesGraph(w) | Self::Pie(w) | Self::Gauge(w) | Self::MetricLabel(w) => {
                Some(w)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWidget {
    #[serde(default)]
    pub widgets_metric_match_criterias: Option<Vec<WidgetMetricMatchCriteria>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMetricMatchCriteria {
    #[serde(default)]
    pub metric_match_criteria: Option<MetricMatchCriteria>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricMatchCriteria {
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub metric_expression: Option<MetricExpression>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricExpression {
    #[serde(default)]
    pub input_metric_path: Option<String>,
}

impl WidgetMetricMatchCriteria {
    pub fn new(application_id: i64, metric_path: Option<&str>) -> Self {
        Self {
            metric_match_criteria: Some(MetricMatchCriteria {
                application_id: Some(application_id),
                metric_expression: Some(MetricExpression {
                    input_metric_path: metric_path.map(str::to_string),
                }),
            }),
        }
    }

    pub fn application_id(&self) -> Option<i64> {
        self.metric_match_criteria.as_ref()?.application_id
    }

    pub fn metric_path(&self) -> Option<&str> {
        self.metric_match_criteria
            .as_ref()?
            .metric_expression
            .as_ref()?
            .input_metric_path
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthListWidget {
    /// 0 or absent means the widget targets entities rather than one application
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWidget {
    #[serde(default)]
    pub event_filter: Option<EventFilter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    #[serde(default)]
    pub application_ids: Option<Vec<i64>>,
}
