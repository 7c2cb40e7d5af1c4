use super::pattern::{matches_pattern, MetricPattern};
use crate::constants::ENTITY_TYPE_APPLICATION;
use crate::model::{HealthListWidget, ListWidget, MetricWidget, Widget, WidgetKind};

/// Whether `widget` uses the application `app_id` and/or the metric `metric`.
///
/// `None` for either filter means "not filtered on". Health and event list
/// widgets carry no metric criteria, so they only match on an application
/// filter with no metric filter.
pub fn is_widget_used(widget: &Widget, app_id: Option<i64>, metric: Option<&MetricPattern>) -> bool {
    if let Some(w) = widget.kind.metric_widget() {
        return metric_widget_used(w, app_id, metric);
    }
    match &widget.kind {
        WidgetKind::HealthList(w) => match (metric, app_id) {
            (None, Some(app_id)) => health_widget_used(w, app_id),
            _ => false,
        },
        WidgetKind::List(w) => match (metric, app_id) {
            (None, Some(app_id)) => event_widget_used(w, app_id),
            _ => false,
        },
        _ => false,
    }
}

/// Every requested metric the widget uses, in request order.
///
/// Each metric is tested on its own so a widget that charts several of the
/// requested metrics reports all of them.
pub fn widget_matched_metrics<'a>(
    widget: &Widget,
    app_id: Option<i64>,
    metrics: &'a [MetricPattern],
) -> Vec<&'a str> {
    metrics
        .iter()
        .filter(|metric| is_widget_used(widget, app_id, Some(*metric)))
        .map(MetricPattern::target)
        .collect()
}

fn metric_widget_used(widget: &MetricWidget, app_id: Option<i64>, metric: Option<&MetricPattern>) -> bool {
    let Some(criterias) = &widget.widgets_metric_match_criterias else {
        return false;
    };

    let mut matching = criterias
        .iter()
        .filter(|criteria| matches_pattern(criteria.metric_path(), metric));

    match app_id {
        Some(app_id) => matching.any(|criteria| criteria.application_id() == Some(app_id)),
        None => matching.next().is_some(),
    }
}

fn health_widget_used(widget: &HealthListWidget, app_id: i64) -> bool {
    match widget.application_id.unwrap_or(0) {
        0 => {
            widget.entity_type.as_deref() == Some(ENTITY_TYPE_APPLICATION)
                && widget
                    .entity_ids
                    .as_ref()
                    .is_some_and(|ids| ids.contains(&app_id))
        }
        bound => bound == app_id,
    }
}

fn event_widget_used(widget: &ListWidget, app_id: i64) -> bool {
    widget
        .event_filter
        .as_ref()
        .and_then(|filter| filter.application_ids.as_ref())
        .is_some_and(|ids| ids.contains(&app_id))
}
