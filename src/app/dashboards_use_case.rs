use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::ports::ControllerPort;
use crate::error::{CheckError, Result};
use crate::matching::{is_widget_used, widget_matched_metrics, MatchMode, MetricPattern};
use crate::model::{Application, Dashboard, Widget};
use crate::report::{ApplicationDashboards, DashboardAggregator, UsedDashboard};

const OPERATION: &str = "scanning dashboard widgets";

/// A dashboard whose widgets have been parsed; widgets that failed to parse are dropped.
#[derive(Debug, Clone)]
pub struct ParsedDashboard {
    pub dashboard: Dashboard,
    pub widgets: Vec<Widget>,
}

#[derive(Debug)]
pub enum DashboardReport {
    /// One entry per requested application
    ByApplication(Vec<ApplicationDashboards>),
    /// No application filter, dashboards using any of the metrics
    ByMetric(Vec<UsedDashboard>),
}

#[derive(Debug)]
pub struct DashboardScan {
    pub report: DashboardReport,
    /// Non-fatal problems: malformed dashboards or widgets, metrics with invalid expressions
    pub warnings: Vec<CheckError>,
}

/// Finds dashboards that use the given applications and/or metrics
pub struct DashboardsUseCase {
    controller: Arc<dyn ControllerPort>,
}

impl DashboardsUseCase {
    pub fn new(controller: Arc<dyn ControllerPort>) -> Self {
        Self { controller }
    }

    /// Fetches every dashboard detail; malformed dashboards are moved into `warnings`.
    pub async fn load_dashboards(&self, warnings: &mut Vec<CheckError>) -> Result<Vec<Dashboard>> {
        let summaries = self.controller.fetch_dashboard_list().await?;
        info!("Number of Dashboards: {}", summaries.len());

        let total = summaries.len();
        let mut dashboards = Vec::with_capacity(total);
        for (i, summary) in summaries.iter().enumerate() {
            debug!("Dashboard [{}/{}][{}] - Load Dashboard details", i + 1, total, summary.name);
            let raw = self.controller.fetch_dashboard_detail(summary.id).await?;
            match Dashboard::from_value(&raw) {
                Ok(dashboard) => dashboards.push(dashboard),
                Err(e) if e.is_per_item() => {
                    warn!("Dashboard {} [{}]: {}", summary.name, summary.id, e);
                    warnings.push(e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(dashboards)
    }

    pub async fn run(
        &self,
        applications: &[Application],
        metrics: &[String],
        mode: MatchMode,
    ) -> Result<DashboardScan> {
        if applications.is_empty() && metrics.is_empty() {
            return Err(CheckError::Config(
                "Neither application, nor metrics is set".to_string(),
            ));
        }

        let (patterns, mut warnings) = MetricPattern::compile_all(metrics, mode, OPERATION);
        if !metrics.is_empty() && patterns.is_empty() {
            // Every requested metric was rejected; an unfiltered scan would be misleading
            return Err(warnings.remove(0));
        }
        for warning in &warnings {
            warn!("{}", warning);
        }

        let loaded = self.load_dashboards(&mut warnings).await?;
        let dashboards = parse_dashboards(loaded, &mut warnings)?;

        let report = if applications.is_empty() {
            info!("Check Dashboards for Metrics");
            DashboardReport::ByMetric(find_used_dashboards(&dashboards, None, &patterns))
        } else {
            let reports = applications
                .iter()
                .map(|app| {
                    info!("Check Dashboards for Application {} [{}]", app.name, app.id);
                    ApplicationDashboards {
                        application: app.clone(),
                        dashboards: find_used_dashboards(&dashboards, Some(app.id), &patterns),
                    }
                })
                .collect();
            DashboardReport::ByApplication(reports)
        };

        Ok(DashboardScan { report, warnings })
    }
}

/// Parses every dashboard's widgets, moving per-widget failures into `warnings`.
pub fn parse_dashboards(
    dashboards: Vec<Dashboard>,
    warnings: &mut Vec<CheckError>,
) -> Result<Vec<ParsedDashboard>> {
    let mut parsed_dashboards = Vec::with_capacity(dashboards.len());
    for dashboard in dashboards {
        let mut widgets = Vec::with_capacity(dashboard.widgets.len());
        for parsed in dashboard.widgets() {
            match parsed {
                Ok(widget) => widgets.push(widget),
                Err(e) if e.is_per_item() => {
                    warn!("Dashboard {} [{}]: {}", dashboard.name, dashboard.id, e);
                    warnings.push(e);
                }
                Err(e) => return Err(e),
            }
        }
        parsed_dashboards.push(ParsedDashboard { dashboard, widgets });
    }
    Ok(parsed_dashboards)
}

/// Dashboards with at least one widget using `app_id` and/or any of `metrics`.
///
/// An empty `metrics` slice means no metric filter.
pub fn find_used_dashboards(
    dashboards: &[ParsedDashboard],
    app_id: Option<i64>,
    metrics: &[MetricPattern],
) -> Vec<UsedDashboard> {
    let mut aggregator = DashboardAggregator::new();
    let total = dashboards.len();

    for (i, parsed) in dashboards.iter().enumerate() {
        let dashboard = &parsed.dashboard;
        debug!("Dashboard [{}/{}][{}] - Check Dashboard", i + 1, total, dashboard.name);

        for widget in &parsed.widgets {
            if metrics.is_empty() {
                if is_widget_used(widget, app_id, None) {
                    aggregator.record(dashboard, widget, None);
                }
            } else {
                for metric in widget_matched_metrics(widget, app_id, metrics) {
                    aggregator.record(dashboard, widget, Some(metric));
                }
            }
        }
    }

    aggregator.into_dashboards()
}
