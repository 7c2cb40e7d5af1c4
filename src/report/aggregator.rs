use crate::model::{Application, Dashboard, HealthRuleSummary, MatchResult, Widget};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsedWidget {
    pub id: i64,
    pub title: Option<String>,
    /// Requested metrics this widget matched, in discovery order, without repeats
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsedDashboard {
    pub id: i64,
    pub name: String,
    pub widgets: Vec<UsedWidget>,
}

/// Dashboards that use one application (and optionally the requested metrics)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationDashboards {
    pub application: Application,
    pub dashboards: Vec<UsedDashboard>,
}

/// Folds widget matches into dashboards, keyed by dashboard id and widget id.
#[derive(Debug, Default)]
pub struct DashboardAggregator {
    dashboards: Vec<UsedDashboard>,
}

impl DashboardAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, dashboard: &Dashboard, widget: &Widget, metric: Option<&str>) {
        let existing = self.dashboards.iter().position(|d| d.id == dashboard.id);
        let position = match existing {
            Some(position) => position,
            None => {
                self.dashboards.push(UsedDashboard {
                    id: dashboard.id,
                    name: dashboard.name.clone(),
                    widgets: Vec::new(),
                });
                self.dashboards.len() - 1
            }
        };
        let widgets = &mut self.dashboards[position].widgets;

        let existing = widgets.iter().position(|w| w.id == widget.id);
        let used_widget = match existing {
            Some(index) => &mut widgets[index],
            None => {
                widgets.push(UsedWidget {
                    id: widget.id,
                    title: widget.title.clone(),
                    metrics: Vec::new(),
                });
                let last = widgets.len() - 1;
                &mut widgets[last]
            }
        };

        if let Some(metric) = metric {
            if !used_widget.metrics.iter().any(|m| m == metric) {
                used_widget.metrics.push(metric.to_string());
            }
        }
    }

    pub fn into_dashboards(self) -> Vec<UsedDashboard> {
        self.dashboards
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedHealthRule {
    pub id: i64,
    pub name: String,
    pub result: MatchResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidHealthRule {
    pub application: Application,
    pub id: i64,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationHealthRules {
    pub application: Application,
    pub rules: Vec<MatchedHealthRule>,
}

/// How a single health rule came out of the scan
#[derive(Debug, Clone)]
pub enum RuleOutcome {
    Matched(MatchResult),
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthRuleReport {
    /// Applications with at least one matched rule, in scan order
    pub applications: Vec<ApplicationHealthRules>,
    pub invalid: Vec<InvalidHealthRule>,
}

impl HealthRuleReport {
    pub fn matched_rule_count(&self) -> usize {
        self.applications.iter().map(|a| a.rules.len()).sum()
    }

    pub fn matched_application_count(&self) -> usize {
        self.applications.len()
    }
}

/// Groups matched health rules under their application.
#[derive(Debug, Default)]
pub struct HealthRuleAggregator {
    report: HealthRuleReport,
}

impl HealthRuleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, application: &Application, rule: &HealthRuleSummary, outcome: RuleOutcome) {
        match outcome {
            RuleOutcome::Invalid(reason) => self.report.invalid.push(InvalidHealthRule {
                application: application.clone(),
                id: rule.id,
                name: rule.name.clone(),
                reason,
            }),
            RuleOutcome::Matched(result) if result.any() => {
                let applications = &mut self.report.applications;
                let existing = applications
                    .iter()
                    .position(|a| a.application.id == application.id);
                let entry = match existing {
                    Some(index) => &mut applications[index],
                    None => {
                        applications.push(ApplicationHealthRules {
                            application: application.clone(),
                            rules: Vec::new(),
                        });
                        let last = applications.len() - 1;
                        &mut applications[last]
                    }
                };
                if !entry.rules.iter().any(|r| r.id == rule.id) {
                    entry.rules.push(MatchedHealthRule {
                        id: rule.id,
                        name: rule.name.clone(),
                        result,
                    });
                }
            }
            RuleOutcome::Matched(_) => {}
        }
    }

    pub fn into_report(self) -> HealthRuleReport {
        self.report
    }
}
