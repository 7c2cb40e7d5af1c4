use super::aggregator::{ApplicationDashboards, HealthRuleReport, UsedDashboard};
use std::fmt::Write;

pub fn render_application_dashboards(reports: &[ApplicationDashboards], metrics: &[String]) -> String {
    let mut out = String::new();
    for report in reports {
        let app = &report.application;
        if metrics.is_empty() {
            let _ = writeln!(
                out,
                "Application {} [{}] is used in {} Dashboards",
                app.name,
                app.id,
                report.dashboards.len()
            );
        } else {
            let _ = writeln!(
                out,
                "Application {} [{}] and Metrics {:?} are used in {} Dashboards",
                app.name,
                app.id,
                metrics,
                report.dashboards.len()
            );
        }
        write_dashboards(&mut out, &report.dashboards);
    }
    out
}

pub fn render_metric_dashboards(dashboards: &[UsedDashboard], metrics: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Metrics {:?} are used in {} Dashboards",
        metrics,
        dashboards.len()
    );
    write_dashboards(&mut out, dashboards);
    out
}

pub fn render_health_rules(report: &HealthRuleReport, metrics: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Metrics {:?} are used in {} Healthrules across {} Applications",
        metrics,
        report.matched_rule_count(),
        report.matched_application_count()
    );
    for entry in &report.applications {
        let _ = writeln!(
            out,
            "\tApplication: {} [{}]",
            entry.application.name, entry.application.id
        );
        for rule in &entry.rules {
            let flags = [
                (rule.result.critical_criteria, "CriticalCriteria"),
                (rule.result.warning_criteria, "WarningCriteria"),
                (rule.result.information_point, "InformationPoint"),
            ];
            for (_, label) in flags.iter().filter(|(hit, _)| *hit) {
                let _ = writeln!(out, "\t\tHealthrule: {} [{}], {}", rule.name, rule.id, label);
            }
        }
    }
    out
}

pub fn render_warnings(warnings: &[String]) -> String {
    let mut out = String::new();
    if warnings.is_empty() {
        return out;
    }
    let _ = writeln!(out, "Warnings ({}):", warnings.len());
    for warning in warnings {
        let _ = writeln!(out, "\t{warning}");
    }
    out
}

fn write_dashboards(out: &mut String, dashboards: &[UsedDashboard]) {
    for dashboard in dashboards {
        let _ = writeln!(out, "\tDashboard: {} [{}]", dashboard.name, dashboard.id);
        for widget in &dashboard.widgets {
            let title = widget.title.as_deref().unwrap_or("no title");
            let _ = writeln!(out, "\t\tWidget: {} [{}]", title, widget.id);
            for metric in &widget.metrics {
                let _ = writeln!(out, "\t\t\tMetric: {metric}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Application, MatchResult};
    use crate::report::aggregator::{ApplicationHealthRules, MatchedHealthRule, UsedWidget};

    fn used_dashboard() -> UsedDashboard {
        UsedDashboard {
            id: 4,
            name: "Ops".to_string(),
            widgets: vec![UsedWidget {
                id: 9,
                title: None,
                metrics: vec!["calls".to_string()],
            }],
        }
    }

    #[test]
    fn test_metric_dashboards_layout() {
        let out = render_metric_dashboards(&[used_dashboard()], &["calls".to_string()]);

        assert_eq!(
            out,
            "Metrics [\"calls\"] are used in 1 Dashboards\n\tDashboard: Ops [4]\n\t\tWidget: no title [9]\n\t\t\tMetric: calls\n"
        );
    }

    #[test]
    fn test_application_dashboards_without_metrics() {
        let reports = vec![ApplicationDashboards {
            application: Application::new(7, "shop"),
            dashboards: Vec::new(),
        }];

        let out = render_application_dashboards(&reports, &[]);
        assert_eq!(out, "Application shop [7] is used in 0 Dashboards\n");
    }

    #[test]
    fn test_health_rules_list_each_triggered_flag() {
        let report = HealthRuleReport {
            applications: vec![ApplicationHealthRules {
                application: Application::new(1, "shop"),
                rules: vec![MatchedHealthRule {
                    id: 3,
                    name: "Slow".to_string(),
                    result: MatchResult {
                        critical_criteria: true,
                        warning_criteria: false,
                        information_point: true,
                    },
                }],
            }],
            invalid: Vec::new(),
        };

        let out = render_health_rules(&report, &["rt".to_string()]);
        assert!(out.contains("\t\tHealthrule: Slow [3], CriticalCriteria\n"));
        assert!(out.contains("\t\tHealthrule: Slow [3], InformationPoint\n"));
        assert!(!out.contains("WarningCriteria"));
    }

    #[test]
    fn test_no_warnings_renders_nothing() {
        assert!(render_warnings(&[]).is_empty());
    }
}
