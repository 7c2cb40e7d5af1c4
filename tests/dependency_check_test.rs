use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use appd_dependency_check::app::applications_use_case::ApplicationsUseCase;
use appd_dependency_check::app::dashboards_use_case::{DashboardReport, DashboardsUseCase};
use appd_dependency_check::app::health_rules_use_case::HealthRulesUseCase;
use appd_dependency_check::app::ports::ControllerPort;
use appd_dependency_check::config::InternalApplicationsConfig;
use appd_dependency_check::error::CheckError;
use appd_dependency_check::matching::MatchMode;
use appd_dependency_check::model::Application;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Serves canned documents by request path
#[derive(Default)]
struct FakeController {
    documents: HashMap<String, Value>,
    requests: Mutex<Vec<String>>,
}

impl FakeController {
    fn with(mut self, path: &str, document: Value) -> Self {
        self.documents.insert(path.to_string(), document);
        self
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ControllerPort for FakeController {
    async fn get_json(&self, path: &str) -> appd_dependency_check::error::Result<Value> {
        self.requests.lock().unwrap().push(path.to_string());
        self.documents.get(path).cloned().ok_or(CheckError::Api {
            status: 404,
            message: format!("no document for {path}"),
        })
    }

    async fn post_json(&self, path: &str, body: &Value) -> appd_dependency_check::error::Result<Value> {
        self.requests.lock().unwrap().push(path.to_string());
        Ok(body.clone())
    }
}

fn metric_criteria(app_id: i64, path: &str) -> Value {
    json!({ "metricMatchCriteria": {
        "applicationId": app_id,
        "metricExpression": { "inputMetricPath": path }
    }})
}

fn controller() -> FakeController {
    FakeController::default()
        .with(
            "/controller/rest/applications?output=JSON",
            json!([{ "id": 1, "name": "shop" }, { "id": 2, "name": "payments" }]),
        )
        .with(
            "/controller/rest/applications/50?output=JSON",
            json!([{ "id": 50, "name": "Database Monitoring" }]),
        )
        .with(
            "/controller/restui/dashboards/getAllDashboardsByType/false",
            json!([{ "id": 100, "name": "Ops" }, { "id": 200, "name": "Business" }]),
        )
        .with(
            "/controller/restui/dashboards/dashboardIfUpdated/100/-1",
            json!({
                "id": 100,
                "name": "Ops",
                "widgets": [
                    { "id": 1, "title": "Load", "type": "TIMESERIES_GRAPH",
                      "widgetsMetricMatchCriterias": [
                        metric_criteria(1, "Overall Application Performance|Calls per Minute"),
                        metric_criteria(1, "Overall Application Performance|Errors per Minute")
                      ]},
                    { "id": 2, "title": "Events", "type": "LIST",
                      "eventFilter": { "applicationIds": [2] } },
                    { "type": "PIE" }
                ]
            }),
        )
        .with(
            "/controller/restui/dashboards/dashboardIfUpdated/200/-1",
            json!({
                "id": 200,
                "name": "Business",
                "widgets": [
                    { "id": 7, "title": null, "type": "METRIC_LABEL",
                      "widgetsMetricMatchCriterias": [ metric_criteria(2, "Business|Orders per Minute") ] },
                    { "id": 8, "title": "Health", "type": "HEALTH_LIST",
                      "applicationId": 0, "entityType": "APPLICATION", "entityIds": [1, 2] }
                ]
            }),
        )
        .with(
            "/controller/alerting/rest/v1/applications/1/health-rules",
            json!([{ "id": 10, "name": "Errors high" }, { "id": 11, "name": "Broken" }]),
        )
        .with(
            "/controller/alerting/rest/v1/applications/1/health-rules/10",
            json!({
                "id": 10,
                "name": "Errors high",
                "affects": { "affectedEntityType": "OVERALL_APPLICATION_PERFORMANCE" },
                "evalCriterias": {
                    "criticalCriteria": { "conditions": [
                        { "evalDetail": { "evalDetailType": "SINGLE_METRIC",
                                          "metricPath": "Errors per Minute" } }
                    ]},
                    "warningCriteria": { "conditions": [
                        { "evalDetail": { "evalDetailType": "METRIC_EXPRESSION",
                                          "metricExpressionVariables": [ { "metricPath": "Calls per Minute" } ] } }
                    ]}
                }
            }),
        )
        .with(
            "/controller/alerting/rest/v1/applications/1/health-rules/11",
            json!({ "id": 11, "name": "Broken" }),
        )
        .with(
            "/controller/alerting/rest/v1/applications/2/health-rules",
            json!([{ "id": 20, "name": "Checkout IP" }]),
        )
        .with(
            "/controller/alerting/rest/v1/applications/2/health-rules/20",
            json!({
                "id": 20,
                "name": "Checkout IP",
                "affects": {
                    "affectedEntityType": "INFORMATION_POINTS",
                    "affectedInformationPoints": {
                        "informationPointScope": "SPECIFIC_INFORMATION_POINTS",
                        "informationPoints": ["Checkout errors"]
                    }
                },
                "evalCriterias": { "criticalCriteria": null, "warningCriteria": null }
            }),
        )
}

#[tokio::test]
async fn test_resolve_includes_internal_applications() -> Result<()> {
    let fake: Arc<dyn ControllerPort> = Arc::new(controller());
    let internal = InternalApplicationsConfig {
        db_mon_application_id: 50,
        ..Default::default()
    };
    let use_case = ApplicationsUseCase::new(fake, internal);

    let apps = use_case.resolve(&[], &["Database Monitoring".to_string()], false).await?;
    assert_eq!(apps, vec![Application::new(50, "Database Monitoring")]);

    let all = use_case.resolve(&[], &[], true).await?;
    assert_eq!(all.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_resolve_unknown_application_is_fatal() {
    let fake: Arc<dyn ControllerPort> = Arc::new(controller());
    let use_case = ApplicationsUseCase::new(fake, InternalApplicationsConfig::default());

    let err = use_case.resolve(&[42], &[], false).await.unwrap_err();
    assert!(matches!(err, CheckError::NotFound { .. }));
}

#[tokio::test]
async fn test_application_by_id_requires_single_record() {
    let fake = controller().with("/controller/rest/applications/9?output=JSON", json!([]));

    let err = fake.fetch_application_by_id(9).await.unwrap_err();
    assert!(matches!(err, CheckError::NotFound { .. }));
}

#[tokio::test]
async fn test_dashboards_by_application() -> Result<()> {
    let fake: Arc<dyn ControllerPort> = Arc::new(controller());
    let apps = vec![Application::new(1, "shop"), Application::new(2, "payments")];

    let scan = DashboardsUseCase::new(fake).run(&apps, &[], MatchMode::Contains).await?;

    let DashboardReport::ByApplication(reports) = scan.report else {
        panic!("expected per-application report");
    };
    let shop = &reports[0];
    assert_eq!(shop.application.id, 1);
    assert_eq!(shop.dashboards.iter().map(|d| d.id).collect::<Vec<_>>(), vec![100, 200]);
    assert_eq!(shop.dashboards[0].widgets[0].id, 1);
    assert_eq!(shop.dashboards[1].widgets[0].id, 8);

    let payments = &reports[1];
    assert_eq!(payments.dashboards[0].widgets[0].id, 2);
    assert_eq!(
        payments.dashboards[1].widgets.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![7, 8]
    );

    // The id-less PIE widget is reported, not fatal
    assert_eq!(scan.warnings.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_dashboards_by_metric_only() -> Result<()> {
    let fake: Arc<dyn ControllerPort> = Arc::new(controller());
    let metrics = vec!["per minute".to_string(), "Orders".to_string()];

    let scan = DashboardsUseCase::new(fake).run(&[], &metrics, MatchMode::Contains).await?;

    let DashboardReport::ByMetric(dashboards) = scan.report else {
        panic!("expected metric report");
    };
    assert_eq!(dashboards.len(), 2);
    assert_eq!(dashboards[0].widgets[0].metrics, vec!["per minute"]);
    assert_eq!(dashboards[1].widgets[0].metrics, vec!["per minute", "Orders"]);
    Ok(())
}

#[tokio::test]
async fn test_dashboards_without_filters_is_rejected_before_fetching() {
    let fake = Arc::new(controller());
    let port: Arc<dyn ControllerPort> = fake.clone();

    let err = DashboardsUseCase::new(port).run(&[], &[], MatchMode::Exact).await.unwrap_err();

    assert!(matches!(err, CheckError::Config(_)));
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn test_bad_regex_is_isolated_to_its_metric() -> Result<()> {
    let fake: Arc<dyn ControllerPort> = Arc::new(controller());
    let metrics = vec!["Business\\|Orders".to_string(), "(unclosed".to_string()];

    let scan = DashboardsUseCase::new(fake).run(&[], &metrics, MatchMode::Regex).await?;

    let DashboardReport::ByMetric(dashboards) = scan.report else {
        panic!("expected metric report");
    };
    assert_eq!(dashboards.len(), 1);
    assert_eq!(dashboards[0].id, 200);
    assert!(scan
        .warnings
        .iter()
        .any(|w| matches!(w, CheckError::InvalidMatchExpression { pattern, .. } if pattern == "(unclosed")));
    Ok(())
}

#[tokio::test]
async fn test_malformed_dashboard_does_not_hide_others() -> Result<()> {
    let fake: Arc<dyn ControllerPort> = Arc::new(
        FakeController::default()
            .with(
                "/controller/restui/dashboards/getAllDashboardsByType/false",
                json!([{ "id": 1, "name": "Empty" }, { "id": 2, "name": "Hosts" }, { "id": 3, "name": "Nameless" }]),
            )
            .with(
                "/controller/restui/dashboards/dashboardIfUpdated/1/-1",
                json!({ "id": 1, "name": "Empty", "widgets": null }),
            )
            .with(
                "/controller/restui/dashboards/dashboardIfUpdated/2/-1",
                json!({
                    "id": 2,
                    "name": "Hosts",
                    "widgets": [ { "id": 5, "title": "CPU", "type": "PIE",
                                   "widgetsMetricMatchCriterias": [ metric_criteria(1, "Hardware|CPU|%Busy") ] } ]
                }),
            )
            .with(
                "/controller/restui/dashboards/dashboardIfUpdated/3/-1",
                json!({ "id": 3, "widgets": [] }),
            ),
    );

    let scan = DashboardsUseCase::new(fake)
        .run(&[], &["cpu".to_string()], MatchMode::Contains)
        .await?;

    let DashboardReport::ByMetric(dashboards) = scan.report else {
        panic!("expected metric report");
    };
    assert_eq!(dashboards.len(), 1);
    assert_eq!(dashboards[0].id, 2);
    assert_eq!(dashboards[0].widgets[0].metrics, vec!["cpu"]);

    assert_eq!(scan.warnings.len(), 1);
    assert!(matches!(
        &scan.warnings[0],
        CheckError::MalformedRecord { kind: "dashboard", id, .. } if id == "3"
    ));
    Ok(())
}

#[tokio::test]
async fn test_health_rules_report() -> Result<()> {
    let fake: Arc<dyn ControllerPort> = Arc::new(controller());
    let apps = vec![Application::new(1, "shop"), Application::new(2, "payments")];
    let metrics = vec!["errors".to_string()];

    let scan = HealthRulesUseCase::new(fake).run(&apps, &metrics, MatchMode::Contains).await?;
    let report = scan.report;

    assert_eq!(report.matched_application_count(), 2);
    assert_eq!(report.matched_rule_count(), 2);

    let shop_rule = &report.applications[0].rules[0];
    assert_eq!(shop_rule.id, 10);
    assert!(shop_rule.result.critical_criteria);
    assert!(!shop_rule.result.warning_criteria);

    let payments_rule = &report.applications[1].rules[0];
    assert!(payments_rule.result.information_point);

    assert_eq!(report.invalid.len(), 1);
    assert_eq!(report.invalid[0].id, 11);
    Ok(())
}

#[tokio::test]
async fn test_health_rules_require_metrics() {
    let fake: Arc<dyn ControllerPort> = Arc::new(controller());

    let err = HealthRulesUseCase::new(fake)
        .run(&[Application::new(1, "shop")], &[], MatchMode::Contains)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::Config(_)));
}
