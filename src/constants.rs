/// Controller endpoints and well-known field values shared across the crate

// REST paths (relative to the controller url)
pub const APPLICATIONS_PATH: &str = "/controller/rest/applications?output=JSON";
pub const DASHBOARD_LIST_PATH: &str = "/controller/restui/dashboards/getAllDashboardsByType/false";
pub const TOKEN_PATH: &str = "/controller/api/oauth/access_token";
pub const TOKEN_CONTENT_TYPE: &str = "application/vnd.appd.cntrl+protobuf;v=1";

// Marker the controller puts in a 401 body when a bearer token has expired
pub const INVALID_TOKEN_MARKER: &str = "invalid access token";

// Health rule and widget field values
pub const ENTITY_TYPE_APPLICATION: &str = "APPLICATION";
pub const AFFECTED_INFORMATION_POINTS: &str = "INFORMATION_POINTS";
pub const SPECIFIC_INFORMATION_POINTS: &str = "SPECIFIC_INFORMATION_POINTS";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn application_path(id: i64) -> String {
    format!("/controller/rest/applications/{id}?output=JSON")
}

pub fn dashboard_detail_path(id: i64) -> String {
    format!("/controller/restui/dashboards/dashboardIfUpdated/{id}/-1")
}

pub fn health_rules_path(app_id: i64) -> String {
    format!("/controller/alerting/rest/v1/applications/{app_id}/health-rules")
}

pub fn health_rule_detail_path(app_id: i64, rule_id: i64) -> String {
    format!("{}/{rule_id}", health_rules_path(app_id))
}
