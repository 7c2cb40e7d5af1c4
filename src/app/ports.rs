use crate::constants;
use crate::error::{CheckError, Result};
use crate::model::{Application, DashboardSummary, HealthRuleSummary};
use async_trait::async_trait;
use serde_json::Value;

/// Read access to the controller REST API.
///
/// Implementors only provide the two verbs; the typed fetches are built on top.
#[async_trait]
pub trait ControllerPort: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value>;

    async fn fetch_applications(&self) -> Result<Vec<Application>> {
        let data = self.get_json(constants::APPLICATIONS_PATH).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fails with `NotFound` unless the controller returns exactly one record.
    async fn fetch_application_by_id(&self, id: i64) -> Result<Application> {
        let data = self.get_json(&constants::application_path(id)).await?;
        let mut apps: Vec<Application> = serde_json::from_value(data)?;
        if apps.len() != 1 {
            return Err(CheckError::not_found("Application Id", id));
        }
        Ok(apps.remove(0))
    }

    async fn fetch_dashboard_list(&self) -> Result<Vec<DashboardSummary>> {
        let data = self.get_json(constants::DASHBOARD_LIST_PATH).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Raw document; validity is judged by `Dashboard::from_value`.
    async fn fetch_dashboard_detail(&self, id: i64) -> Result<Value> {
        self.get_json(&constants::dashboard_detail_path(id)).await
    }

    async fn fetch_health_rules(&self, app_id: i64) -> Result<Vec<HealthRuleSummary>> {
        let data = self.get_json(&constants::health_rules_path(app_id)).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Raw document; validity is judged by `HealthRule::from_value`.
    async fn fetch_health_rule_detail(&self, app_id: i64, rule_id: i64) -> Result<Value> {
        self.get_json(&constants::health_rule_detail_path(app_id, rule_id))
            .await
    }
}
