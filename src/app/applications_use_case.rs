use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::app::ports::ControllerPort;
use crate::config::InternalApplicationsConfig;
use crate::error::{CheckError, Result};
use crate::model::Application;

/// Resolves the applications a command should check
pub struct ApplicationsUseCase {
    controller: Arc<dyn ControllerPort>,
    internal: InternalApplicationsConfig,
}

impl ApplicationsUseCase {
    pub fn new(controller: Arc<dyn ControllerPort>, internal: InternalApplicationsConfig) -> Self {
        Self {
            controller,
            internal,
        }
    }

    /// All applications, including the configured internal ones.
    pub async fn load_all(&self) -> Result<Vec<Application>> {
        let mut apps = self.controller.fetch_applications().await?;
        info!("Number of Apps: {}", apps.len());

        for id in self.internal.configured_ids() {
            let app = self.controller.fetch_application_by_id(id).await?;
            debug!("Loaded internal application {} [{}]", app.name, app.id);
            apps.push(app);
        }
        Ok(apps)
    }

    pub async fn resolve(&self, ids: &[i64], names: &[String], fallback_all: bool) -> Result<Vec<Application>> {
        let available = self.load_all().await?;
        select_applications(&available, ids, names, fallback_all)
    }
}

/// Picks the requested applications out of `available`, ids first, then names.
///
/// Any id or name that is not available is `NotFound`. Duplicates collapse to
/// their first occurrence. With nothing requested, returns every application
/// when `fallback_all` is set and nothing otherwise.
pub fn select_applications(
    available: &[Application],
    ids: &[i64],
    names: &[String],
    fallback_all: bool,
) -> Result<Vec<Application>> {
    if ids.is_empty() && names.is_empty() {
        return Ok(if fallback_all {
            available.to_vec()
        } else {
            Vec::new()
        });
    }

    let mut selected = Vec::with_capacity(ids.len() + names.len());

    if !ids.is_empty() {
        info!("Checking Application Ids {:?}", ids);
        for id in ids {
            let app = available
                .iter()
                .find(|a| a.id == *id)
                .ok_or_else(|| CheckError::not_found("Application Id", id))?;
            selected.push(app.clone());
        }
    }

    if !names.is_empty() {
        info!("Checking Application Names {:?}", names);
        for name in names {
            let app = available
                .iter()
                .find(|a| a.name == *name)
                .ok_or_else(|| CheckError::not_found("Application Name", name))?;
            selected.push(app.clone());
        }
    }

    let mut seen = HashSet::new();
    selected.retain(|app| seen.insert(app.id));
    Ok(selected)
}
