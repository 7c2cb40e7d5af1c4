use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::app::ports::ControllerPort;
use crate::error::{CheckError, Result};
use crate::matching::{check_health_rule, MatchMode, MetricPattern};
use crate::model::{Application, HealthRule, HealthRuleSummary};
use crate::report::{HealthRuleAggregator, HealthRuleReport, RuleOutcome};

const OPERATION: &str = "checking health rule criteria";

#[derive(Debug)]
pub struct HealthRuleScan {
    pub report: HealthRuleReport,
    /// Metrics whose match expression was rejected
    pub warnings: Vec<CheckError>,
}

/// Finds health rules whose criteria or information points use the given metrics
pub struct HealthRulesUseCase {
    controller: Arc<dyn ControllerPort>,
}

impl HealthRulesUseCase {
    pub fn new(controller: Arc<dyn ControllerPort>) -> Self {
        Self { controller }
    }

    pub async fn run(
        &self,
        applications: &[Application],
        metrics: &[String],
        mode: MatchMode,
    ) -> Result<HealthRuleScan> {
        if metrics.is_empty() {
            return Err(CheckError::Config(
                "At least one metric is required to check health rules".to_string(),
            ));
        }
        let (patterns, mut warnings) = MetricPattern::compile_all(metrics, mode, OPERATION);
        if patterns.is_empty() {
            return Err(warnings.remove(0));
        }
        for warning in &warnings {
            warn!("{}", warning);
        }

        let mut aggregator = HealthRuleAggregator::new();
        for app in applications {
            let summaries = self.controller.fetch_health_rules(app.id).await?;
            info!(
                "Number of HealthRules for Application {} [{}]: {}",
                app.name,
                app.id,
                summaries.len()
            );

            for summary in &summaries {
                debug!("Load HealthRule {} [{}]", summary.name, summary.id);
                let detail = self
                    .controller
                    .fetch_health_rule_detail(app.id, summary.id)
                    .await?;
                let outcome = evaluate_rule(app, summary, &detail, &patterns);
                aggregator.record(app, summary, outcome);
            }
        }

        Ok(HealthRuleScan {
            report: aggregator.into_report(),
            warnings,
        })
    }
}

/// Validates and matches one health rule document.
///
/// Malformed documents are logged and come back as `Invalid`, never as an error.
pub fn evaluate_rule(
    app: &Application,
    summary: &HealthRuleSummary,
    detail: &Value,
    metrics: &[MetricPattern],
) -> RuleOutcome {
    let checked = HealthRule::from_value(detail).and_then(|rule| check_health_rule(&rule, metrics));
    match checked {
        Ok(result) => RuleOutcome::Matched(result),
        Err(e) => {
            warn!(
                "JSON for healthrule {}:[{}] in application {}[id:{}] is not valid: {}",
                summary.name, summary.id, app.name, app.id, e
            );
            RuleOutcome::Invalid(e.to_string())
        }
    }
}
