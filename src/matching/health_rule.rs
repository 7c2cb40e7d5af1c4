use super::pattern::MetricPattern;
use crate::constants::{AFFECTED_INFORMATION_POINTS, SPECIFIC_INFORMATION_POINTS};
use crate::error::{CheckError, Result};
use crate::model::{Affects, Criteria, HealthRule, MatchResult};

/// Checks which parts of a health rule reference any of `metrics`.
///
/// Fails with `MalformedRecord` when the rule targets information points but
/// does not say which.
pub fn check_health_rule(rule: &HealthRule, metrics: &[MetricPattern]) -> Result<MatchResult> {
    let information_point = information_points_match(rule, &rule.affects, metrics)?;
    let criterias = &rule.eval_criterias;

    Ok(MatchResult {
        critical_criteria: criterias
            .critical_criteria
            .as_ref()
            .is_some_and(|c| criteria_matches(c, metrics)),
        warning_criteria: criterias
            .warning_criteria
            .as_ref()
            .is_some_and(|c| criteria_matches(c, metrics)),
        information_point,
    })
}

fn information_points_match(rule: &HealthRule, affects: &Affects, metrics: &[MetricPattern]) -> Result<bool> {
    if affects.affected_entity_type != AFFECTED_INFORMATION_POINTS {
        return Ok(false);
    }
    let scope = affects.affected_information_points.as_ref().ok_or_else(|| {
        CheckError::malformed(
            "health rule",
            rule.id,
            "affects INFORMATION_POINTS without affectedInformationPoints",
        )
    })?;
    if scope.information_point_scope != SPECIFIC_INFORMATION_POINTS {
        return Ok(false);
    }

    let points = scope.information_points.as_deref().unwrap_or_default();
    Ok(points
        .iter()
        .any(|point| metrics.iter().any(|m| m.is_match(Some(point)))))
}

fn criteria_matches(criteria: &Criteria, metrics: &[MetricPattern]) -> bool {
    criteria.conditions.iter().any(|condition| {
        let paths = condition.eval_detail.metric_paths();
        metrics
            .iter()
            .any(|metric| paths.iter().any(|path| metric.is_match(*path)))
    })
}
