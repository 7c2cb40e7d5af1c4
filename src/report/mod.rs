pub mod aggregator;
pub mod render;

pub use aggregator::{
    ApplicationDashboards, ApplicationHealthRules, DashboardAggregator, HealthRuleAggregator,
    HealthRuleReport, InvalidHealthRule, MatchedHealthRule, RuleOutcome, UsedDashboard, UsedWidget,
};
