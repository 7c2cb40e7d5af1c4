//! Decides whether dashboard widgets and health rules use given applications and metrics.
//!
//! Everything here is pure: it works on documents already fetched from the
//! controller and never performs I/O.

pub mod health_rule;
pub mod pattern;
pub mod widget;

pub use health_rule::check_health_rule;
pub use pattern::{matches, matches_pattern, MatchMode, MetricPattern};
pub use widget::{is_widget_used, widget_matched_metrics};
