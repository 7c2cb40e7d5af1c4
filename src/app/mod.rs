pub mod applications_use_case;
pub mod dashboards_use_case;
pub mod health_rules_use_case;
pub mod ports;
