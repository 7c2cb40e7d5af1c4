use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use appd_dependency_check::app::applications_use_case::ApplicationsUseCase;
use appd_dependency_check::app::dashboards_use_case::{DashboardReport, DashboardsUseCase};
use appd_dependency_check::app::health_rules_use_case::HealthRulesUseCase;
use appd_dependency_check::app::ports::ControllerPort;
use appd_dependency_check::config::Config;
use appd_dependency_check::constants;
use appd_dependency_check::infra::ControllerClient;
use appd_dependency_check::logging;
use appd_dependency_check::matching::MatchMode;
use appd_dependency_check::report::render;

#[derive(Parser)]
#[command(name = "appd-dependency-check")]
#[command(about = "Find controller dashboards and health rules that depend on applications or metrics")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the controller configuration file
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ApplicationFilter {
    /// Search for this application id (repeatable)
    #[arg(long = "app-id")]
    app_ids: Vec<i64>,
    /// Search for this application name (repeatable)
    #[arg(long = "app-name")]
    app_names: Vec<String>,
    /// Defines how to match metrics
    #[arg(long, value_enum, default_value_t = MatchMode::Contains)]
    metric_match: MatchMode,
}

#[derive(Subcommand)]
enum Commands {
    /// Check dashboards for applications and/or metrics
    Dashboards {
        #[command(flatten)]
        filter: ApplicationFilter,
        /// Search for this metric in dashboards (repeatable)
        #[arg(long = "metric")]
        metrics: Vec<String>,
    },
    /// Check health rules for metrics
    Healthrules {
        #[command(flatten)]
        filter: ApplicationFilter,
        /// Search for this metric in health rules (repeatable)
        #[arg(long = "metric", required = true)]
        metrics: Vec<String>,
    },
}

async fn run_dashboards(
    controller: Arc<dyn ControllerPort>,
    applications: &ApplicationsUseCase,
    filter: ApplicationFilter,
    metrics: Vec<String>,
) -> anyhow::Result<()> {
    let apps = applications
        .resolve(&filter.app_ids, &filter.app_names, false)
        .await?;

    let scan = DashboardsUseCase::new(controller)
        .run(&apps, &metrics, filter.metric_match)
        .await?;

    let output = match &scan.report {
        DashboardReport::ByApplication(reports) => {
            render::render_application_dashboards(reports, &metrics)
        }
        DashboardReport::ByMetric(dashboards) => render::render_metric_dashboards(dashboards, &metrics),
    };
    print!("{output}");

    let warnings: Vec<String> = scan.warnings.iter().map(ToString::to_string).collect();
    eprint!("{}", render::render_warnings(&warnings));
    Ok(())
}

async fn run_health_rules(
    controller: Arc<dyn ControllerPort>,
    applications: &ApplicationsUseCase,
    filter: ApplicationFilter,
    metrics: Vec<String>,
) -> anyhow::Result<()> {
    let apps = applications
        .resolve(&filter.app_ids, &filter.app_names, true)
        .await?;

    let scan = HealthRulesUseCase::new(controller)
        .run(&apps, &metrics, filter.metric_match)
        .await?;

    print!("{}", render::render_health_rules(&scan.report, &metrics));

    let warnings: Vec<String> = scan
        .warnings
        .iter()
        .map(ToString::to_string)
        .chain(scan.report.invalid.iter().map(|rule| {
            format!(
                "JSON for healthrule {}:[{}] in application {}[id:{}] is not valid: {}",
                rule.name, rule.id, rule.application.name, rule.application.id, rule.reason
            )
        }))
        .collect();
    eprint!("{}", render::render_warnings(&warnings));
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    let controller: Arc<dyn ControllerPort> = Arc::new(
        ControllerClient::new(&config.controller).context("building controller client")?,
    );
    let applications = ApplicationsUseCase::new(controller.clone(), config.applications.clone());

    match cli.command {
        Commands::Dashboards { filter, metrics } => {
            info!("Checking dashboards");
            run_dashboards(controller, &applications, filter, metrics).await
        }
        Commands::Healthrules { filter, metrics } => {
            info!("Checking health rules");
            run_health_rules(controller, &applications, filter, metrics).await
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
