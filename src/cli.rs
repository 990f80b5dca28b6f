//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_dashboard_adapter::HtmlDashboardAdapter;
use crate::adapters::summary_adapter::DisabledSummary;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::adapters::text_report_adapter::{ReportSynthesizer, report_filename, save_report};
use crate::domain::config_validation::validate_run_config;
use crate::domain::error::{AgentError, PlanError};
use crate::domain::executor::Agent;
use crate::domain::planner::create_plan;
use crate::domain::run_config::{DataSource, RunConfig, SummaryConfig};
use crate::domain::store::RunStore;
use crate::domain::task::Plan;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceSourcePort;
use crate::ports::report_port::ReportPort;
use crate::ports::summary_port::SummaryPort;

#[derive(Parser, Debug)]
#[command(name = "finagent", about = "Plan and run single-stock analyses and two-stock comparisons")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one ticker or compare two, e.g. `analyze compare AAPL and MSFT over 6 months`
    Analyze {
        /// Free-text request; read from stdin when omitted
        request: Vec<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory holding `{TICKER}.csv` price files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Root for charts, dashboard and reports
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the task plan for a request without running it
    Plan {
        request: Vec<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            request,
            config,
            data_dir,
            output_dir,
        } => run_analyze(&request, config.as_deref(), data_dir, output_dir),
        Command::Plan { request } => run_plan(&request),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Validates `config` and resolves every setting, falling back to defaults.
pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, AgentError> {
    validate_run_config(config)?;

    let defaults = RunConfig::default();
    let path = |section: &str, key: &str, default: PathBuf| {
        config
            .get_string(section, key)
            .map(PathBuf::from)
            .unwrap_or(default)
    };
    let text = |key: &str, default: String| config.get_string("summary", key).unwrap_or(default);

    let data_source = config
        .get_string("data", "source")
        .and_then(|s| DataSource::parse(&s))
        .unwrap_or(defaults.data_source);

    let summary_defaults = SummaryConfig::default();
    let summary = SummaryConfig {
        enabled: config.get_bool("summary", "enabled", summary_defaults.enabled),
        api_key_env: text("api_key_env", summary_defaults.api_key_env),
        model: text("model", summary_defaults.model),
        api_base: text("api_base", summary_defaults.api_base),
    };

    Ok(RunConfig {
        data_source,
        data_dir: path("data", "dir", defaults.data_dir),
        charts_dir: path("output", "charts_dir", defaults.charts_dir),
        dashboard_path: path("output", "dashboard", defaults.dashboard_path),
        reports_dir: path("output", "reports_dir", defaults.reports_dir),
        summary,
    })
}

/// Joins the request words, or reads one line from `input` when there are none.
pub fn request_text(words: &[String], input: &mut dyn BufRead) -> Result<String, AgentError> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    eprint!("Enter your request: ");
    io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn format_plan(plan: &Plan) -> String {
    let mut lines: Vec<String> = plan
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| format!("{}. {task}", i + 1))
        .collect();
    lines.push(format!(
        "summary: {}",
        if plan.use_summary() { "on" } else { "off" }
    ));
    lines.join("\n")
}

fn run_plan(words: &[String]) -> ExitCode {
    let text = match request_text(words, &mut io::stdin().lock()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    match create_plan(&text) {
        Ok(plan) => {
            println!("{}", format_plan(&plan));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let err = AgentError::from(e);
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

/// Everything a finished analysis produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub store: RunStore,
    pub report: String,
    pub report_path: PathBuf,
    pub dashboard_path: PathBuf,
}

/// Runs a plan end to end: execute tasks, write the dashboard, build and save
/// the report.
pub fn run_pipeline(
    plan: &Plan,
    config: &RunConfig,
    prices: &dyn PriceSourcePort,
    charts: &dyn ChartPort,
    summary: &dyn SummaryPort,
) -> Result<RunOutcome, AgentError> {
    let mut store = RunStore::new();
    store.set_use_llm_summary(plan.use_summary() && config.summary.enabled);

    Agent::new(prices, charts).run(plan.tasks(), &mut store)?;

    let tickers = plan.tickers();
    let dashboard_path = HtmlDashboardAdapter::new().write(&store, &tickers, &config.dashboard_path)?;

    let period = plan.period().unwrap_or_default().to_string();
    let report = ReportSynthesizer::new(summary, period.as_str()).generate_report(&store, &tickers);
    let filename =
        report_filename(&tickers, &period).ok_or(AgentError::InvalidRequest(PlanError::NoTickers))?;
    let report_path = config.reports_dir.join(filename);
    save_report(&report, &report_path)?;

    Ok(RunOutcome {
        store,
        report,
        report_path,
        dashboard_path,
    })
}

fn price_source(config: &RunConfig) -> Result<Box<dyn PriceSourcePort>, AgentError> {
    match config.data_source {
        DataSource::Csv => Ok(Box::new(CsvPriceAdapter::new(config.data_dir.clone()))),
        #[cfg(feature = "yahoo")]
        DataSource::Yahoo => Ok(Box::new(
            crate::adapters::yahoo_adapter::YahooPriceAdapter::new(),
        )),
        #[cfg(not(feature = "yahoo"))]
        DataSource::Yahoo => Err(AgentError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: "yahoo feature is required for the yahoo data source".into(),
        }),
    }
}

fn summary_generator(config: &SummaryConfig) -> Box<dyn SummaryPort> {
    #[cfg(feature = "llm")]
    {
        if config.enabled {
            match crate::adapters::summary_adapter::OpenAiSummaryAdapter::new(config.clone()) {
                Ok(adapter) => return Box::new(adapter),
                Err(e) => warn!(error = %e, "summaries disabled"),
            }
        }
    }

    #[cfg(not(feature = "llm"))]
    {
        if config.enabled {
            warn!("llm feature not enabled, using fallback summaries");
        }
    }

    Box::new(DisabledSummary)
}

fn run_analyze(
    words: &[String],
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> ExitCode {
    let adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            }
        }
        None => FileConfigAdapter::empty(),
    };

    let mut config = match build_run_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir);
    }

    let text = match request_text(words, &mut io::stdin().lock()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let plan = match create_plan(&text) {
        Ok(p) => p,
        Err(e) => {
            let err = AgentError::from(e);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    info!(tickers = ?plan.tickers(), period = ?plan.period(), "plan created");

    let prices = match price_source(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let charts = SvgChartAdapter::new(config.charts_dir.clone());
    let summary = summary_generator(&config.summary);

    match run_pipeline(&plan, &config, prices.as_ref(), &charts, summary.as_ref()) {
        Ok(outcome) => {
            eprintln!("Dashboard created: {}", outcome.dashboard_path.display());
            println!("\n=== REPORT GENERATED ===\n");
            println!("{}", outcome.report);
            eprintln!("\nReport saved to {}", outcome.report_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
