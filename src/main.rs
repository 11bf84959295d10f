use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use studio_insights::config::DashboardConfig;
use studio_insights::data::dimensions::Dimension;
use studio_insights::data::filter::{
    DateRange, FilterCriteria, NumericBounds, PayrollFilter, Scope, Timeframe,
};
use studio_insights::data::loader::load_rows;
use studio_insights::data::model::RawRow;
use studio_insights::report::{self, OutputFormat};
use studio_insights::state::DashboardState;

#[derive(Parser)]
#[command(name = "studio-insights")]
#[command(about = "Slice fitness-studio session and payroll exports", long_about = None)]
struct Cli {
    /// JSON file describing the sheet layouts and merge order
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SessionSources {
    /// Recurring-sessions export (.csv, .json or .parquet)
    #[arg(long)]
    recurring: Option<PathBuf>,
    /// Teacher-sessions export (.csv, .json or .parquet)
    #[arg(long)]
    teacher: Option<PathBuf>,
}

#[derive(Args)]
struct SessionFilterArgs {
    /// JSON file with saved dashboard criteria; flags below refine it
    #[arg(long)]
    criteria: Option<PathBuf>,
    /// Studio tab: a location name, or "all"
    #[arg(long)]
    studio: Option<Scope>,
    #[arg(long = "trainer")]
    trainers: Vec<String>,
    #[arg(long = "class")]
    classes: Vec<String>,
    #[arg(long = "location")]
    locations: Vec<String>,
    #[arg(long = "day")]
    days: Vec<String>,
    #[arg(long = "time")]
    times: Vec<String>,
    #[arg(long = "type")]
    types: Vec<String>,
    #[arg(long)]
    min_capacity: Option<f64>,
    #[arg(long)]
    max_capacity: Option<f64>,
    #[arg(long)]
    min_fill_rate: Option<f64>,
    #[arg(long)]
    max_fill_rate: Option<f64>,
    #[arg(long)]
    min_revenue: Option<f64>,
    #[arg(long)]
    max_revenue: Option<f64>,
    /// First session date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last session date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl SessionFilterArgs {
    /// Start from the saved criteria (if any) and apply every flag given.
    fn into_criteria(self) -> anyhow::Result<FilterCriteria> {
        let mut criteria = match &self.criteria {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading criteria {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing criteria {}", path.display()))?
            }
            None => FilterCriteria::default(),
        };

        if let Some(studio) = self.studio {
            criteria.location_scope = studio;
        }
        if self.from.is_some() || self.to.is_some() {
            criteria.date_range = DateRange::new(
                self.from.or(criteria.date_range.start),
                self.to.or(criteria.date_range.end),
            );
        }
        let refine = |bounds: NumericBounds, min: Option<f64>, max: Option<f64>| {
            NumericBounds::new(min.or(bounds.min), max.or(bounds.max))
        };
        criteria.capacity = refine(criteria.capacity, self.min_capacity, self.max_capacity);
        criteria.fill_rate = refine(criteria.fill_rate, self.min_fill_rate, self.max_fill_rate);
        criteria.revenue = refine(criteria.revenue, self.min_revenue, self.max_revenue);

        for (dimension, values) in [
            (Dimension::Trainer, self.trainers),
            (Dimension::Class, self.classes),
            (Dimension::Location, self.locations),
            (Dimension::Day, self.days),
            (Dimension::Time, self.times),
            (Dimension::Type, self.types),
        ] {
            if !values.is_empty() {
                criteria.select(dimension, values);
            }
        }
        log::debug!("session criteria: {criteria:?}");
        Ok(criteria)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the session exports and print the filtered view
    Sessions {
        #[command(flatten)]
        sources: SessionSources,
        #[command(flatten)]
        filters: SessionFilterArgs,
        /// Rows to list per section
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Print the option lists for every session filter control
    Options {
        #[command(flatten)]
        sources: SessionSources,
    },
    /// Compare class families from the payroll export
    Payroll {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "all")]
        location: Scope,
        #[arg(long, default_value = "all")]
        trainer: Scope,
        /// 3m, 6m, 1y or all
        #[arg(long, default_value = "all")]
        timeframe: Timeframe,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DashboardConfig::load(cli.config.as_deref())?;
    let mut state = DashboardState::new(config)?;

    let output = match cli.command {
        Commands::Sessions {
            sources,
            filters,
            limit,
        } => {
            load_sessions(&mut state, &sources)?;
            state.set_criteria(filters.into_criteria()?);
            let visible: Vec<_> = state.visible_sessions().into_iter().cloned().collect();
            report::render_sessions(
                &visible,
                state.canonical_sessions().len(),
                limit,
                cli.format,
            )?
        }
        Commands::Options { sources } => {
            load_sessions(&mut state, &sources)?;
            let options = state
                .dataset
                .as_ref()
                .map(|ds| ds.options.clone())
                .unwrap_or_default();
            report::render_options(&options, cli.format)?
        }
        Commands::Payroll {
            file,
            location,
            trainer,
            timeframe,
        } => {
            let rows = load_rows(&file)?;
            state.set_payroll_rows(Some(rows.as_slice()));
            state.payroll_filter = PayrollFilter {
                location,
                trainer,
                timeframe,
            };
            let visible = state.visible_payroll(Local::now().naive_local());
            report::render_payroll(&visible, &state.payroll_options, cli.format)?
        }
    };

    print!("{output}");
    Ok(())
}

fn load_sessions(state: &mut DashboardState, sources: &SessionSources) -> anyhow::Result<()> {
    if sources.recurring.is_none() && sources.teacher.is_none() {
        anyhow::bail!("pass at least one of --recurring or --teacher");
    }
    let recurring = load_optional(sources.recurring.as_deref()).context("recurring sessions")?;
    let teacher = load_optional(sources.teacher.as_deref()).context("teacher sessions")?;
    state.set_session_rows(recurring.as_deref(), teacher.as_deref());
    Ok(())
}

fn load_optional(path: Option<&Path>) -> anyhow::Result<Option<Vec<RawRow>>> {
    path.map(load_rows).transpose()
}
