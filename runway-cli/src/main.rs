use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runway_core::{
    generate_forecast, generate_monthly_goal_allocation_schedule, ForecastConfig, MonthKey,
    OneTimePolicy, UserPlan,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod plan_file;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "runway",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("RUNWAY_BUILD_SHA"), ")"),
    about = "Cash-flow forecasts and priority goal allocation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project balances month by month and fund goals from the surplus
    Forecast {
        /// Plan JSON file
        #[arg(long, default_value = "plan.json")]
        plan: PathBuf,

        /// Horizon in months (overrides plan and config)
        #[arg(long)]
        months: Option<u32>,

        /// First month, YYYY-MM (default: this month)
        #[arg(long)]
        start: Option<String>,

        /// Opening balance (default: the plan's current balance)
        #[arg(long)]
        starting_balance: Option<f64>,

        /// Keep the whole surplus in the balance
        #[arg(long)]
        no_goals: bool,

        /// Income at 90%, expenses at 110%
        #[arg(long)]
        conservative: bool,

        /// Book one-time items in their due month instead of skipping them
        #[arg(long)]
        one_time_due_month: bool,

        /// Also write the monthly series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Month-by-month guidance on where the surplus should go
    Schedule {
        #[arg(long, default_value = "plan.json")]
        plan: PathBuf,

        /// First month, YYYY-MM (default: this month)
        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Write a sample plan to start from
    InitPlan {
        #[arg(default_value = "plan.json")]
        path: PathBuf,
    },

    /// Manage ~/.runway/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Forecast {
            plan,
            months,
            start,
            starting_balance,
            no_goals,
            conservative,
            one_time_due_month,
            csv,
            json,
        } => {
            let (plan, cfg) = load_plan_with_config(&plan)?;
            let mut forecast = ForecastConfig::from_plan(&plan, start_month(start.as_deref())?);
            if let Some(m) = months {
                forecast.months = m;
            }
            if let Some(b) = starting_balance {
                forecast.starting_balance = b;
            }
            if no_goals {
                forecast = forecast.with_goal_contributions(false);
            }
            if conservative {
                forecast = forecast.conservative(true);
            }
            if one_time_due_month {
                forecast = forecast.with_one_time_policy(OneTimePolicy::DueMonth);
            }

            let result = generate_forecast(&plan, &forecast)?;

            if let Some(path) = csv {
                let file =
                    fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
                render::write_forecast_csv(file, &result.monthly_forecasts)?;
                info!(path = %path.display(), "wrote csv");
            }

            if json {
                print_json(&result)?;
            } else {
                print!("{}", render::forecast_text(&result, &cfg.display));
            }
        }

        Command::Schedule { plan, start, json } => {
            let (plan, cfg) = load_plan_with_config(&plan)?;
            let schedule =
                generate_monthly_goal_allocation_schedule(&plan, start_month(start.as_deref())?)?;
            if json {
                print_json(&schedule)?;
            } else {
                print!("{}", render::schedule_text(&schedule, &cfg.display));
            }
        }

        Command::InitPlan { path } => {
            plan_file::write_sample_plan(&path, plan_file::this_month())?;
            println!("Wrote {}", path.display());
            println!("Next: `runway forecast --plan {}`", path.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

/// Logs go to stderr, filtered by `RUNWAY_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RUNWAY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_plan_with_config(path: &Path) -> Result<(UserPlan, config::Config)> {
    let cfg = config::load_config()?;
    let mut plan = plan_file::load_plan(path)?;
    info!(
        path = %path.display(),
        income = plan.income.len(),
        expenses = plan.expenses.len(),
        goals = plan.goals.len(),
        "loaded plan"
    );
    cfg.apply_to_plan(&mut plan);
    Ok((plan, cfg))
}

fn start_month(arg: Option<&str>) -> Result<MonthKey> {
    match arg {
        Some(s) => MonthKey::parse(s).with_context(|| format!("--start {s}")),
        None => Ok(plan_file::this_month()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("serialize result")?;
    writeln!(out)?;
    Ok(())
}
