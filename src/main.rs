//! fincalc CLI
//!
//! Runs any calculator from the command line, prints the JSON result and can
//! export loan schedules or run scenario batches.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fincalc::export::{write_schedule_csv, write_yearly_csv};
use fincalc::loan::EmiRequest;
use fincalc::{CalculatorService, Endpoint, LoanEngine, RuntimeConfig, Scenario, ScenarioRunner};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Loan, investment and tax calculators", long_about = None)]
struct Cli {
    /// Directory of tax-rule CSV tables (overrides FINCALC_RULES_PATH)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Loan EMI with the yearly payment ledger
    Emi {
        /// Loan amount
        #[arg(short, long)]
        amount: f64,

        /// Annual interest rate in percent
        #[arg(short, long)]
        rate: f64,

        /// Tenure in years
        #[arg(short, long)]
        years: u32,

        /// Write the month-by-month schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the calendar-year summary to this CSV file
        #[arg(long)]
        yearly_csv: Option<PathBuf>,
    },

    /// Future value of a monthly SIP
    Sip {
        #[arg(short, long)]
        amount: f64,

        /// Expected annual return in percent
        #[arg(short, long, default_value = "12")]
        rate: f64,

        #[arg(short, long)]
        years: u32,
    },

    /// Old vs new regime income tax for a salary
    Tax {
        #[arg(short, long)]
        salary: f64,

        /// Age bracket: 0-60, 60-80 or 80+
        #[arg(long, default_value = "0-60")]
        age_group: String,

        /// Section 80C investments
        #[arg(long, default_value = "0")]
        section_80c: f64,
    },

    /// XIRR of dated cash flows read from a JSON file
    Xirr {
        /// File holding {"cashFlows": [{"date": "2024-01-01", "amount": -10000}, ...]}
        file: PathBuf,
    },

    /// Any calculator by name or path, remote first when FINCALC_REMOTE_URL is set
    Calc {
        /// Endpoint name (e.g. "ppf") or path (e.g. "/calculate-ppf")
        endpoint: String,

        /// Inline JSON request body
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,

        /// File holding the JSON request body
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Run a JSON array of scenarios in parallel
    Batch {
        /// File holding [{"name": ..., "endpoint": ..., "request": {...}}]
        file: PathBuf,

        /// Write the outcomes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = RuntimeConfig::from_env();
    if let Some(rules) = cli.rules {
        config.rules_path = Some(rules);
    }
    let service = config.service().context("loading tax rules")?;

    match cli.command {
        Commands::Emi {
            amount,
            rate,
            years,
            csv,
            yearly_csv,
        } => {
            let request = EmiRequest {
                loan_amount: amount,
                interest_rate: rate,
                tenure_years: years,
                tenure_months: 0,
                loan_type: Default::default(),
                emi_advance: false,
                start_year: None,
                start_month: None,
            };
            print_json(&service.handle(Endpoint::Emi, serde_json::to_value(&request)?)?)?;

            if csv.is_some() || yearly_csv.is_some() {
                let schedule = LoanEngine::new(request.to_terms()?)?.schedule();
                if let Some(path) = csv {
                    write_schedule_csv(&schedule, &path)?;
                    eprintln!("Schedule written to {}", path.display());
                }
                if let Some(path) = yearly_csv {
                    write_yearly_csv(&schedule, &path)?;
                    eprintln!("Yearly summary written to {}", path.display());
                }
            }
        }

        Commands::Sip { amount, rate, years } => {
            let body = json!({"sipAmount": amount, "returnRate": rate, "tenureYears": years});
            print_json(&service.handle(Endpoint::Sip, body)?)?;
        }

        Commands::Tax {
            salary,
            age_group,
            section_80c,
        } => {
            let body = json!({"salary": salary, "age_group": age_group, "section_80c": section_80c});
            print_json(&service.handle(Endpoint::IncomeTax, body)?)?;
        }

        Commands::Xirr { file } => {
            print_json(&service.handle(Endpoint::Xirr, read_json(&file)?)?)?;
        }

        Commands::Calc { endpoint, json, file } => {
            let endpoint: Endpoint = endpoint.parse()?;
            let body = match (json, file) {
                (Some(text), _) => serde_json::from_str(&text).context("parsing --json")?,
                (None, Some(path)) => read_json(&path)?,
                (None, None) => json!({}),
            };
            let calculator = config.fallback_calculator()?;
            let runtime = tokio::runtime::Runtime::new()?;
            let (value, source) = runtime.block_on(calculator.calculate(endpoint, body))?;
            eprintln!("{} computed {:?}", endpoint, source);
            print_json(&value)?;
        }

        Commands::Batch { file, output } => run_batch(service, &file, output.as_deref())?,
    }

    Ok(())
}

fn run_batch(service: CalculatorService, file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let scenarios: Vec<Scenario> =
        serde_json::from_value(read_json(file)?).context("scenario file must be a JSON array of scenarios")?;
    if scenarios.is_empty() {
        bail!("{} holds no scenarios", file.display());
    }

    let runner = ScenarioRunner::with_rules(service.rules().clone());
    let outcomes = runner.run_batch(&scenarios);
    let failed = outcomes.iter().filter(|o| !o.ok).count();

    let text = serde_json::to_string_pretty(&outcomes)?;
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} outcomes written to {}", outcomes.len(), path.display());
        }
        None => println!("{}", text),
    }
    if failed > 0 {
        eprintln!("{} of {} scenarios failed", failed, outcomes.len());
    }
    Ok(())
}
