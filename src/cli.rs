//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::config_validation::{SimulationConfig, load_simulation_config, resolve_data_dir};
use crate::domain::error::StocksimError;
use crate::domain::metrics::PerformanceSummary;
use crate::domain::policy::PolicyKind;
use crate::domain::simulation::{SimulationClock, SimulationResult};
use crate::domain::universe::{parse_symbols, validate_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stocksim", about = "Historical stock trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbols, replacing [simulation] symbols
        #[arg(long)]
        symbols: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        chart: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the trading policies a trader can use
    Policies,
}

pub fn run(cli: Cli) -> ExitCode {
    let today = chrono::Local::now().date_naive();
    match cli.command {
        Command::Simulate {
            config,
            symbols,
            output,
            chart,
            dry_run,
        } => {
            let mut overrides = Overrides::new();
            if let Some(s) = symbols {
                overrides.push(("simulation", "symbols", s));
            }
            if let Some(o) = output {
                overrides.push(("report", "csv", o.display().to_string()));
            }
            if let Some(c) = chart {
                overrides.push(("report", "chart", c.display().to_string()));
            }
            if dry_run {
                run_dry_run(&config, overrides, today)
            } else {
                run_simulate(&config, overrides, today)
            }
        }
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { symbol, config } => run_info(symbol.as_deref(), &config),
        Command::Policies => run_policies(),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// `(section, key, value)` triples set from the command line.
pub type Overrides = Vec<(&'static str, &'static str, String)>;

/// Config view where command-line values shadow file values.
struct Overridden<'a> {
    base: &'a dyn ConfigPort,
    overrides: Overrides,
}

impl Overridden<'_> {
    fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(s, k, _)| *s == section && *k == key)
            .map(|(_, _, v)| v.as_str())
    }
}

impl ConfigPort for Overridden<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match self.lookup(section, key) {
            Some(v) => Some(v.to_string()),
            None => self.base.get_string(section, key),
        }
    }
}

fn load_simulation(
    config_path: &Path,
    overrides: Overrides,
    today: NaiveDate,
) -> Result<SimulationConfig, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    let config = Overridden {
        base: &adapter,
        overrides,
    };
    load_simulation_config(&config, today).map_err(|e| {
        eprintln!("error: {e}");
        if matches!(e, StocksimError::UnknownPolicy { .. }) {
            eprintln!("available policies: {}", PolicyKind::available());
        }
        ExitCode::from(&e)
    })
}

pub fn run_simulate(
    config_path: &Path,
    overrides: Overrides,
    today: NaiveDate,
) -> ExitCode {
    let sim_config = match load_simulation(config_path, overrides, today) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = CsvAdapter::new(PathBuf::from(&sim_config.data_dir));
    run_simulation_pipeline(&data_port, &sim_config)
}

/// Load the universe, build the traders and run the clock to the end date.
pub fn simulate(
    data_port: &dyn DataPort,
    sim_config: &SimulationConfig,
) -> Result<SimulationResult, StocksimError> {
    let universe = validate_universe(
        data_port,
        sim_config.symbols.clone(),
        sim_config.start_date,
        sim_config.end_date,
    )?;

    let traders = sim_config
        .traders
        .iter()
        .enumerate()
        .map(|(i, spec)| spec.build(sim_config.seed.wrapping_add(i as u64), sim_config.sell_mode))
        .collect();

    SimulationClock::new(universe.timelines, traders, sim_config.start_date)?
        .run(sim_config.end_date)
}

pub fn run_simulation_pipeline(data_port: &dyn DataPort, sim_config: &SimulationConfig) -> ExitCode {
    eprintln!(
        "Simulating {} trader(s) on {} symbol(s), {} to {}",
        sim_config.traders.len(),
        sim_config.symbols.len(),
        sim_config.start_date,
        sim_config.end_date,
    );

    let result = match simulate(data_port, sim_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&result);

    let csv_report = CsvReportAdapter::new();
    let chart_report = SvgChartAdapter::new();
    let mut reports: Vec<(&dyn ReportPort, &str)> =
        vec![(&csv_report as &dyn ReportPort, sim_config.csv_path.as_str())];
    if let Some(chart) = &sim_config.chart_path {
        reports.push((&chart_report as &dyn ReportPort, chart.as_str()));
    }
    for (report, path) in reports {
        if let Err(e) = report.write(&result, path) {
            eprintln!("error: failed to write report: {e}");
            return (&e).into();
        }
        eprintln!("Report written to: {}", path);
    }

    info!("run complete");
    ExitCode::SUCCESS
}

fn print_summary(result: &SimulationResult) {
    eprintln!("\n=== Results ({} to {}) ===", result.start_date, result.end_date);
    eprintln!("Stocks: {}", result.symbols.join(", "));
    for summary in PerformanceSummary::for_all(result) {
        eprintln!("\n{}", summary.trader);
        eprintln!("  Final Value:   ${:.2}", summary.final_value);
        eprintln!("  Total Return:  {:.2}%", summary.total_return * 100.0);
        eprintln!(
            "  Max Drawdown:  -{:.1}% ({} samples)",
            summary.max_drawdown * 100.0,
            summary.max_drawdown_duration
        );
        eprintln!("  Trades:        {}", summary.trades);
    }
    for trader in &result.traders {
        if trader.holdings.is_empty() {
            continue;
        }
        let held: Vec<String> = trader
            .holdings
            .iter()
            .map(|(symbol, shares)| format!("{symbol} x {shares}"))
            .collect();
        eprintln!("\n{} holds: {} (cash ${:.2})", trader.name, held.join(", "), trader.cash);
    }
}

pub fn run_dry_run(
    config_path: &Path,
    overrides: Overrides,
    today: NaiveDate,
) -> ExitCode {
    let sim_config = match load_simulation(config_path, overrides, today) {
        Ok(c) => c,
        Err(code) => return code,
    };
    eprintln!("Config validated successfully");

    eprintln!("\nHorizon: {} to {}", sim_config.start_date, sim_config.end_date);
    eprintln!("Data directory: {}", sim_config.data_dir);
    eprintln!("Symbols: {}", sim_config.symbols.join(", "));
    eprintln!("Sell mode: {}", sim_config.sell_mode);
    eprintln!("Seed: {}", sim_config.seed);
    eprintln!("\nTraders:");
    for spec in &sim_config.traders {
        eprintln!("  {}", spec.trader_name());
    }
    eprintln!("\nReports:");
    eprintln!("  csv:   {}", sim_config.csv_path);
    if let Some(chart) = &sim_config.chart_path {
        eprintln!("  chart: {}", chart);
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn data_port_from(config: &dyn ConfigPort) -> Result<CsvAdapter, ExitCode> {
    let dir = resolve_data_dir(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match data_port_from(&config) {
        Ok(d) => d,
        Err(code) => return code,
    };

    match data_port.list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(symbol: Option<&str>, config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match data_port_from(&config) {
        Ok(d) => d,
        Err(code) => return code,
    };

    let symbols = match resolve_symbols(symbol, &config, &data_port) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for s in &symbols {
        match data_port.get_data_range(s) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} points, {} to {}", s, count, first, last);
            }
            Ok(None) => eprintln!("{}: no data found", s),
            Err(e) => eprintln!("error querying {}: {}", s, e),
        }
    }
    ExitCode::SUCCESS
}

/// `--symbol` first, then `[simulation] symbols`, then everything in the data source.
pub fn resolve_symbols(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<Vec<String>, StocksimError> {
    if let Some(s) = symbol_override {
        return Ok(vec![s.trim().to_uppercase()]);
    }
    match config.get_string("simulation", "symbols") {
        Some(list) if !list.trim().is_empty() => Ok(parse_symbols(&list)?),
        _ => data_port.list_symbols(),
    }
}

fn run_policies() -> ExitCode {
    for kind in PolicyKind::ALL {
        println!("{:<16}{}", kind.slug(), kind.display_name());
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FileConfigAdapter {
        FileConfigAdapter::from_string(
            "[simulation]\nsymbols = AAPL\nseed = 3\n[report]\ncsv = a.csv\n",
        )
        .unwrap()
    }

    #[test]
    fn overrides_shadow_file_values() {
        let file = base();
        let config = Overridden {
            base: &file,
            overrides: vec![
                ("simulation", "symbols", "MSFT,GOOG".into()),
                ("report", "chart", "c.svg".into()),
            ],
        };
        assert_eq!(config.get_string("simulation", "symbols").as_deref(), Some("MSFT,GOOG"));
        assert_eq!(config.get_string("report", "chart").as_deref(), Some("c.svg"));
        assert_eq!(config.get_string("report", "csv").as_deref(), Some("a.csv"));
        assert_eq!(config.get_string("simulation", "seed").as_deref(), Some("3"));
        assert_eq!(config.get_list("simulation", "symbols"), vec!["MSFT", "GOOG"]);
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "stocksim",
            "simulate",
            "--config",
            "sim.ini",
            "--symbols",
            "AAPL,MSFT",
            "--chart",
            "out.svg",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Simulate {
                config,
                symbols,
                output,
                chart,
                dry_run,
            } => {
                assert_eq!(config, PathBuf::from("sim.ini"));
                assert_eq!(symbols.as_deref(), Some("AAPL,MSFT"));
                assert!(output.is_none());
                assert_eq!(chart, Some(PathBuf::from("out.svg")));
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_requires_config_for_list_symbols() {
        assert!(Cli::try_parse_from(["stocksim", "list-symbols"]).is_err());
        assert!(Cli::try_parse_from(["stocksim", "policies"]).is_ok());
    }
}
