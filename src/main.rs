#![allow(dead_code)]
pub mod config;
pub mod math;
pub mod numbertool;
pub mod term_frontend;
use clap::{Parser, Subcommand};
use config::Config;
use env_logger::Env;
use math::exponent::ExponentRule;
use numbertool::State;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(version, about = "Exact fractions, percentages, statistics and linear equations")]
pub struct Args {
    /// Settings file to use instead of the one in the platform config dir
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sort a comma separated list like "3, 1/2, 50%, -1 1/4"
    Sort {
        #[arg(allow_hyphen_values = true)]
        numbers: String,
        #[arg(short, long)]
        descending: bool,
    },
    /// Mean, median and range of a comma separated list
    Stats {
        #[arg(allow_hyphen_values = true)]
        numbers: String,
    },
    /// Show a number as a fraction, a decimal and a percentage
    Convert {
        #[arg(allow_hyphen_values = true)]
        number: String,
    },
    /// Solve a linear equation in one variable, e.g. "2x+3=7"
    Solve {
        #[arg(allow_hyphen_values = true)]
        equation: String,
    },
    /// Apply a law of exponents: product, quotient, power or negative
    Exponent {
        #[arg(value_parser = parse_rule)]
        rule: ExponentRule,
        #[arg(allow_hyphen_values = true)]
        base: String,
        #[arg(allow_hyphen_values = true)]
        e1: String,
        #[arg(allow_hyphen_values = true, default_value = "")]
        e2: String,
    },
    /// Square root
    Sqrt {
        #[arg(allow_hyphen_values = true)]
        number: String,
    },
}

fn parse_rule(s: &str) -> Result<ExponentRule, String> {
    ExponentRule::from_str(s).ok_or_else(|| {
        let names = ExponentRule::ALL.iter().map(|r| r.name()).collect::<Vec<&str>>();
        format!("expected product, quotient, power or negative ({})", names.join("; "))
    })
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let state = State::new(config);

    let command = match args.command {
        Some(command) => command,
        None => return term_frontend::crossterm_main(state),
    };
    let result = match command {
        Command::Sort { numbers, descending } => state.sort(&numbers, descending),
        Command::Stats { numbers } => state.stats(&numbers),
        Command::Convert { number } => state.convert(&number),
        Command::Solve { equation } => state.solve(&equation),
        Command::Exponent { rule, base, e1, e2 } => state.exponent(rule, &base, &e1, &e2),
        Command::Sqrt { number } => state.sqrt(&number),
    };
    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{}: {e}", e.kind());
            process::exit(1);
        }
    }
}
