extern crate clap;
extern crate miniexec;
extern crate simple_logger;

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use miniexec::config::Config;
use miniexec::dest::PrintReceiver;
use miniexec::error::{ExecError, ExecResult};
use miniexec::executor::estate::EFlags;
use miniexec::spi::{Executor, QueryOutcome};

fn main() {
    let matches = Command::new("miniexec")
        .about("Runs a plan tree and prints the tuples it produces")
        .arg(
            Arg::new("plan")
                .long("plan")
                .value_name("PLAN")
                .conflicts_with("plan_file")
                .required_unless_present("plan_file"),
        )
        .arg(Arg::new("plan_file").long("plan-file").value_name("FILE"))
        .arg(Arg::new("config").long("config").value_name("FILE"))
        .arg(Arg::new("log_level").long("log-level").value_name("LEVEL"))
        .arg(Arg::new("limit").long("limit").value_name("N"))
        .arg(Arg::new("explain").long("explain").action(ArgAction::SetTrue))
        .get_matches();

    let config = match build_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: '{}'", e);
            ::std::process::exit(1);
        }
    };

    if let Err(e) = SimpleLogger::new().with_level(config.log_level).init() {
        eprintln!("Error: failed to set up logging: '{}'", e);
        ::std::process::exit(1);
    }

    match run(&matches, config) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: '{}'", e);
            ::std::process::exit(1);
        }
    }
}

// Config file first, then command line flags on top of it.
fn build_config(matches: &ArgMatches) -> ExecResult<Config> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::new(),
    };

    if let Some(level) = matches.get_one::<String>("log_level") {
        config.log_level = LevelFilter::from_str(level)
            .map_err(|_| ExecError::Config(format!("invalid log level '{}'", level)))?;
    }

    if let Some(limit) = matches.get_one::<String>("limit") {
        config.set("row_limit", limit)?;
    }

    if matches.get_flag("explain") {
        config.eflags = config.eflags | EFlags::EXPLAIN_ONLY;
    }

    Ok(config)
}

fn run(matches: &ArgMatches, config: Config) -> ExecResult<()> {
    let query = match (matches.get_one::<String>("plan"), matches.get_one::<String>("plan_file")) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|source| ExecError::PlanFile {
            path: path.clone(),
            source,
        })?,
        (None, None) => return Err(ExecError::Parse("no plan given".to_string())),
    };

    let executor = Executor::new(config);
    let stdout = io::stdout();
    let mut dest = PrintReceiver::new(stdout.lock());

    match executor.execute_query(&query, &mut dest)? {
        QueryOutcome::Rows(n) => eprintln!("({} rows)", n),
        QueryOutcome::Explain(text) => print!("{}", text),
    }

    Ok(())
}
