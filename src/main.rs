// Enable warnings for all clippy lints.
#![warn(
    clippy::correctness,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::cargo,
    clippy::restriction
)]
// Selectively disable warnings for some lints.
#![allow(
    clippy::indexing_slicing, // Allow `vec[i]` indexing.
    clippy::module_name_repetitions,  // Allow name repetitions in module and type names.
    clippy::use_debug, // Debug formatting is useful.
    clippy::integer_arithmetic, // Needed.
    clippy::multiple_crate_versions, // Beyond our control.
    clippy::missing_docs_in_private_items, // Disabled.
    clippy::missing_inline_in_public_items, // Not considered for now.
    clippy::implicit_return, // Allow.
    clippy::use_self, // Too pedantic.
    clippy::shadow_same,
    clippy::result_expect_used,
    clippy::unknown_clippy_lints,
    clippy::exit
)]
// Mark some lints as errors.
#![deny(clippy::print_stdout)]

use clap::{arg_enum, value_t, App, Arg, ArgMatches};
use labelprop::config::{DedupMode, EdgeSource, EngineConfig, IterateStrategy, RunConfig};
use labelprop::error::GSError;
use labelprop::graph::edge_list::DEFAULT_SEPARATOR;
use labelprop::util::logger::init_logger_with_level;
use log::{error, info, Level};

arg_enum! {
    #[derive(PartialEq, Debug)]
    pub enum LogLevel {
        Error,
        Warn,
        Info,
        Debug,
        Trace,
    }
}

arg_enum! {
    #[derive(PartialEq, Debug)]
    pub enum Strategy {
        Plain,
        Secondary,
    }
}

arg_enum! {
    #[derive(PartialEq, Debug)]
    pub enum Dedup {
        Distinct,
        Reduce,
    }
}

fn main() {
    // Parse command line arguments.
    let matches = App::new("labelprop")
        .about("Connected components by iterative map/reduce label propagation")
        .arg(
            Arg::from_usage("-l, --loglevel=[LEVEL] 'Set the log level'")
                .possible_values(&LogLevel::variants())
                .case_insensitive(true),
        )
        .arg(
            Arg::from_usage("-s, --strategy=[STRATEGY] 'Reduce variant used to propagate labels'")
                .possible_values(&Strategy::variants())
                .case_insensitive(true),
        )
        .arg(
            Arg::from_usage("-d, --dedup=[DEDUP] 'How round outputs are deduplicated'")
                .possible_values(&Dedup::variants())
                .case_insensitive(true),
        )
        .args_from_usage(
            "[edge_file] 'Reads edges from a delimited file, or bincode for .bin files'
            --separator=[SEP] 'Column separator of the edge file (default: comma, or tab)'
            -g, --generate=[BOUNDS] 'Generates a random graph of NODES,EDGES edges'
            --seed=[SEED] 'Seed for the random graph'
            --self-loops 'Allows self-loops in the random graph'
            -r, --max-rounds=[ROUNDS] 'Gives up after this many rounds (0 for no limit)'
            -t, --threads=[THREADS] 'Number of worker threads'
            -p, --partitions=[PARTITIONS] 'Number of partitions (default: threads)'
            -o, --output=[FILE] 'Writes node,label lines, or bincode for .bin files'
            --print 'Logs the label of every node'
            --verify 'Cross-checks the labels against reference implementations'",
        )
        .get_matches();

    if let Err(e) = setup_logger(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }

    let result = run_config(&matches).and_then(|config| labelprop::run(&config));
    match result {
        Ok(summary) => {
            info!("[Success][{}] {}", summary.elapsed.to_seconds_string(), summary);
        }
        Err(e) => {
            error!("[Error] {}", e);
            std::process::exit(1);
        }
    }
}

fn run_config(matches: &ArgMatches) -> Result<RunConfig, GSError> {
    let source = if let Some(bounds) = matches.value_of("generate") {
        let (nodes, edges) = parse_bounds(bounds)?;
        let seed = if matches.is_present("seed") {
            Some(value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit()))
        } else {
            None
        };
        EdgeSource::Random { nodes, edges, seed, self_loops: matches.is_present("self-loops") }
    } else if let Some(path) = matches.value_of("edge_file") {
        if path.ends_with(".bin") {
            EdgeSource::Binary { path: path.to_owned() }
        } else {
            let separator =
                matches.value_of("separator").map_or(Ok(DEFAULT_SEPARATOR), parse_separator)?;
            EdgeSource::EdgeList { path: path.to_owned(), separator }
        }
    } else {
        return Err(GSError::Config("Either an edge file or --generate is required".to_owned()));
    };

    let strategy = match value_t!(matches, "strategy", Strategy).unwrap_or(Strategy::Plain) {
        Strategy::Plain => IterateStrategy::Plain,
        Strategy::Secondary => IterateStrategy::SecondarySorting,
    };
    let dedup = match value_t!(matches, "dedup", Dedup).unwrap_or(Dedup::Reduce) {
        Dedup::Distinct => DedupMode::Distinct,
        Dedup::Reduce => DedupMode::GroupReduce,
    };
    let mut engine = EngineConfig::default().with_strategy(strategy).with_dedup(dedup);
    if matches.is_present("max-rounds") {
        let max_rounds = value_t!(matches, "max-rounds", usize).unwrap_or_else(|e| e.exit());
        engine = engine.with_max_rounds(if max_rounds == 0 { None } else { Some(max_rounds) });
    }
    if matches.is_present("threads") {
        engine =
            engine.with_threads(value_t!(matches, "threads", usize).unwrap_or_else(|e| e.exit()))?;
    }
    if matches.is_present("partitions") {
        engine = engine
            .with_partitions(value_t!(matches, "partitions", usize).unwrap_or_else(|e| e.exit()))?;
    }

    Ok(RunConfig::new(
        source,
        engine,
        matches.value_of("output").map(str::to_owned),
        matches.is_present("print"),
        matches.is_present("verify"),
    ))
}

fn parse_bounds(bounds: &str) -> Result<(u64, usize), GSError> {
    let invalid = || GSError::Config(format!("Expected NODES,EDGES but found '{}'", bounds));
    let mut parts = bounds.split(',').map(str::trim);
    let nodes = parts.next().and_then(|nodes| nodes.parse().ok()).ok_or_else(invalid)?;
    let edges = parts.next().and_then(|edges| edges.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok((nodes, edges))
}

fn parse_separator(separator: &str) -> Result<u8, GSError> {
    match separator {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "space" => Ok(b' '),
        _ if separator.len() == 1 && separator.is_ascii() => Ok(separator.as_bytes()[0]),
        _ => Err(GSError::Config(format!("Invalid separator '{}'", separator))),
    }
}

fn setup_logger(matches: &ArgMatches) -> Result<(), GSError> {
    // Set log level.
    let log_level = match value_t!(matches, "loglevel", LogLevel).unwrap_or(LogLevel::Info) {
        LogLevel::Error => Level::Error,
        LogLevel::Warn => Level::Warn,
        LogLevel::Info => Level::Info,
        LogLevel::Debug => Level::Debug,
        LogLevel::Trace => Level::Trace,
    };
    init_logger_with_level(log_level)
}

#[cfg(test)]
mod tests {
    use super::{parse_bounds, parse_separator};

    #[test]
    fn bounds() {
        assert_eq!(parse_bounds("100,250").expect("Valid bounds"), (100, 250));
        assert_eq!(parse_bounds(" 7 , 9 ").expect("Valid bounds"), (7, 9));
        assert!(parse_bounds("100").is_err());
        assert!(parse_bounds("a,b").is_err());
        assert!(parse_bounds("1,2,3").is_err());
    }

    #[test]
    fn separators() {
        assert_eq!(parse_separator("tab").expect("Valid separator"), b'\t');
        assert_eq!(parse_separator(";").expect("Valid separator"), b';');
        assert_eq!(parse_separator("space").expect("Valid separator"), b' ');
        assert!(parse_separator("::").is_err());
    }
}
