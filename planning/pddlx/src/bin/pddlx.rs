use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use pddlx::errors::{Ctx, Message};
use pddlx::{Input, find_domain_of, parse_pddl_all};

/// Extracts the content of PDDL domain and problem files.
///
/// The domain and its problems are printed as a single JSON object whose keys are the domain names.
#[derive(Debug, Parser)]
#[command(name = "pddlx", rename_all = "kebab-case")]
struct Args {
    /// If not set, will look for the domain file in the directory of the first
    /// problem file or in the parent directory (e.g. `domain.pddl`).
    #[arg(long, short)]
    domain: Option<PathBuf>,
    /// Paths to the problem files to parse.
    #[arg(required = true)]
    problems: Vec<PathBuf>,
    /// Output format.
    #[arg(long, short, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Print the JSON output on a single line.
    #[arg(long)]
    compact: bool,
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(long, short, env = "PDDLX_LOG", default_value = "warn")]
    log_level: tracing::Level,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The extracted model, as JSON
    Json,
    /// Human readable summary
    Text,
}

fn main() -> Result<(), Message> {
    let args = Args::parse();

    // logs go to stderr, leaving stdout to the result
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(Instant::now()))
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Message::error)?;

    for problem_file in &args.problems {
        if !problem_file.exists() {
            return Err(Message::error(format!(
                "Problem file {} does not exist",
                problem_file.display()
            )));
        }
    }

    let domain_file = match args.domain {
        Some(name) => name,
        None => {
            let first = args.problems.first().title("No problem file given")?.canonicalize()?;
            find_domain_of(&first).title(
                "Unable to automatically find the domain file. Consider specifying the domain with the option -d/--domain",
            )?
        }
    };
    tracing::info!("Domain file: {}", domain_file.display());

    let domain = Input::from_file(&domain_file)?;
    let problems = args
        .problems
        .iter()
        .map(|file| Input::from_file(file))
        .collect::<Result<Vec<_>, _>>()?;
    let result = parse_pddl_all(domain, problems)?;

    match args.format {
        Format::Json if args.compact => println!("{}", serde_json::to_string(&result)?),
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => println!("{result}"),
    }
    Ok(())
}
