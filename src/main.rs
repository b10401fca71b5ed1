use std::time::Instant;

use clap::Parser;
use paraindex::{
    Error,
    Indexer,
    PhraseProbabilityModel,
    RecordStore,
    SampleIndex,
    SimpleTokenizer,
    Vocabulary,
    error,
    lookup::Example,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{BuildArgs, Cli, Command, LookupArgs};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("PARAINDEX_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Build(args) => cmd_build(&args)?,
        Command::Lookup(args) => cmd_lookup(&args)?,
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_build(args: &BuildArgs) -> error::Result<()> {
    let start = Instant::now();
    let config = args.index_config();
    config.validate()?;

    // Check inputs before the output store is created or truncated.
    for path in [&args.phrase_prob, &args.keywords].into_iter().flatten() {
        if !path.is_file() {
            return Err(Error::Config(format!(
                "file does not exist: {}",
                path.display()
            )));
        }
    }

    tracing::info!(output = %args.output.display(), "process started");

    let phrase_model = match &args.phrase_prob {
        Some(path) => {
            let table = RecordStore::open_existing(path)?;
            Some(PhraseProbabilityModel::new(Box::new(table)))
        }
        None => None,
    };
    let vocabulary = match &args.keywords {
        Some(path) => Vocabulary::load(path, &SimpleTokenizer)?,
        None => Vocabulary::new(),
    };

    let store = RecordStore::create(&args.output, true)?;
    let mut indexer = Indexer::new(config, store)?.with_vocabulary(vocabulary);
    if let Some(model) = phrase_model {
        indexer = indexer.with_phrase_model(model);
    }

    let stats = indexer.run(std::io::stdin().lock())?;

    tracing::info!(
        lines = stats.lines_indexed,
        duplicates = stats.duplicates,
        skipped = stats.skipped,
        phrases = stats.phrases,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "process done"
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct LookupOutput<'a> {
    phrase: &'a str,
    examples: Vec<Example>,
}

fn cmd_lookup(args: &LookupArgs) -> error::Result<()> {
    if !args.index.is_file() {
        return Err(Error::Config(format!(
            "index does not exist: {}",
            args.index.display()
        )));
    }

    let index = SampleIndex::open(&args.index)?;
    let examples = index.examples(&args.phrase, args.count)?;

    if args.json {
        let output = LookupOutput {
            phrase: &args.phrase,
            examples,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if examples.is_empty() {
        println!("No example lines for '{}'", args.phrase);
    } else {
        for example in &examples {
            println!("[{}]\t{}", example.id, example.line);
        }
    }
    Ok(())
}
