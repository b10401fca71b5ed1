use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use paraindex::indexer::{
    DEFAULT_MAX_NGRAM,
    DEFAULT_MAX_SAMPLES,
    DEFAULT_MAX_WORDS,
    DEFAULT_NUM_BUCKETS,
    IndexConfig,
};

#[derive(Debug, Parser)]
#[command(
    name = "paraindex",
    about = "Build and query a sampled keyword index of parallel sentences"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index records read from standard input
    Build(BuildArgs),
    /// Print sampled example lines for a phrase
    Lookup(LookupArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Build --

#[derive(Debug, Parser)]
pub struct BuildArgs {
    /// Index store to create (truncated if it exists)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Phrase probability store used to prune candidates
    #[arg(long)]
    pub phrase_prob: Option<PathBuf>,

    /// Keyword file restricting indexed phrases, one per line
    #[arg(long)]
    pub keywords: Option<PathBuf>,

    /// Maximum candidates kept per sentence
    #[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
    pub max_words: usize,

    /// Maximum phrase length in words
    #[arg(long, default_value_t = DEFAULT_MAX_NGRAM)]
    pub max_ngram: usize,

    /// Maximum sampled lines per phrase
    #[arg(long, default_value_t = DEFAULT_MAX_SAMPLES)]
    pub max_samples: usize,

    /// Expected number of distinct sentences
    #[arg(long, default_value_t = DEFAULT_NUM_BUCKETS)]
    pub num_buckets: usize,
}

impl BuildArgs {
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            max_words: self.max_words,
            max_ngram: self.max_ngram,
            max_samples: self.max_samples,
            num_buckets: self.num_buckets,
        }
    }
}

// -- Lookup --

#[derive(Debug, Parser)]
pub struct LookupArgs {
    /// The phrase to look up
    pub phrase: String,

    /// Index store built by `paraindex build`
    #[arg(short, long)]
    pub index: PathBuf,

    /// Number of example lines to print
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "paraindex",
            &mut std::io::stdout(),
        );
    }
}
