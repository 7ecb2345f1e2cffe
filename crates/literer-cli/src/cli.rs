use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "literer")]
#[command(about = "Literature review drafting with LLMs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Completion model (overrides config)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive search queries for a topic
    Keywords {
        topic: String,

        /// Number of queries
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
    },

    /// Search Semantic Scholar
    Papers(PapersArgs),

    /// Draft a literature review for a topic
    Review(ReviewArgs),

    /// Get editor feedback on a draft, optionally revising it
    Feedback(FeedbackArgs),

    /// Preview how a draft is split into chunks
    Chunks {
        file: PathBuf,

        /// Token budget per chunk (default from config)
        #[arg(long)]
        tokens: Option<usize>,
    },

    /// List top journals for a field
    Journals {
        field: String,

        /// Show the full list instead of the top five
        #[arg(long)]
        all: bool,
    },

    /// List models available to the API key
    Models,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct PapersArgs {
    pub keyword: String,

    /// Maximum number of papers (capped at 100)
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub year_start: Option<u32>,

    #[arg(long)]
    pub year_end: Option<u32>,

    /// Venue filter (repeatable)
    #[arg(long = "venue")]
    pub venues: Vec<String>,

    /// Field of study filter (repeatable)
    #[arg(long = "field")]
    pub fields: Vec<String>,

    /// Publication type filter (repeatable)
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Write the BibTeX bibliography to this file
    #[arg(long)]
    pub bib: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ReviewArgs {
    pub topic: String,

    /// Number of search queries to derive
    #[arg(long, default_value = "3")]
    pub keywords: usize,

    /// Publications per query (default from config)
    #[arg(long)]
    pub publications: Option<usize>,

    /// Plain citations instead of TeX \textcite / \parencite
    #[arg(long)]
    pub no_tex: bool,

    /// Write the BibTeX bibliography to this file
    #[arg(long)]
    pub bib: Option<PathBuf>,

    /// Write the review to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct FeedbackArgs {
    /// Draft to review
    pub file: PathBuf,

    /// Target journal (repeatable)
    #[arg(long = "journal", required = true)]
    pub journals: Vec<String>,

    /// Token budget per chunk (default from config)
    #[arg(long)]
    pub tokens: Option<usize>,

    /// Also rewrite each chunk according to its feedback
    #[arg(long)]
    pub revise: bool,

    /// Write the result to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}
