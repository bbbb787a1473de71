use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytscore",
    about = "YouTube video relevance evaluator",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL or video ID
    pub url: Option<String>,

    /// Video title to score the transcript against (defaults to the fetched title)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Video description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Read the transcript from a file instead of fetching captions
    #[arg(long, conflicts_with = "url")]
    pub transcript_file: Option<PathBuf>,

    /// Local video file; transcript extraction from video files is not
    /// enabled yet, so a transcript file must accompany it
    #[arg(long, conflicts_with = "url")]
    pub video_file: Option<PathBuf>,

    /// Fetch and print the transcript without evaluating
    #[arg(long)]
    pub fetch_only: bool,

    /// Output format: text (default), json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// LLM model for evaluation
    #[arg(long)]
    pub model: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show fetch metadata and progress
    #[arg(short, long)]
    pub verbose: bool,
}
