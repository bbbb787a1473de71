use std::path::PathBuf;

use eyre::{Result, WrapErr, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use ytscore::evaluate::DEFAULT_MODEL;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytscore.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytscore")
        .join("logs")
}

fn key_status(var: &str, note: &str) -> String {
    match std::env::var(var) {
        Ok(_) => format!("  \x1b[32m✅\x1b[0m {var}"),
        Err(_) => format!("  \x1b[31m❌\x1b[0m {var}     (not set — {note})"),
    }
}

fn build_after_help() -> String {
    let openai_line = key_status("OPENAI_API_KEY", "needed for evaluation with the default model");
    let anthropic_line = key_status("ANTHROPIC_API_KEY", "needed only for claude-* models");

    let log_path = log_dir().join("ytscore.log");

    format!(
        "\nCREDENTIALS:\n{openai_line}\n{anthropic_line}\n\nLogs are written to: {}",
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytscore::config::Config::load().unwrap_or_default();

    // Apply config defaults (CLI flags take priority)
    let lang = cli
        .lang
        .clone()
        .or(config.default_lang)
        .unwrap_or_else(|| "en".to_string());
    let model = cli
        .model
        .clone()
        .or(config.default_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let format = cli.format.unwrap_or(match config.default_format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    });

    if cli.verbose {
        let config_path = ytscore::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        debug!("Resolved lang={lang} model={model}");
    }

    let client = reqwest::Client::new();

    // Resolve the transcript: manual file or fetched captions
    let transcript = if let Some(ref path) = cli.transcript_file {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("could not read transcript file: {}", path.display()))?;
        if cli.video_file.is_some() && text.trim().is_empty() {
            warn!("video file supplied with an empty transcript file");
            eprintln!("Warning: transcript extraction from video files is not enabled yet.");
        }
        ytscore::Transcript::manual(&text, &lang)
    } else if let Some(ref url) = cli.url {
        let url = url.trim();
        ytscore::youtube::fetch_transcript(&client, url, &lang)
            .await
            .wrap_err("failed to fetch transcript")?
    } else if cli.video_file.is_some() {
        warn!("video file supplied without a transcript");
        eprintln!("Warning: transcript extraction from video files is not enabled yet.");
        eprintln!("Pass --transcript-file alongside --video-file.");
        ytscore::Transcript::manual("", &lang)
    } else {
        bail!(
            "no URL or transcript provided\n\nUsage: ytscore <URL> --title <TITLE>\n       ytscore --transcript-file <FILE> --title <TITLE>"
        );
    };

    if cli.verbose {
        eprintln!(
            "Video: {} ({})\nSource: {}\nLanguage: {}\nSegments: {}",
            transcript.title,
            transcript.video_id,
            transcript.source,
            transcript.language,
            transcript.segments.len(),
        );
    }

    if cli.fetch_only {
        let rendered = match format {
            OutputFormat::Text => ytscore::output::render_text(&transcript),
            OutputFormat::Json => ytscore::output::render_json(&transcript)?,
        };

        if let Some(ref path) = cli.output {
            std::fs::write(path, &rendered)?;
            if cli.verbose {
                eprintln!("Transcript written to: {}", path.display());
            }
        } else {
            println!("{rendered}");
        }

        return Ok(());
    }

    // Fall back to the fetched video title when --title is omitted
    let title = match cli.title {
        Some(ref t) => t.clone(),
        None if !transcript.title.is_empty() => transcript.title.clone(),
        None => String::new(),
    };

    if cli.verbose {
        eprintln!("Analyzing video...");
    }

    let result =
        ytscore::evaluate::evaluate(&client, &title, &cli.description, &transcript.text(), &model).await?;

    let rendered = match format {
        OutputFormat::Text => ytscore::output::render_evaluation(&result),
        OutputFormat::Json => result.trim().to_string(),
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            eprintln!("Evaluation written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }

    Ok(())
}
