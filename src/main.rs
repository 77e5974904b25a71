use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use job_extractor::{envelope, extract_job, review, ExtractError, Schema};

#[derive(Parser)]
#[command(name = "extract-job", about = "Extract job posting fields from HTML using a JSON schema")]
struct Cli {
    /// HTML file to read, or "-" for stdin
    #[arg(long)]
    html: PathBuf,
    /// Extraction schema (JSON)
    #[arg(long)]
    schema: PathBuf,
    /// Reference date for relative dates like "3 days ago" (default: today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Print the schema summary to stderr before extracting
    #[arg(long)]
    summary: bool,
    /// Add review issues and the report grade to the output
    #[arg(long)]
    review: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn read_html(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("failed to read HTML from stdin")?;
        return Ok(html);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read HTML file {}", path.display()))
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let html = read_html(&cli.html)?;

    let (result, schema) = match Schema::load(&cli.schema) {
        Ok(schema) => {
            if cli.summary {
                eprintln!("{}", schema.summary());
            }
            (extract_job(&html, &schema, today), Some(schema))
        }
        Err(e) => (Err(ExtractError::from(e)), None),
    };

    let mut output = envelope(&result);
    if let (true, Ok(data), Some(schema)) = (cli.review, &result, &schema) {
        output["review"] = serde_json::to_value(review(data, schema))?;
    }

    let text = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", text);

    Ok(match result {
        Ok(data) => {
            tracing::info!(grade = %data.extraction.quality_grade, routing = ?data.extraction.quality_grade.routing(), "done");
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    })
}
