//! Timetable uploader
//!
//! Sends a timetable workbook to a running server, once per shift, and prints
//! what was imported.
//!
//! Usage:
//!   `cargo run --bin upload_timetable -- timetable.xlsx --shift 1 --shift 2`
//!   `cargo run --bin upload_timetable -- timetable.xlsx --dry-run`

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, Command};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, multipart};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::time::Duration;

pub struct Uploader {
    base_url: String,
    client: Client,
    dry_run: bool,
}

impl Uploader {
    pub fn new(base_url: &str, dry_run: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    fn endpoint(&self) -> String {
        let action = if self.dry_run { "preview" } else { "import" };
        format!("{}/api/schedule/{action}", self.base_url)
    }

    async fn upload(&self, file_path: &Path, file_data: &[u8], shift: &str) -> Result<Value> {
        let file_name = file_path
            .file_name()
            .map_or_else(|| "timetable.xlsx".to_string(), |n| n.to_string_lossy().to_string());

        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(file_data.to_vec())
                    .file_name(file_name)
                    .mime_str("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")?,
            )
            .text("shift", shift.to_string());

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Could not reach {}", self.base_url))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Server answered with something other than JSON")?;

        if status.is_success() {
            Ok(body)
        } else {
            let reason = body["error"]["message"]
                .as_str()
                .or_else(|| body["error"].as_str())
                .unwrap_or("no details");
            bail!("HTTP {status}: {reason}")
        }
    }

    fn print_summary(&self, shift: &str, body: &Value) {
        let classes = body["classes"]
            .as_array()
            .map(|c| {
                c.iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        println!(
            "{} Shift {} from sheet '{}': {}",
            style("✅").green(),
            style(shift).bold(),
            body["sheet_name"].as_str().unwrap_or("?"),
            style(classes).cyan()
        );

        if self.dry_run {
            let lessons = body["lessons"].as_array().map_or(0, Vec::len);
            println!("   {} lessons found, nothing stored", style(lessons).bold());
        } else {
            println!(
                "   {} stored, {} failed, {} old lessons replaced in {} ms",
                style(&body["lessons_persisted"]).bold().green(),
                style(&body["lessons_failed"]).bold().red(),
                body["lessons_deleted"],
                body["processing_time_ms"]
            );
        }
    }

    pub async fn run(&self, file_path: &Path, shifts: &[String]) -> Result<usize> {
        let file_data = std::fs::read(file_path)
            .with_context(|| format!("Could not read {}", file_path.display()))?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.blue} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));

        let mut failures = 0;
        for shift in shifts {
            pb.set_message(format!("Uploading shift {shift}..."));
            let outcome = self.upload(file_path, &file_data, shift).await;
            pb.suspend(|| match &outcome {
                Ok(body) => self.print_summary(shift, body),
                Err(e) => {
                    println!("{} Shift {shift} failed: {e:#}", style("⚠️").yellow());
                }
            });
            if outcome.is_err() {
                failures += 1;
            }
        }

        pb.finish_and_clear();
        Ok(failures)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Timetable Uploader")
        .version("1.0")
        .about("Uploads a timetable workbook to the timetable API")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Timetable workbook (.xlsx or .xls)")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("shift")
                .short('s')
                .long("shift")
                .value_name("SHIFT")
                .help("Shift to import; repeat for several shifts")
                .action(ArgAction::Append)
                .default_value("1"),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Only show what would be imported")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let file_path = matches
        .get_one::<PathBuf>("file")
        .context("FILE is required")?
        .clone();
    let shifts: Vec<String> = matches
        .get_many::<String>("shift")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let base_url = matches
        .get_one::<String>("url")
        .context("URL is required")?
        .clone();
    let dry_run = matches.get_flag("dry-run");

    println!("{}", style("Timetable Uploader").bold());
    println!("{}", style("━".repeat(40)).dim());
    println!("API URL: {}", style(&base_url).cyan());
    println!("File:    {}", style(file_path.display()).cyan());
    if dry_run {
        println!("{}", style("Dry run: lessons will not be stored").yellow());
    }

    let failures = Uploader::new(&base_url, dry_run)?
        .run(&file_path, &shifts)
        .await?;

    if failures > 0 {
        bail!("{failures} of {} shifts failed", shifts.len());
    }
    Ok(())
}
