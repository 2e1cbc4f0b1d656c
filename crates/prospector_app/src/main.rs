//! Minimal operator CLI: start one pipeline run against the configured
//! backend and follow it to completion.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use prospector_app::logging::{self, LogDestination};
use prospector_app::DashboardClient;
use prospector_core::{JobParams, JobPhase};

fn main() -> Result<()> {
    logging::initialize(LogDestination::Both);

    let base_url = std::env::var("PROSPECTOR_API_URL")
        .context("PROSPECTOR_API_URL must point at the backend")?;
    let keywords: Vec<String> = std::env::args().skip(1).collect();
    if keywords.is_empty() {
        bail!("usage: prospector_app <keyword>...");
    }

    let client = DashboardClient::connect(&base_url)?;
    client.start_job(JobParams {
        keywords,
        ..JobParams::default()
    });

    let outcome = follow_run(&client)?;

    // The terminal status triggered a lead refresh; give it a moment to
    // land before reading the counts.
    std::thread::sleep(Duration::from_secs(1));
    println!(
        "{outcome:?}: {} leads with email, {} without",
        client.leads_with_email().len(),
        client.leads_without_email().len()
    );

    client.shutdown();
    Ok(())
}

fn follow_run(client: &DashboardClient) -> Result<JobPhase> {
    let mut last_step = String::new();
    let started = Instant::now();
    loop {
        std::thread::sleep(Duration::from_secs(1));

        if let Some(alert) = client.alert() {
            bail!("run aborted: {alert}");
        }
        let Some(job) = client.current_job_status() else {
            if started.elapsed() > Duration::from_secs(30) {
                bail!("backend accepted nothing within 30s");
            }
            continue;
        };

        if job.current_step != last_step {
            println!(
                "{}: {} discovered, {} processed, {} emails found",
                job.current_step,
                job.channels_discovered,
                job.channels_processed,
                job.emails_found
            );
            last_step = job.current_step.clone();
        }
        if !client.is_processing() {
            for error in &job.errors {
                eprintln!("pipeline error: {error}");
            }
            return Ok(job.status);
        }
    }
}
