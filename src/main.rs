use std::time::Duration;

use reqwest::Client;

use pageprobe::config::app_config::load_config;
use pageprobe::config::model::Config;
use pageprobe::error::{ProbeError, report};
use pageprobe::pagetest::poll::{PollConfig, poll_summary};
use pageprobe::pagetest::trigger::{build_runtest_url, trigger_test};
use pageprobe::store::client::ResultStore;
use pageprobe::summary::parse::parse_summary;
use pageprobe::summary::result::TestResult;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = load_config();

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("pageprobe/1.0")
        .build()
        .expect("Failed to create client");

    match run(&config, &client).await {
        Ok(result) => {
            println!(
                "✅ {}: load {}ms, first byte {}ms (tested {})",
                config.target_url,
                result.load_time,
                result.time_to_first_byte,
                result.timestamp_of_test
            );
        }
        Err(e) => {
            eprintln!("❌ Test run for {} failed: {}", config.target_url, report(&e));
            std::process::exit(1);
        }
    }
}

/// One full run: trigger the test, wait for the summary artifact, map it,
/// record it.
async fn run(config: &Config, client: &Client) -> Result<TestResult, ProbeError> {
    let run_url = build_runtest_url(
        &config.test_server,
        &config.target_url,
        config.runs,
        config.first_view_only,
    )?;
    let csv_url = trigger_test(client, &run_url).await?;

    let poll = PollConfig {
        interval: Duration::from_secs(config.poll_interval_seconds),
        max_attempts: config.max_poll_attempts,
    };
    let body = poll_summary(client, &csv_url, &poll).await?;

    let result = parse_summary(&body, &csv_url)?;

    let store = ResultStore::connect(&config.database).await?;
    store.ensure_schema().await?;
    store.insert_result(&result).await?;
    store.close().await;

    Ok(result)
}
