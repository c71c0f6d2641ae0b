use reqwest::Client;
use url::Url;

use super::markup::element_text;
use crate::error::ProbeError;

/// Element in the trigger response that carries the summary artifact URL.
const SUMMARY_CSV_ELEMENT: &str = "summaryCSV";

/// Build the `runtest.php` URL that starts a test run for `target_url`.
pub fn build_runtest_url(
    test_server: &str,
    target_url: &str,
    runs: u32,
    first_view_only: bool,
) -> Result<Url, ProbeError> {
    let mut url = Url::parse(test_server)?;
    url.path_segments_mut()
        .map_err(|_| ProbeError::ServerUrl(test_server.to_string()))?
        .pop_if_empty()
        .push("runtest.php");

    url.query_pairs_mut()
        .append_pair("runs", &runs.to_string())
        .append_pair("f", "xml")
        .append_pair("fvonly", if first_view_only { "1" } else { "0" })
        .append_pair("url", target_url);

    Ok(url)
}

/// Start a test run and return the URL of its summary CSV artifact.
/// Fails when the request fails or the response carries no `summaryCSV`
/// element.
pub async fn trigger_test(client: &Client, run_url: &Url) -> Result<String, ProbeError> {
    log::info!("Triggering test run: {run_url}");

    let body = client.get(run_url.clone()).send().await?.text().await?;

    let csv_url = element_text(&body, SUMMARY_CSV_ELEMENT)
        .filter(|text| !text.is_empty())
        .ok_or(ProbeError::MissingElement(SUMMARY_CSV_ELEMENT))?;

    log::debug!("Summary artifact at {csv_url}");

    Ok(csv_url.to_string())
}
