// ── HTTP senders ──
//
// Dashboard custom-panel calls and background URL GETs. Responses are
// never acted on: the dashboard body is validated as JSON when present
// (parse failures swallowed), URL responses are dropped outright.

use tracing::{debug, trace};

use crate::error::WireError;

/// GET `http://host:port/ajax/<payload>`.
pub async fn dashboard_call(
    http: &reqwest::Client,
    host: &str,
    port: u16,
    payload: &str,
) -> Result<(), WireError> {
    let url = format!("http://{host}:{port}/ajax/{payload}");
    debug!(%url, "dashboard web call");

    let body = http.get(&url).send().await?.text().await?;
    if !body.is_empty() && serde_json::from_str::<serde_json::Value>(&body).is_err() {
        trace!("dashboard response body was not JSON");
    }
    Ok(())
}

/// Background GET; the response is discarded.
pub async fn url_get(http: &reqwest::Client, url: &str) -> Result<(), WireError> {
    debug!(%url, "background URL request");
    http.get(url).send().await?;
    Ok(())
}
