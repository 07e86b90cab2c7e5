//! Request helpers shared by both gateways.

use serde::de::DeserializeOwned;

use crate::SourceError;

/// Longest error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// `GET url` and decode a successful JSON body into `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, SourceError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let mut body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
        return Err(SourceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}
