use super::*;

pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => {
                tracing::debug!(label, attempt = i + 1, "request failed: {err:#}");
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(std::time::Duration::from_millis(200 * (1 << i)));
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

impl RemoteClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        match error_message(&body) {
            Some(msg) => anyhow::bail!("{} ({}): {}", label, status, msg),
            None if status == reqwest::StatusCode::NOT_FOUND => {
                anyhow::bail!("{}: endpoint not found (is kerpic-server running?)", label)
            }
            None => anyhow::bail!("{} status {}", label, status),
        }
    }

    /// `{base}/api/{endpoint}/{segments...}`; each segment is percent-encoded
    /// as one path component, so `/` inside an image path becomes `%2F`.
    pub(super) fn api_url(&self, segments: &[&str], endpoint: &str) -> reqwest::Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push("api")
                .push(endpoint)
                .extend(segments.iter().filter(|s| !s.is_empty()));
        }
        url
    }
}
