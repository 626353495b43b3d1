use std::time::Instant;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use super::{
    classify::classify_error_body,
    models::{ProbeConfig, ProbeOutcome, ProbeTarget},
    preview::create_preview,
};

#[derive(Debug, Error)]
pub enum ProbeUrlError {
    #[error("invalid proxy url {url}: {source}")]
    InvalidProxyUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Build the fully-qualified request URL for a probe.
///
/// Forward mode appends the target as a single percent-encoded `url` query
/// parameter; query mode appends the configured pairs, keeping any query the
/// proxy URL already carries.
pub fn build_url(config: &ProbeConfig) -> Result<Url, ProbeUrlError> {
    let mut url = Url::parse(&config.proxy_url).map_err(|source| ProbeUrlError::InvalidProxyUrl {
        url: config.proxy_url.clone(),
        source,
    })?;

    match &config.target {
        ProbeTarget::Forward(target) => {
            url.query_pairs_mut().append_pair("url", target);
        }
        ProbeTarget::Query(params) if !params.is_empty() => {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        ProbeTarget::Query(_) => {}
    }

    Ok(url)
}

/// Run one probe: a single blocking GET, classified into a [`ProbeOutcome`].
///
/// Never returns an error; every failure mode maps to an outcome variant.
pub fn run_probe(config: &ProbeConfig) -> ProbeOutcome {
    let url = match build_url(config) {
        Ok(url) => url,
        Err(err) => {
            return ProbeOutcome::UnexpectedFailure {
                message: err.to_string(),
            }
        }
    };

    let client = Client::new();
    let mut request = client.get(url);
    for (name, value) in &config.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let start = Instant::now();
    let response = match request.send() {
        Ok(response) => response,
        Err(err) => return outcome_for_send_error(err),
    };
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let bytes = match response.bytes() {
        Ok(bytes) => bytes,
        Err(err) => {
            return ProbeOutcome::UnexpectedFailure {
                message: describe(err),
            }
        }
    };

    if status.is_success() {
        ProbeOutcome::Success {
            status: status.as_u16(),
            content_type,
            preview: create_preview(&bytes, config.preview_chars),
            body: bytes.to_vec(),
            duration_ms,
        }
    } else {
        let raw_body = String::from_utf8_lossy(&bytes).into_owned();
        ProbeOutcome::UpstreamError {
            status: status.as_u16(),
            shape: classify_error_body(&raw_body),
            preview: create_preview(&bytes, config.preview_chars),
            raw_body,
            duration_ms,
        }
    }
}

fn outcome_for_send_error(err: reqwest::Error) -> ProbeOutcome {
    if err.is_connect() {
        ProbeOutcome::TransportFailure {
            reason: describe(err),
        }
    } else {
        ProbeOutcome::UnexpectedFailure {
            message: describe(err),
        }
    }
}

// Alternate formatting walks the source chain, so "connection refused" and
// DNS causes show up instead of reqwest's outer wrapper alone.
fn describe(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_url_forward_mode_round_trips_the_target() {
        let target = "https://itunes.apple.com/search?term=all ear&entity=podcast&limit=10";
        let config = ProbeConfig::forward("https://podcast-proxy.example", target);

        let url = build_url(&config).unwrap();
        let pairs: Vec<_> = url.query_pairs().collect();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "url");
        assert_eq!(pairs[0].1, target);
    }

    #[test]
    fn build_url_forward_mode_encodes_the_target() {
        let config = ProbeConfig::forward("https://proxy.example", "https://t.example/a?b=c");
        let url = build_url(&config).unwrap();
        let query = url.query().unwrap();
        assert!(!query.contains("https://"));
        assert!(query.starts_with("url="));
    }

    #[test]
    fn build_url_query_mode_appends_pairs() {
        let config = ProbeConfig::query(
            "https://llm-proxy.example/v1beta/models",
            vec![("key".to_string(), "INVALID_KEY_FOR_TESTING".to_string())],
        );
        let url = build_url(&config).unwrap();
        assert_eq!(url.query(), Some("key=INVALID_KEY_FOR_TESTING"));
    }

    #[test]
    fn build_url_query_mode_keeps_existing_query() {
        let config = ProbeConfig::query(
            "https://proxy.example/search?entity=podcast",
            vec![("limit".to_string(), "10".to_string())],
        );
        let url = build_url(&config).unwrap();
        let pairs: Vec<_> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("entity".to_string(), "podcast".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn build_url_rejects_malformed_proxy_urls() {
        let config = ProbeConfig::forward("not a proxy url", "https://t.example");
        let err = build_url(&config).unwrap_err();
        assert!(err.to_string().contains("invalid proxy url"));
    }
}
