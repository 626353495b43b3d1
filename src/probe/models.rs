use super::classify::ErrorBodyShape;

/// Default bound for body previews, in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// Everything needed to run one probe against a proxy deployment.
///
/// Built once by the caller and not modified afterwards; each probe run is
/// independent.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub proxy_url: String,
    pub target: ProbeTarget,
    pub headers: Vec<(String, String)>,
    pub preview_chars: usize,
}

/// How the request URL is derived from the proxy base URL.
#[derive(Debug, Clone)]
pub enum ProbeTarget {
    /// Forward a full target URL through the proxy's `url` query parameter.
    Forward(String),
    /// Append query parameters directly to the proxy URL.
    Query(Vec<(String, String)>),
}

impl ProbeConfig {
    pub fn forward(proxy_url: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            target: ProbeTarget::Forward(target_url.into()),
            headers: Vec::new(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn query(proxy_url: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            target: ProbeTarget::Query(params),
            headers: Vec::new(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }
}

/// Result of a single probe run. Exactly one variant per run.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// The proxy answered with a success status.
    Success {
        status: u16,
        content_type: Option<String>,
        preview: String,
        body: Vec<u8>,
        duration_ms: f64,
    },
    /// The proxy answered with an error status; the body has been classified.
    UpstreamError {
        status: u16,
        shape: ErrorBodyShape,
        preview: String,
        raw_body: String,
        duration_ms: f64,
    },
    /// The connection could not be established (DNS, TCP connect, TLS).
    TransportFailure { reason: String },
    /// Anything else that went wrong while probing.
    UnexpectedFailure { message: String },
}

impl ProbeOutcome {
    /// Fatal outcomes signal a deployment or availability problem and should
    /// terminate the process with a non-zero exit code. A classified upstream
    /// error is a successful diagnosis, not a fatal one.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProbeOutcome::TransportFailure { .. } | ProbeOutcome::UnexpectedFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_outcomes_are_transport_and_unexpected() {
        let transport = ProbeOutcome::TransportFailure {
            reason: "connection refused".to_string(),
        };
        let unexpected = ProbeOutcome::UnexpectedFailure {
            message: "boom".to_string(),
        };
        assert!(transport.is_fatal());
        assert!(unexpected.is_fatal());

        let success = ProbeOutcome::Success {
            status: 200,
            content_type: None,
            preview: String::new(),
            body: Vec::new(),
            duration_ms: 1.0,
        };
        let upstream = ProbeOutcome::UpstreamError {
            status: 400,
            shape: ErrorBodyShape::NotJson,
            preview: String::new(),
            raw_body: String::new(),
            duration_ms: 1.0,
        };
        assert!(!success.is_fatal());
        assert!(!upstream.is_fatal());
    }

    #[test]
    fn config_builders_cover_both_target_modes() {
        let forward = ProbeConfig::forward("https://proxy.example", "https://target.example")
            .with_header("user-agent", "probe/1.0")
            .with_preview_chars(80);
        assert!(matches!(forward.target, ProbeTarget::Forward(ref t) if t == "https://target.example"));
        assert_eq!(forward.headers.len(), 1);
        assert_eq!(forward.preview_chars, 80);

        let query = ProbeConfig::query(
            "https://proxy.example/v1",
            vec![("key".to_string(), "abc".to_string())],
        );
        assert!(matches!(query.target, ProbeTarget::Query(ref p) if p.len() == 1));
        assert_eq!(query.preview_chars, DEFAULT_PREVIEW_CHARS);
    }
}
