//! HTTP sink - one POST per event

use eyre::{Context, Result};
use ureq::Agent;
use ureq::tls::TlsConfig;

use super::{Sink, SinkOptions};
use crate::envelope::{Envelope, client_user_agent};

/// Header carrying the client identity alongside `User-Agent`
pub const CLIENT_HEADER: &str = "X-Testinel-Client";

/// POSTs each envelope to a fixed URL
pub struct HttpSink {
    url: String,
    agent: Agent,
    user_agent: String,
    verify_tls: bool,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, options: &SinkOptions) -> Self {
        let url = url.into();

        if options.insecure_skip_verify {
            log::warn!("TLS certificate verification is disabled for {}", url);
        }

        let config = Agent::config_builder()
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(options.insecure_skip_verify)
                    .build(),
            )
            .timeout_global(options.timeout())
            .build();

        Self {
            url,
            agent: Agent::new_with_config(config),
            user_agent: client_user_agent(),
            verify_tls: !options.insecure_skip_verify,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether server certificates are checked
    pub fn verifies_tls(&self) -> bool {
        self.verify_tls
    }
}

impl Sink for HttpSink {
    fn name(&self) -> &'static str {
        "http"
    }

    fn record_event(&mut self, event: &Envelope) -> Result<()> {
        let body = serde_json::to_string(event).context("Failed to serialize event")?;

        self.agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("User-Agent", &self.user_agent)
            .header(CLIENT_HEADER, &self.user_agent)
            .send(body.as_bytes())
            .with_context(|| format!("Failed to POST event to {}", self.url))?;

        log::debug!("Posted '{}' event to {}", event.event, self.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_url() {
        let sink = HttpSink::new("https://example.test/ingest", &SinkOptions::default());
        assert_eq!(sink.url(), "https://example.test/ingest");
        assert_eq!(sink.name(), "http");
        assert!(sink.verifies_tls());
    }

    #[test]
    fn test_insecure_option_disables_verification() {
        let options = SinkOptions {
            insecure_skip_verify: true,
            timeout_secs: Some(2),
            ..Default::default()
        };
        let mut sink = HttpSink::new("https://127.0.0.1:9/ingest", &options);
        assert!(!sink.verifies_tls());

        // Nothing listens there, so delivery still fails with the sink's context
        let err = sink.record_event(&Envelope::end("run-1")).unwrap_err();
        assert!(err.to_string().contains("Failed to POST event"));
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let options = SinkOptions {
            timeout_secs: Some(2),
            ..Default::default()
        };
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let mut sink = HttpSink::new("http://127.0.0.1:9/ingest", &options);

        let err = sink.record_event(&Envelope::end("run-1")).unwrap_err();
        assert!(err.to_string().contains("Failed to POST event"));
    }
}
