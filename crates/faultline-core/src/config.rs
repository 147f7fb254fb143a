//! Configuration for Faultline clients.
//!
//! Provides the immutable [`Config`] consumed by client construction and a
//! [`ConfigBuilder`] for assembling it from a required endpoint plus
//! optional settings.

use thiserror::Error;

/// Errors produced while building a [`Config`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The endpoint identifier was empty.
    #[error("endpoint must be provided")]
    EmptyEndpoint,

    /// A sample rate was outside the `[0.0, 1.0]` range.
    #[error("{field} must be within 0.0..=1.0, got {value}")]
    SampleRateOutOfRange {
        /// The offending field, `"sample_rate"` or `"traces_sample_rate"`.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Immutable client configuration.
///
/// Built once via [`ConfigBuilder`], consumed by client construction, never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string identifying the ingestion target. Opaque to the
    /// core; transports interpret it at construction time.
    pub endpoint: String,
    /// Deployment environment label attached to every event.
    pub environment: String,
    /// Release identifier attached to every event, if known.
    pub release: Option<String>,
    /// Enables verbose internal logging of capture decisions.
    pub debug: bool,
    /// Fraction of captured events that are actually submitted (0.0..=1.0).
    pub sample_rate: f64,
    /// Fraction of traces to sample (0.0..=1.0). Reserved for transaction
    /// support; carried through to the client untouched.
    pub traces_sample_rate: f64,
    /// Bound of each scope's breadcrumb ring buffer.
    pub max_breadcrumbs: usize,
    /// Whether error and recovered-failure events carry a backtrace.
    pub attach_stacktrace: bool,
    /// Whether the panic guard resumes unwinding after reporting.
    pub rethrow_after_recover: bool,
}

impl Config {
    /// Start building a configuration for the given endpoint.
    pub fn builder(endpoint: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(endpoint)
    }
}

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from documented defaults and allows selective overrides. Setters
/// apply in call order, so a later setter wins for the same field.
///
/// # Example
///
/// ```rust
/// use faultline_core::config::Config;
///
/// let config = Config::builder("https://ingest.example.com/events")
///     .environment("staging")
///     .release("myapp@1.4.2")
///     .sample_rate(0.5)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default values for everything but the
    /// endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            config: Config {
                endpoint: endpoint.into(),
                environment: "production".to_string(),
                release: None,
                debug: false,
                sample_rate: 1.0,
                traces_sample_rate: 0.0,
                max_breadcrumbs: 100,
                attach_stacktrace: true,
                rethrow_after_recover: false,
            },
        }
    }

    /// Sets the environment label (default `"production"`).
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.config.environment = environment.into();
        self
    }

    /// Sets the release identifier.
    pub fn release(mut self, release: impl Into<String>) -> Self {
        self.config.release = Some(release.into());
        self
    }

    /// Enables or disables verbose capture logging (default off).
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Sets the event sample rate (default `1.0`).
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.config.sample_rate = rate;
        self
    }

    /// Sets the trace sample rate (default `0.0`).
    pub fn traces_sample_rate(mut self, rate: f64) -> Self {
        self.config.traces_sample_rate = rate;
        self
    }

    /// Sets the breadcrumb ring buffer bound (default `100`).
    pub fn max_breadcrumbs(mut self, max: usize) -> Self {
        self.config.max_breadcrumbs = max;
        self
    }

    /// Enables or disables backtrace capture on error events (default on).
    pub fn attach_stacktrace(mut self, attach: bool) -> Self {
        self.config.attach_stacktrace = attach;
        self
    }

    /// Whether [`protect`](https://docs.rs/faultline-report) resumes
    /// unwinding after reporting a panic (default off).
    pub fn rethrow_after_recover(mut self, rethrow: bool) -> Self {
        self.config.rethrow_after_recover = rethrow;
        self
    }

    /// Validate and return the finished [`Config`].
    pub fn build(self) -> Result<Config, ConfigError> {
        if self.config.endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if !(0.0..=1.0).contains(&self.config.sample_rate) {
            return Err(ConfigError::SampleRateOutOfRange {
                field: "sample_rate",
                value: self.config.sample_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.config.traces_sample_rate) {
            return Err(ConfigError::SampleRateOutOfRange {
                field: "traces_sample_rate",
                value: self.config.traces_sample_rate,
            });
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let cfg = Config::builder("https://ingest.example.com").build().unwrap();
        assert_eq!(cfg.environment, "production");
        assert_eq!(cfg.release, None);
        assert!(!cfg.debug);
        assert_eq!(cfg.sample_rate, 1.0);
        assert_eq!(cfg.traces_sample_rate, 0.0);
        assert_eq!(cfg.max_breadcrumbs, 100);
        assert!(cfg.attach_stacktrace);
        assert!(!cfg.rethrow_after_recover);
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = Config::builder("https://ingest.example.com")
            .environment("staging")
            .release("app@2.0.0")
            .debug(true)
            .sample_rate(0.25)
            .traces_sample_rate(0.1)
            .max_breadcrumbs(10)
            .attach_stacktrace(false)
            .rethrow_after_recover(true)
            .build()
            .unwrap();

        assert_eq!(cfg.environment, "staging");
        assert_eq!(cfg.release.as_deref(), Some("app@2.0.0"));
        assert!(cfg.debug);
        assert_eq!(cfg.sample_rate, 0.25);
        assert_eq!(cfg.traces_sample_rate, 0.1);
        assert_eq!(cfg.max_breadcrumbs, 10);
        assert!(!cfg.attach_stacktrace);
        assert!(cfg.rethrow_after_recover);
    }

    #[test]
    fn later_setter_wins() {
        let cfg = Config::builder("https://ingest.example.com")
            .environment("staging")
            .environment("development")
            .sample_rate(0.2)
            .sample_rate(0.8)
            .build()
            .unwrap();
        assert_eq!(cfg.environment, "development");
        assert_eq!(cfg.sample_rate, 0.8);
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let err = Config::builder("").build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyEndpoint);
    }

    #[test]
    fn out_of_range_sample_rate_is_rejected() {
        let err = Config::builder("https://ingest.example.com")
            .sample_rate(1.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SampleRateOutOfRange {
                field: "sample_rate",
                ..
            }
        ));

        let err = Config::builder("https://ingest.example.com")
            .traces_sample_rate(-0.1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SampleRateOutOfRange {
                field: "traces_sample_rate",
                ..
            }
        ));
    }

    #[test]
    fn boundary_sample_rates_are_accepted() {
        for rate in [0.0, 1.0] {
            let cfg = Config::builder("https://ingest.example.com")
                .sample_rate(rate)
                .traces_sample_rate(rate)
                .build();
            assert!(cfg.is_ok(), "rate {rate} should be valid");
        }
    }
}
