//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values
//! without repeating boilerplate across crate boundaries.

use frostlink_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .host("cryo.lab")
///     .mode("operator")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.connection.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.connection.port = port;
        self
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.config.connection.mode = mode.to_string();
        self
    }

    pub fn geometry(mut self, num_channels: u16, num_heaters: u16) -> Self {
        self.config.connection.num_channels = num_channels;
        self.config.connection.num_heaters = num_heaters;
        self
    }

    pub fn inline_key(mut self, value: &str) -> Self {
        self.config.auth.source = "inline".to_string();
        self.config.auth.value = Some(value.to_string());
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
