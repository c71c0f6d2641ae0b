use std::env;

use super::model::Config;

/// Load the application configuration from a YAML file and environment variables.
/// This function reads the configuration file specified by the `CONFIG_FILE`
/// environment variable (default `config.yml`), parses it into a `Config`
/// struct, and overrides the test server address with `TEST_SERVER` when set.
pub fn load_config() -> Config {
    let config_file_location = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yml".to_string());
    let config_str =
        std::fs::read_to_string(&config_file_location).expect("Failed to read config.yml");

    let mut config: Config = serde_yaml::from_str(&config_str).expect("Invalid YAML");

    if let Ok(test_server) = env::var("TEST_SERVER") {
        config.test_server = test_server;
    }

    log::info!("Using test server: {}", config.test_server);

    config
}
