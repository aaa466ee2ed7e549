//! Environment variable source: BULKTRACER_ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses BULKTRACER prefix and __ as separator for nested keys,
/// e.g. `BULKTRACER__PROBE__IDLE_TIMEOUT_SECS=60`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("BULKTRACER")
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("probe.excluded_agents")
            .try_parsing(true),
    );
    Ok(builder)
}
