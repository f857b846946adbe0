use iterdns_domain::{CliOverrides, Config};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let source = path
        .map(str::to_string)
        .or_else(Config::get_config_path)
        .unwrap_or_else(|| "built-in defaults".to_string());

    let config = Config::load(path, overrides)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration from {}: {}", source, e))?;

    Ok(config)
}
