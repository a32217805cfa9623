use crate::types::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            // Every field has a serde default, so a missing file means defaults.
            return Ok(Config::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::Config;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.edge.binary_threshold, 127);
        assert_eq!(config.edge.row_stride, 2);
        assert_eq!(config.tangent.slope_history, 5);
        assert_eq!(config.fit.max_radius_px, 600.0);
    }

    #[test]
    fn test_partial_override() {
        let yaml = "fit:\n  max_iterations: 20\n  min_radius_px: 2.0\n  max_radius_px: 900.0\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.fit.max_radius_px, 900.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.marker.hue_max, 20.0);
    }
}
