use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::WortbotConfig;

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["wortbot.toml", "wortbot.yaml", "wortbot.yml", "wortbot.json"];

/// Load config from the given path (format chosen by extension).
pub fn load_config(path: &Path) -> anyhow::Result<WortbotConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    parse_config(&raw, path)
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<WortbotConfig> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("toml")
        .to_ascii_lowercase();

    let cfg = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid YAML in {}: {e}", path.display()))?,
        "json" => serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {e}", path.display()))?,
        _ => toml::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid TOML in {}: {e}", path.display()))?,
    };
    Ok(cfg)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./wortbot.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/wortbot/wortbot.{toml,yaml,yml,json}` (user-global)
///
/// Returns `WortbotConfig::default()` if no config file is found or the
/// found file fails to parse (with a warning).
pub fn discover_and_load() -> WortbotConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    WortbotConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "wortbot") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wortbot.toml");
        std::fs::write(&path, "[browser]\npool_size = 4\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.browser.pool_size, 4);
    }

    #[test]
    fn loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wortbot.json");
        std::fs::write(&path, r#"{"templates": {"client_id": "abc"}}"#).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.templates.client_id, "abc");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/wortbot.toml")).is_err());
    }
}
