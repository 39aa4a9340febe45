use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Config, CoreError, DateRange};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub search: Option<SearchConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_date_range: Option<String>,
    pub debounce_ms: Option<u64>,
    pub scroll_threshold_rows: Option<u16>,
    pub discard_stale_responses: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

/// Platform config directory path: `<config_dir>/paperdeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paperdeck").join("config.toml"))
}

/// Load config by cascading CWD `.paperdeck.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".paperdeck.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (base_api, over_api) = (base.api.unwrap_or_default(), overlay.api.unwrap_or_default());
    let (base_search, over_search) = (
        base.search.unwrap_or_default(),
        overlay.search.unwrap_or_default(),
    );
    let (base_disp, over_disp) = (
        base.display.unwrap_or_default(),
        overlay.display.unwrap_or_default(),
    );

    ConfigFile {
        api: Some(ApiConfig {
            base_url: over_api.base_url.or(base_api.base_url),
            timeout_secs: over_api.timeout_secs.or(base_api.timeout_secs),
        }),
        search: Some(SearchConfig {
            default_date_range: over_search
                .default_date_range
                .or(base_search.default_date_range),
            debounce_ms: over_search.debounce_ms.or(base_search.debounce_ms),
            scroll_threshold_rows: over_search
                .scroll_threshold_rows
                .or(base_search.scroll_threshold_rows),
            discard_stale_responses: over_search
                .discard_stale_responses
                .or(base_search.discard_stale_responses),
        }),
        display: Some(DisplayConfig {
            theme: over_disp.theme.or(base_disp.theme),
            fps: over_disp.fps.or(base_disp.fps),
        }),
    }
}

/// Save a config to `path`, creating parent directories as needed.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| CoreError::Config(format!("failed to create config directory: {e}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| CoreError::Config(format!("failed to serialize config: {e}")))?;
    std::fs::write(path, content)
        .map_err(|e| CoreError::Config(format!("failed to write config: {e}")))?;
    Ok(())
}

/// Save to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, CoreError> {
    let path = config_path()
        .ok_or_else(|| CoreError::Config("could not determine config directory".to_string()))?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Fill `config` from the file. Only sets values that are `Some` (and
/// non-empty); an unknown date range tag is an error.
pub fn apply_to_config(file_cfg: &ConfigFile, config: &mut Config) -> Result<(), CoreError> {
    if let Some(api) = &file_cfg.api {
        if let Some(url) = api.base_url.as_ref().filter(|u| !u.is_empty()) {
            config.base_url = url.clone();
        }
        if let Some(t) = api.timeout_secs {
            config.timeout_secs = t.max(1);
        }
    }
    if let Some(search) = &file_cfg.search {
        if let Some(tag) = search.default_date_range.as_ref().filter(|t| !t.is_empty()) {
            config.default_date_range = tag.parse::<DateRange>()?;
        }
        if let Some(ms) = search.debounce_ms {
            config.debounce_ms = ms;
        }
        if let Some(rows) = search.scroll_threshold_rows {
            config.scroll_threshold_rows = rows;
        }
        if let Some(discard) = search.discard_stale_responses {
            config.discard_stale_responses = discard;
        }
    }
    Ok(())
}

/// Environment variable overriding `[api] base_url`.
pub const ENV_API_URL: &str = "PAPERDECK_API_URL";
/// Environment variable overriding `[api] timeout_secs`.
pub const ENV_TIMEOUT: &str = "PAPERDECK_TIMEOUT";

/// Apply `PAPERDECK_*` environment overrides on top of file values.
pub fn apply_env(config: &mut Config) -> Result<(), CoreError> {
    apply_env_with(config, |key| std::env::var(key).ok())
}

/// Like [`apply_env`], reading variables through `lookup`.
pub fn apply_env_with(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), CoreError> {
    if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
        config.base_url = url.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_TIMEOUT) {
        let secs: u64 = raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Config(format!("{ENV_TIMEOUT} must be whole seconds, got {raw:?}")))?;
        config.timeout_secs = secs.max(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let cfg: ConfigFile = toml::from_str(
            r#"
            [search]
            default_date_range = "this-year"
            "#,
        )
        .unwrap();
        assert!(cfg.api.is_none());
        assert_eq!(
            cfg.search.unwrap().default_date_range.as_deref(),
            Some("this-year")
        );
    }

    #[test]
    fn overlay_wins_and_base_fills_gaps() {
        let base: ConfigFile = toml::from_str(
            r#"
            [api]
            base_url = "http://base"
            timeout_secs = 3
            [display]
            theme = "modern"
            "#,
        )
        .unwrap();
        let overlay: ConfigFile = toml::from_str(
            r#"
            [api]
            base_url = "http://overlay"
            "#,
        )
        .unwrap();

        let merged = merge(base, overlay);
        let api = merged.api.unwrap();
        assert_eq!(api.base_url.as_deref(), Some("http://overlay"));
        assert_eq!(api.timeout_secs, Some(3));
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn apply_sets_only_present_values() {
        let file: ConfigFile = toml::from_str(
            r#"
            [api]
            base_url = ""
            timeout_secs = 0
            [search]
            default_date_range = "today"
            debounce_ms = 200
            discard_stale_responses = true
            "#,
        )
        .unwrap();
        let mut config = Config::default();
        apply_to_config(&file, &mut config).unwrap();

        assert_eq!(config.base_url, crate::DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 1);
        assert_eq!(config.default_date_range, DateRange::Today);
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.scroll_threshold_rows, Config::default().scroll_threshold_rows);
        assert!(config.discard_stale_responses);
    }

    #[test]
    fn apply_rejects_unknown_date_range() {
        let file: ConfigFile = toml::from_str(
            r#"
            [search]
            default_date_range = "someday"
            "#,
        )
        .unwrap();
        let mut config = Config::default();
        assert!(apply_to_config(&file, &mut config).is_err());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = ConfigFile {
            search: Some(SearchConfig {
                default_date_range: Some("forever".to_string()),
                ..SearchConfig::default()
            }),
            ..ConfigFile::default()
        };

        save_to_path(&cfg, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(
            loaded.search.unwrap().default_date_range.as_deref(),
            Some("forever")
        );
    }

    #[test]
    fn garbage_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(load_from_path(&path).is_none());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config {
            base_url: "http://from-file".to_string(),
            ..Config::default()
        };
        apply_env_with(&mut config, |key| match key {
            ENV_API_URL => Some(" http://from-env ".to_string()),
            ENV_TIMEOUT => Some("30".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, "http://from-env");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn env_timeout_must_be_numeric() {
        let mut config = Config::default();
        let err = apply_env_with(&mut config, |key| (key == ENV_TIMEOUT).then(|| "soon".to_string()));
        assert!(matches!(err, Err(CoreError::Config(_))));
        assert_eq!(config.timeout_secs, Config::default().timeout_secs);
    }
}
