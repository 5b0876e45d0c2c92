//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rag-tutor";
const PROJECT_FILES: [&str; 2] = ["tutor.toml", ".tutor.toml"];
const ENV_PREFIX: &str = "TUTOR_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TUTOR_*` environment variables (`TUTOR_FUSION__TOP_K=10`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./tutor.toml` or `./.tutor.toml`
    /// 4. Global config: `$XDG_CONFIG_HOME/rag-tutor/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(config: &FileConfig) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(config)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/rag-tutor/config.toml if set,
    /// otherwise falls back to ~/.config/rag-tutor/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Default directory for audit and topic files
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Variables: {}*", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./tutor.toml or ./.tutor.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn extract(figment: Figment) -> FileConfig {
        figment.extract().unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.fusion.query_count, 4);
        assert_eq!(config.fusion.top_k, 30);
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = FileConfig::default();
        config.fusion.top_k = 12;
        config.topics.unsupported_log = Some(PathBuf::from("unsupported.txt"));

        let rendered = ConfigLoader::to_toml(&config).unwrap();
        assert!(rendered.contains("[fusion]"));
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("rag-tutor"));
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = write_toml(&dir, "global.toml", "[fusion]\ntop_k = 12\nquery_count = 2\n");
        let project = write_toml(&dir, "tutor.toml", "[fusion]\ntop_k = 8\n");

        let config = extract(ConfigLoader::figment(
            Some(global.as_path()),
            Some(project.as_path()),
            None,
        ));
        assert_eq!(config.fusion.top_k, 8);
        assert_eq!(config.fusion.query_count, 2);
        assert_eq!(config.fusion.fanout_width, 5);
    }

    #[test]
    fn test_explicit_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let project = write_toml(&dir, "tutor.toml", "[llm]\nmodel = \"project-model\"\n");
        let explicit = write_toml(&dir, "custom.toml", "[llm]\nmodel = \"explicit-model\"\n");

        let config = extract(ConfigLoader::figment(
            None,
            Some(project.as_path()),
            Some(explicit.as_path()),
        ));
        assert_eq!(config.llm.model, "explicit-model");
    }

    #[test]
    fn test_missing_global_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let config = extract(ConfigLoader::figment(Some(missing.as_path()), None, None));
        assert_eq!(config, FileConfig::default());
    }
}
