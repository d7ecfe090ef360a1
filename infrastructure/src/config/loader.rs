//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["toolgate.toml", ".toolgate.toml"];
const ENV_PREFIX: &str = "TOOLGATE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`TOOLGATE_LIMITS__MAX_FILE_BYTES=...`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolgate.toml` or `./.toolgate.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/toolgate/config.toml`
    /// 5. Default values
    ///
    /// A missing explicit file is an error; missing discovered files are skipped.
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }

        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/toolgate/config.toml if set,
    /// otherwise the platform config directory
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolgate").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        let env_vars: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();
        if env_vars.is_empty() {
            println!("  [     ] Env:      {}<SECTION>__<KEY>", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:      {}", env_vars.join(", "));
        }

        match config_path {
            Some(path) if path.exists() => println!("  [FOUND] Explicit: {}", path.display()),
            Some(path) => println!("  [MISS ] Explicit: {}", path.display()),
            None => {}
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project:  {}", path.display()),
            None => println!("  [     ] Project:  ./toolgate.toml or ./.toolgate.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:   {}", path.display());
            } else {
                println!("  [     ] Global:   {}", path.display());
            }
        }

        println!("  [     ] Default:  built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn isolate(jail: &mut Jail) {
        let home = jail.directory().to_string_lossy().into_owned();
        jail.set_env("HOME", &home);
        jail.set_env("XDG_CONFIG_HOME", format!("{}/xdg", home));
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.model.name, "mistral");
        assert_eq!(config.limits.max_search_matches, 50);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().ends_with("toolgate/config.toml"));
    }

    #[test]
    fn test_load_without_files_gives_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config, FileConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_layer_priority() {
        Jail::expect_with(|jail| {
            isolate(jail);
            std::fs::create_dir_all(jail.directory().join("xdg/toolgate"))
                .map_err(|e| e.to_string())?;
            jail.create_file(
                "xdg/toolgate/config.toml",
                "[model]\nname = \"global-model\"\nbackend_url = \"http://global:11434\"\n",
            )?;
            jail.create_file(
                "toolgate.toml",
                "[model]\nname = \"project-model\"\n[limits]\nmax_dir_entries = 10\n",
            )?;
            jail.create_file("explicit.toml", "[limits]\nmax_dir_entries = 20\n")?;
            jail.set_env("TOOLGATE_LIMITS__MAX_SEARCH_MATCHES", "7");

            let explicit = PathBuf::from("explicit.toml");
            let config = ConfigLoader::load(Some(&explicit)).map_err(|e| *e)?;

            assert_eq!(config.model.backend_url, "http://global:11434");
            assert_eq!(config.model.name, "project-model");
            assert_eq!(config.limits.max_dir_entries, 20);
            assert_eq!(config.limits.max_search_matches, 7);
            assert_eq!(config.limits.max_file_bytes, 1024 * 1024);
            Ok(())
        });
    }

    #[test]
    fn test_hidden_project_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(".toolgate.toml", "[sandbox]\nallowed_roots = [\"/srv\"]\n")?;

            assert_eq!(
                ConfigLoader::project_config_path(),
                Some(PathBuf::from(".toolgate.toml"))
            );
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.sandbox.allowed_roots, vec![PathBuf::from("/srv")]);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let missing = PathBuf::from("nope.toml");
            assert!(ConfigLoader::load(Some(&missing)).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_bad_value_is_an_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("toolgate.toml", "[limits]\nmax_file_bytes = \"lots\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
