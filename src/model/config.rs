use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

#[derive(Debug, Deserialize)]
pub struct LauncherConfig {
    pub plugins: PluginsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct PluginsConfig {
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Options joined by single spaces on one line.
    Line,
    /// One option per line.
    Lines,
}

impl OutputFormat {
    pub fn render(self, options: &[String]) -> String {
        match self {
            OutputFormat::Line => options.join(" "),
            OutputFormat::Lines => options.join("\n"),
        }
    }
}

impl LauncherConfig {
    /// Load configuration with layering: defaults → user config (or `explicit`).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let user_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => directories::ProjectDirs::from("", "", "bootopts")
                .map(|dirs| dirs.config_dir().join("config.toml"))
                .filter(|path| path.exists()),
        };

        let mut config = match user_path {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                tracing::info!("using config {}", path.display());
                Self::from_toml(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::from_toml(DEFAULT_CONFIG)?,
        };

        config.plugins.dirs = config
            .plugins
            .dirs
            .iter()
            .map(|dir| expand_tilde(dir))
            .collect();

        Ok(config)
    }

    /// A user file only needs the keys it overrides; the rest come from the defaults.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut merged: toml::Table = toml::from_str(DEFAULT_CONFIG)?;
        let user: toml::Table = toml::from_str(raw)?;
        merge_tables(&mut merged, user);
        let config: Self = toml::Value::Table(merged).try_into()?;
        Ok(config)
    }

    /// Command-line values replace configured ones.
    pub fn apply_overrides(&mut self, plugins_dirs: Vec<PathBuf>, format: Option<OutputFormat>) {
        if !plugins_dirs.is_empty() {
            self.plugins.dirs = plugins_dirs;
        }
        if let Some(format) = format {
            self.output.format = format;
        }
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => match base.get_mut(&key) {
                Some(toml::Value::Table(base_table)) => merge_tables(base_table, overlay_table),
                _ => {
                    base.insert(key, toml::Value::Table(overlay_table));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if !text.starts_with('~') {
        return path.to_path_buf();
    }

    if let Some(base_dirs) = directories::BaseDirs::new() {
        let home = base_dirs.home_dir().to_string_lossy();
        return PathBuf::from(text.replacen('~', &home, 1));
    }

    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let config = LauncherConfig::from_toml("").unwrap();
        assert_eq!(config.plugins.dirs, vec![PathBuf::from("plugins")]);
        assert_eq!(config.output.format, OutputFormat::Line);
    }

    #[test]
    fn user_file_overrides_only_given_keys() {
        let config = LauncherConfig::from_toml("[output]\nformat = \"lines\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Lines);
        assert_eq!(config.plugins.dirs, vec![PathBuf::from("plugins")]);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(LauncherConfig::from_toml("[output]\nformat = \"json\"\n").is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bootopts.toml");
        fs::write(&path, "[plugins]\ndirs = [\"/opt/app/plugins\", \"/srv/extra\"]\n").unwrap();

        let config = LauncherConfig::load(Some(&path)).unwrap();
        assert_eq!(
            config.plugins.dirs,
            vec![PathBuf::from("/opt/app/plugins"), PathBuf::from("/srv/extra")]
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(LauncherConfig::load(Some(&tmp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = LauncherConfig::from_toml("").unwrap();
        config.apply_overrides(vec![PathBuf::from("/a"), PathBuf::from("/b")], None);
        assert_eq!(config.plugins.dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(config.output.format, OutputFormat::Line);

        config.apply_overrides(Vec::new(), Some(OutputFormat::Lines));
        assert_eq!(config.plugins.dirs.len(), 2);
        assert_eq!(config.output.format, OutputFormat::Lines);
    }

    #[test]
    fn tilde_expands_to_home() {
        let expanded = expand_tilde(Path::new("~/plugins"));
        if directories::BaseDirs::new().is_some() {
            assert!(!expanded.to_string_lossy().starts_with('~'));
            assert!(expanded.ends_with("plugins"));
        }
        assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn formats_render() {
        let options = vec!["-Da=1".to_string(), "-Xbootclasspath/a:/p/a.jar".to_string()];
        assert_eq!(OutputFormat::Line.render(&options), "-Da=1 -Xbootclasspath/a:/p/a.jar");
        assert_eq!(OutputFormat::Lines.render(&options), "-Da=1\n-Xbootclasspath/a:/p/a.jar");
    }
}
