use log::{debug, warn};
use platform_dirs::AppDirs;
use serde::{Serialize, Deserialize};
use ron::ser::{to_string_pretty, PrettyConfig};
use ron::de::from_reader;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Significant digits of non-terminating decimals and percentages.
    #[serde(default = "defaults::decimal_digits")]
    pub decimal_digits: u32,
    #[serde(default = "defaults::history_len")]
    pub history_len: usize,
    /// Put every successful result on the clipboard.
    #[serde(default = "defaults::copy_results")]
    pub copy_results: bool,
}

macro_rules! default_ {
    ($name:ident, $type:ident) => {
        pub fn $name() -> $type {
            Config::default().$name
        }
    };
}

mod defaults {
    use super::Config;
    default_!(decimal_digits, u32);
    default_!(history_len, usize);
    default_!(copy_results, bool);
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decimal_digits: 28,
            history_len: 64,
            copy_results: false,
        }
    }
}

impl Config {
    /// `numbertool.cfg` in the platform config dir, created if missing.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = AppDirs::new(Some("numbertool"), false)?;
        let config_dir = dirs.config_dir;
        let _ = fs::create_dir_all(&config_dir);
        Some(config_dir.join("numbertool.cfg"))
    }

    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("no config directory on this platform, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(_) => {
                debug!("writing default config to {}", path.display());
                Self::default().write(path);
                return Self::default();
            }
        };
        match from_reader::<fs::File, Self>(file) {
            Ok(conf) => {
                // write back default values of any fields not present
                conf.write(path);
                conf
            }
            Err(e) => {
                warn!("could not parse {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    fn write(&self, path: &Path) {
        let text = match to_string_pretty(self, PrettyConfig::default()) {
            Ok(text) => text,
            Err(e) => {
                warn!("could not serialize config: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(path, text) {
            warn!("could not write {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("numbertool-{}-{name}.cfg", std::process::id()))
}

#[test]
fn missing_fields_test() {
    let path = scratch_path("partial");
    fs::write(&path, "(decimal_digits: 10)").unwrap();
    let conf = Config::load_from(&path);
    assert_eq!(conf, Config { decimal_digits: 10, ..Config::default() });
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("history_len"));
    let _ = fs::remove_file(path);
}

#[test]
fn missing_file_test() {
    let path = scratch_path("missing");
    let _ = fs::remove_file(&path);
    assert_eq!(Config::load_from(&path), Config::default());
    assert!(path.exists());
    let _ = fs::remove_file(path);
}

#[test]
fn broken_file_test() {
    let path = scratch_path("broken");
    fs::write(&path, "decimal_digits = ten").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
    let _ = fs::remove_file(path);
}
