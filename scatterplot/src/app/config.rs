use app_core::string_error::ErrorStringExt;
use std::{io::Read, path::PathBuf};

use crate::{cli::Args, loader::NumericPolicy, plot::Layout};

pub const CONFIG_FILE_NAME: &str = ".scatterplot";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub svg_width: u64,
    pub svg_height: u64,
    pub policy: NumericPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("scatterdata.csv"),
            svg_width: 960,
            svg_height: 500,
            policy: NumericPolicy::Strict,
        }
    }
}

impl Config {
    /// Defaults overlaid by `~/.scatterplot`.
    pub fn from_config_file() -> Result<Self, String> {
        let mut config = Self::default();
        #[allow(deprecated)]
        let Some(home) = std::env::home_dir() else {
            return Err("could not determine home directory to load config file".into());
        };
        let config_raw = {
            let path = home.join(CONFIG_FILE_NAME);
            let mut file = std::fs::File::open(path).err_to_string("could not open config file")?;
            let mut buf = String::new();
            file.read_to_string(&mut buf)
                .err_to_string("could not load config file")?;
            buf
        };
        config.apply_config_str(&config_raw);
        Ok(config)
    }

    /// Overlay `key=value` lines. Unknown keys are ignored, unusable values
    /// keep the current setting.
    pub fn apply_config_str(&mut self, raw: &str) {
        for line in raw.lines() {
            let line = line.trim();
            // Lines starting with "#" are considered comments.
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                log::warn!("ignoring config line without '=': {}", line);
                continue;
            };
            let val = val.trim();
            match key.trim() {
                "data_path" => self.data_path = PathBuf::from(val),
                "svg_width" => match parse_dimension(val) {
                    Some(width) => self.svg_width = width,
                    None => log::warn!("could not parse 'svg_width' as a positive number"),
                },
                "svg_height" => match parse_dimension(val) {
                    Some(height) => self.svg_height = height,
                    None => log::warn!("could not parse 'svg_height' as a positive number"),
                },
                "policy" => match val.parse::<NumericPolicy>() {
                    Ok(policy) => self.policy = policy,
                    Err(err) => log::warn!("{}", err),
                },
                other => log::warn!("ignoring unknown config key '{}'", other),
            }
        }
    }

    /// Command-line arguments take precedence over everything else.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(path) = &args.data_path {
            self.data_path = path.clone();
        }
        if let Some(policy) = args.policy {
            self.policy = policy;
        }
        if let Some(width) = args.width.filter(|w| *w > 0) {
            self.svg_width = width;
        }
        if let Some(height) = args.height.filter(|h| *h > 0) {
            self.svg_height = height;
        }
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.svg_width as f64, self.svg_height as f64)
    }
}

fn parse_dimension(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_from_config_file() {
        init();
        // Depends on the machine, only make sure it does not panic.
        #[allow(unused)]
        let res = Config::from_config_file();
    }

    #[test]
    fn test_apply_config_str() {
        init();
        let mut config = Config::default();
        config.apply_config_str(
            "# energy data\n\
             data_path = /data/energy.csv\n\
             svg_width=1200\n\
             svg_height=zero\n\
             policy=passthrough\n\
             colour=blue\n\
             nonsense\n",
        );
        assert_eq!(config.data_path, PathBuf::from("/data/energy.csv"));
        assert_eq!(config.svg_width, 1200);
        assert_eq!(config.svg_height, 500);
        assert_eq!(config.policy, NumericPolicy::Passthrough);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        init();
        let mut config = Config::default();
        config.apply_config_str("colour=blue
svg_widht=1200
");
        assert_eq!(config, Config::default());
        config.apply_config_str("colour=blue
svg_width=1200
");
        assert_eq!(config.svg_width, 1200);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut config = Config::default();
        config.apply_config_str("svg_width=0\n");
        assert_eq!(config.svg_width, 960);
    }

    #[test]
    fn test_args_override_config() {
        let mut config = Config::default();
        config.apply_config_str("svg_width=1200\npolicy=passthrough\n");
        let args = Args::parse_from(["scatterplot", "other.csv", "--policy", "strict", "--height", "600"]);
        config.apply_args(&args);
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.policy, NumericPolicy::Strict);
        assert_eq!(config.svg_width, 1200);
        assert_eq!(config.svg_height, 600);
        assert_eq!(config.layout().plot_height(), 500.0);
    }
}
