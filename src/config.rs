use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;

use crate::error::{ExecError, ExecResult};
use crate::executor::estate::EFlags;

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: LevelFilter,
    // 0 means no limit
    pub row_limit: u64,
    pub eflags: EFlags,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            log_level: DEFAULT_LOG_LEVEL,
            row_limit: 0,
            eflags: EFlags::NONE,
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    // Reads `key = value` lines. Blank lines and lines starting with `#`
    // are skipped.
    pub fn load(path: &Path) -> ExecResult<Config> {
        let text = fs::read_to_string(path)
            .map_err(|e| ExecError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Config::parse(&text)
    }

    pub fn parse(text: &str) -> ExecResult<Config> {
        let mut config = Config::default();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => {
                    return Err(ExecError::Config(format!(
                        "line {}: expected 'key = value', got '{}'",
                        lineno + 1,
                        line
                    )))
                }
            };

            config.set(key, value).map_err(|e| match e {
                ExecError::Config(msg) => ExecError::Config(format!("line {}: {}", lineno + 1, msg)),
                other => other,
            })?;
        }

        Ok(config)
    }

    pub fn set(&mut self, key: &str, value: &str) -> ExecResult<()> {
        match key {
            "log_level" => {
                self.log_level = LevelFilter::from_str(value)
                    .map_err(|_| ExecError::Config(format!("invalid log_level '{}'", value)))?;
            }
            "row_limit" => {
                self.row_limit = value
                    .parse::<u64>()
                    .map_err(|_| ExecError::Config(format!("invalid row_limit '{}'", value)))?;
            }
            "explain_only" => {
                if parse_bool(key, value)? {
                    self.eflags = self.eflags | EFlags::EXPLAIN_ONLY;
                }
            }
            "rewind" => {
                if parse_bool(key, value)? {
                    self.eflags = self.eflags | EFlags::REWIND;
                }
            }
            _ => return Err(ExecError::Config(format!("unknown key '{}'", key))),
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> ExecResult<bool> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ExecError::Config(format!("invalid {} '{}'", key, value))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default() {
        let config = Config::new();

        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.row_limit, 0);
        assert_eq!(config.eflags, EFlags::NONE);
    }

    #[test]
    fn test_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# executor settings").unwrap();
        writeln!(file, "log_level = debug").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "row_limit = 10").unwrap();
        writeln!(file, "explain_only = on").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.row_limit, 10);
        assert!(config.eflags.contains(EFlags::EXPLAIN_ONLY));
        assert!(!config.eflags.contains(EFlags::REWIND));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Config::parse("nonsense"), Err(ExecError::Config(_))));
        assert!(matches!(Config::parse("row_limit = -1"), Err(ExecError::Config(_))));
        assert!(matches!(Config::parse("color = blue"), Err(ExecError::Config(_))));

        match Config::parse("\nrewind = maybe") {
            Err(ExecError::Config(msg)) => assert!(msg.starts_with("line 2:")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(Config::load(&dir.path().join("missing.conf")).is_err());
    }
}
