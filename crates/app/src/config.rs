//! Runtime configuration read from the environment

use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".todo-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding one file per storage key
    pub data_dir: PathBuf,
    /// Log vibration pulses instead of dropping them
    pub haptics: bool,
    /// Print the snapshot as JSON instead of text
    pub json_output: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("TODO_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            data_dir,
            haptics: parse_flag(lookup("TODO_HAPTICS").as_deref(), true),
            json_output: lookup("TODO_OUTPUT")
                .map(|format| format.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from(".todo-data"));
        assert!(config.haptics);
        assert!(!config.json_output);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("TODO_DATA_DIR", "/tmp/todo"),
            ("TODO_HAPTICS", "Off"),
            ("TODO_OUTPUT", "JSON"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/todo"));
        assert!(!config.haptics);
        assert!(config.json_output);
    }

    #[test]
    fn test_unknown_flag_value_uses_default() {
        assert!(parse_flag(Some("maybe"), true));
        assert!(!parse_flag(Some("maybe"), false));
        assert!(parse_flag(Some(" YES "), false));
    }
}
