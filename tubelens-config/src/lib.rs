//! Loader for TubeLens configuration with file + environment overlays.
//!
//! Sources merge in order: an optional YAML/TOML/JSON file, then
//! `TUBELENS_`-prefixed environment variables (`__` as the section
//! separator). `${VAR}` placeholders anywhere in the merged tree are
//! expanded recursively, with a depth cap so cycles terminate.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct TubelensConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analyst: AnalystSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TubelensConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            analyst: AnalystSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalystSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for AnalystSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            temperature: None,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingConfig {
    /// Duplicate log events to stderr in addition to the file sink.
    #[serde(default)]
    pub stderr: bool,
    /// Emit JSON-encoded events instead of text.
    #[serde(default)]
    pub json: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1/".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (file + env overrides).
pub struct TubelensConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for TubelensConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TubelensConfigLoader {
    /// Start with the defaults: `TUBELENS_` env overrides only.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("TUBELENS").separator("__"));
        Self { builder }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    /// Missing files are tolerated so deployments can rely purely on
    /// environment variables.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet. Used by tests and the CLI.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    pub fn load(self) -> Result<TubelensConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: TubelensConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_usable() {
        let cfg = TubelensConfigLoader::new().load().expect("defaults load");
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.analyst.model, "gpt-4o");
        assert!(cfg.analyst.endpoint.ends_with('/'));
        assert!(!cfg.logging.stderr);
    }

    #[test]
    fn yaml_overrides_defaults() {
        let cfg = TubelensConfigLoader::new()
            .with_yaml_str(
                r#"
server:
  bind_addr: "0.0.0.0:9000"
analyst:
  model: "gpt-4o-mini"
  temperature: 0.2
logging:
  stderr: true
"#,
            )
            .load()
            .unwrap();

        assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.analyst.model, "gpt-4o-mini");
        assert_eq!(cfg.analyst.temperature, Some(0.2));
        assert!(cfg.logging.stderr);
    }

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Winston")), ("STATE", Some("NC"))], || {
            let mut v = json!([
                "hello-$CITY",
                { "loc": "${CITY}-${STATE}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Winston", { "loc": "Winston-NC" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn endpoint_can_come_from_env_placeholder() {
        temp_env::with_var("LLM_GATEWAY", Some("https://gateway.local/v1/"), || {
            let cfg = TubelensConfigLoader::new()
                .with_yaml_str("analyst:\n  endpoint: \"${LLM_GATEWAY}\"")
                .load()
                .unwrap();
            assert_eq!(cfg.analyst.endpoint, "https://gateway.local/v1/");
        });
    }
}
