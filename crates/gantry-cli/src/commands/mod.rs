//! CLI command implementations for `gantry`.
//!
//! - [`chat`] -- REPL and single-message mode
//! - [`classify`] -- admission verdict only
//! - [`kb`] -- knowledge-base id probe
//! - [`categories`] -- taxonomy listing
//! - [`config_cmd`] -- resolved configuration

pub mod categories;
pub mod chat;
pub mod classify;
pub mod config_cmd;
pub mod kb;

use std::path::Path;

use clap::Args;
use gantry_types::Config;
use gantry_types::config::loader::{load_config, load_config_file};

/// Configuration source and per-invocation overrides.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model identifier.
    #[arg(long)]
    pub model: Option<String>,

    /// Knowledge-base id.
    #[arg(long)]
    pub kb_id: Option<String>,

    /// Sampling temperature, 0 to 1 in steps of 0.1.
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Nucleus sampling, 0 to 1 in steps of 0.001.
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Shortest accepted prompt, 5 to 95 in steps of 5.
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Passages to retrieve, 1 to 10.
    #[arg(long)]
    pub results: Option<u32>,

    /// Response token budget, 100 to 1000 in steps of 50.
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

impl SettingsArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        let chat = &mut config.chat;
        if let Some(ref model) = self.model {
            chat.model = model.clone();
        }
        if let Some(t) = self.temperature {
            chat.temperature = t;
        }
        if let Some(p) = self.top_p {
            chat.top_p = p;
        }
        if let Some(n) = self.min_length {
            chat.min_prompt_length = n;
        }
        if let Some(n) = self.results {
            chat.result_count = n;
        }
        if let Some(n) = self.max_tokens {
            chat.max_tokens = n;
        }
        if let Some(ref id) = self.kb_id {
            config.knowledge_base_id = Some(id.clone());
        }
    }
}

/// Load configuration from `path` or via discovery.
pub fn load_base_config(path: Option<&str>) -> anyhow::Result<Config> {
    let config = match path {
        Some(p) => {
            let path = Path::new(p);
            if !path.exists() {
                anyhow::bail!("config file not found: {p}");
            }
            load_config_file(path)?
        }
        None => load_config()?,
    };
    Ok(config)
}

/// Load, apply flag overrides, validate.
pub fn load_settings(args: &SettingsArgs) -> anyhow::Result<Config> {
    let mut config = load_base_config(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn apply_overrides_only_given_flags() {
        let mut config = Config::default();
        let args = SettingsArgs {
            temperature: Some(0.5),
            kb_id: Some("KB1".into()),
            ..SettingsArgs::default()
        };
        args.apply(&mut config);
        assert_eq!(config.chat.temperature, 0.5);
        assert_eq!(config.knowledge_base_id.as_deref(), Some("KB1"));
        assert_eq!(config.chat.max_tokens, 500);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_base_config(Some("/tmp/.gantry-definitely-missing.json")).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_settings_reads_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"chat": {{"maxTokens": 300, "resultCount": 4}}, "knowledgeBaseId": "KBFILE"}}"#
        )
        .unwrap();

        let args = SettingsArgs {
            config: Some(file.path().display().to_string()),
            results: Some(2),
            ..SettingsArgs::default()
        };
        let config = load_settings(&args).unwrap();
        assert_eq!(config.chat.max_tokens, 300);
        assert_eq!(config.chat.result_count, 2);
        assert_eq!(config.knowledge_base_id(), Some("KBFILE"));
    }

    #[test]
    fn out_of_range_override_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        let args = SettingsArgs {
            config: Some(file.path().display().to_string()),
            min_length: Some(7),
            ..SettingsArgs::default()
        };
        assert!(load_settings(&args).is_err());
    }
}
