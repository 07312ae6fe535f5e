//! `gantry` -- CLI for the heavy-machinery support assistant.
//!
//! - `gantry chat` -- interactive session, or one message with `-m`
//! - `gantry classify` -- run only the admission classifier on a prompt
//! - `gantry kb validate` -- probe a knowledge-base id
//! - `gantry categories` -- list the intent taxonomy
//! - `gantry config show` -- print the resolved configuration

use clap::{Parser, Subcommand};

mod commands;

/// Heavy-machinery support assistant.
#[derive(Parser)]
#[command(name = "gantry", about = "Heavy-machinery support assistant", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant, or send a single message.
    Chat(commands::chat::ChatArgs),

    /// Classify a prompt without retrieval or generation.
    Classify(commands::classify::ClassifyArgs),

    /// Knowledge-base utilities.
    Kb {
        #[command(subcommand)]
        action: KbCmd,
    },

    /// List the intent categories.
    Categories {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum KbCmd {
    /// Check that a knowledge-base id exists.
    Validate {
        /// Knowledge-base id to probe.
        kb_id: String,

        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Print the configuration after file loading and flag overrides.
    Show(commands::SettingsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat(args) => commands::chat::run(args).await?,
        Commands::Classify(args) => commands::classify::run(args).await?,
        Commands::Kb { action } => match action {
            KbCmd::Validate { kb_id, config } => {
                commands::kb::validate(&kb_id, config.as_deref()).await?
            }
        },
        Commands::Categories { json } => commands::categories::run(json)?,
        Commands::Config { action } => match action {
            ConfigCmd::Show(settings) => {
                let config = commands::load_settings(&settings)?;
                commands::config_cmd::config_show(&config)?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_without_error() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_help_contains_binary_name() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("gantry"));
    }

    #[test]
    fn cli_has_all_subcommands() {
        let cmd = Cli::command();
        let names: Vec<&str> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in ["chat", "classify", "kb", "categories", "config"] {
            assert!(names.contains(&expected), "missing subcommand {expected}");
        }
    }

    #[test]
    fn verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["gantry", "categories", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn chat_accepts_setting_overrides() {
        let cli = Cli::try_parse_from([
            "gantry",
            "chat",
            "-m",
            "How do I change the X950 track tension?",
            "--kb-id",
            "KB12345678",
            "--temperature",
            "0.3",
            "--top-p",
            "0.25",
            "--min-length",
            "10",
            "--results",
            "5",
            "--max-tokens",
            "750",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat(args) => {
                assert_eq!(args.message.as_deref(), Some("How do I change the X950 track tension?"));
                assert_eq!(args.settings.kb_id.as_deref(), Some("KB12345678"));
                assert_eq!(args.settings.temperature, Some(0.3));
                assert_eq!(args.settings.results, Some(5));
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn classify_requires_prompt() {
        assert!(Cli::try_parse_from(["gantry", "classify"]).is_err());
        assert!(Cli::try_parse_from(["gantry", "classify", "hello there", "--json"]).is_ok());
    }

    #[test]
    fn kb_validate_parses() {
        let cli = Cli::try_parse_from(["gantry", "kb", "validate", "KB12345678"]).unwrap();
        match cli.command {
            Commands::Kb {
                action: KbCmd::Validate { kb_id, config },
            } => {
                assert_eq!(kb_id, "KB12345678");
                assert!(config.is_none());
            }
            _ => panic!("expected kb validate"),
        }
    }
}
