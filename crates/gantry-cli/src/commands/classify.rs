//! `gantry classify` -- run only the admission classifier.
//!
//! No knowledge base is touched. Prompts below the minimum length are
//! refused locally without a model call.
//!
//! ```text
//! gantry classify "What engine does the X950 use?"
//! gantry classify --json "tell me about Berlin"
//! ```

use clap::Args;
use gantry_core::{AdmissionVerdict, build_services};

use super::{SettingsArgs, load_settings};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Prompt to classify.
    pub prompt: String,

    /// Print the verdict as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub async fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let config = load_settings(&args.settings)?;
    let services = build_services(&config)?;
    let verdict = services
        .orchestrator
        .classifier()
        .classify(&args.prompt, &config.chat.model, config.chat.min_prompt_length)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{}", describe(&verdict));
    }
    Ok(())
}

/// One-line human-readable verdict.
pub fn describe(verdict: &AdmissionVerdict) -> String {
    let status = if verdict.allowed { "admitted" } else { "refused" };
    match verdict.category_id {
        Some(id) => format!("{status}: {id} {} ({})", verdict.name, verdict.reason),
        None => format!("{status}: {} ({})", verdict.name, verdict.reason),
    }
}
