//! `gantry chat` -- interactive session or single-message mode.
//!
//! A session keeps its own history and appends the two turns each
//! pipeline run returns. Prompts are only accepted once the
//! knowledge-base id has passed the catalog probe; until then the REPL
//! keeps asking for one.
//!
//! # Examples
//!
//! ```text
//! gantry chat --kb-id KB12345678
//! > What kind of payload system does the X950 excavator have?
//! [answer + citations]
//! > /history
//! > /exit
//!
//! gantry chat --kb-id KB12345678 -m "How do I bleed the swing brake?"
//! ```

use std::io::Write;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use gantry_core::{Citation, KbGate, TurnOutcome, ValidatedKbId, build_services};
use gantry_types::ConversationTurn;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::info;

use super::{SettingsArgs, load_settings};

pub const GREETING: &str = "Hello human! I am your assistant! I am here to help you with your \
                            Heavy Machinery questions. How can I assist you today?";

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Send a single message and exit.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Print the admission verdict for every prompt.
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let config = load_settings(&args.settings)?;
    let mut services = build_services(&config)?;
    info!(model = %config.chat.model, "starting chat");

    if let Some(ref message) = args.message {
        let kb = services
            .gate
            .check(config.knowledge_base_id().unwrap_or_default())
            .await?;
        let outcome = services
            .orchestrator
            .handle_user_turn(message, &config.chat, &kb)
            .await;
        print_outcome(&outcome, args.explain);
        return Ok(());
    }

    let stdin = tokio::io::stdin();
    let mut reader = tokio::io::BufReader::new(stdin).lines();

    let Some(mut kb) =
        require_kb(&mut services.gate, config.knowledge_base_id().unwrap_or_default(), &mut reader)
            .await?
    else {
        return Ok(());
    };

    println!("{GREETING}");
    println!();

    let mut history: Vec<ConversationTurn> = Vec::new();

    loop {
        prompt_marker("> ");
        let Some(line) = reader.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/exit" | "/quit" => break,
            "/help" => {
                print_help();
                continue;
            }
            "/history" => {
                print_history(&history);
                continue;
            }
            _ => {}
        }

        if let Some(new_id) = input
            .strip_prefix("/kb")
            .filter(|rest| rest.is_empty() || rest.starts_with(' '))
        {
            match require_kb(&mut services.gate, new_id, &mut reader).await? {
                Some(id) => {
                    kb = id;
                    println!("Using knowledge base {kb}.");
                }
                None => break,
            }
            continue;
        }

        let outcome = services
            .orchestrator
            .handle_user_turn(&line, &config.chat, &kb)
            .await;
        print_outcome(&outcome, args.explain);
        history.extend(outcome.turns());
    }

    println!("Goodbye.");
    Ok(())
}

/// Probe `initial`, then keep asking until an id validates. `None` on EOF.
async fn require_kb<R>(
    gate: &mut KbGate,
    initial: &str,
    reader: &mut Lines<R>,
) -> anyhow::Result<Option<ValidatedKbId>>
where
    R: AsyncBufRead + Unpin,
{
    let mut candidate = initial.trim().to_string();
    loop {
        match gate.check(&candidate).await {
            Ok(id) => return Ok(Some(id)),
            Err(e) => {
                eprintln!("Invalid or missing Knowledge Base ID ({e}).");
                prompt_marker("Knowledge Base ID: ");
            }
        }
        match reader.next_line().await? {
            Some(line) => candidate = line.trim().to_string(),
            None => return Ok(None),
        }
    }
}

fn prompt_marker(text: &str) {
    eprint!("{text}");
    std::io::stderr().flush().ok();
}

fn print_outcome(outcome: &TurnOutcome, explain: bool) {
    if explain {
        let v = &outcome.verdict;
        let category = v.category_id.map(String::from).unwrap_or_else(|| "-".into());
        eprintln!(
            "[{}] category={category} name={} reason={}",
            if v.allowed { "admitted" } else { "refused" },
            v.name,
            v.reason
        );
    }
    println!("{}", outcome.response);
    if !outcome.citations.is_empty() {
        println!();
        println!("{}", citations_table(&outcome.citations));
    }
    println!();
}

/// Citation table: index, score, source, snippet.
pub fn citations_table(citations: &[Citation]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["#", "SCORE", "SOURCE", "SNIPPET"]);
    for c in citations {
        let source = if c.source_path.is_empty() {
            "-"
        } else {
            c.source_path.as_str()
        };
        table.add_row([
            c.index.to_string(),
            format!("{:.2}", c.confidence_score),
            source.to_string(),
            c.text_snippet.clone(),
        ]);
    }
    table
}

fn print_history(history: &[ConversationTurn]) {
    if history.is_empty() {
        println!("(no messages yet)");
        return;
    }
    for turn in history {
        println!("{}: {}", turn.role, turn.content);
    }
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  /history     show this session's messages");
    println!("  /kb <id>     switch knowledge base");
    println!("  /exit        quit");
    println!();
}
