//! One-shot question from the command line.
//!
//! Usage: `ask [--age N] [--income LABEL] <question...>`

use anyhow::{Context, Result, bail};

use retirechat::coach::{CoachConfig, CoachOrchestrator, ConversationHistory, UserProfile};
use retirechat::start_retirechat::init_tracing;

struct Args {
    profile: UserProfile,
    question: String,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args> {
    let mut profile = UserProfile::default();
    let mut words = Vec::new();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--age" => {
                let value = raw.next().context("--age needs a value")?;
                profile.age = Some(value.parse().context("--age must be a whole number")?);
            }
            "--income" => {
                profile.annual_income = Some(raw.next().context("--income needs a value")?);
            }
            _ => words.push(arg),
        }
    }

    let question = words.join(" ");
    if question.trim().is_empty() {
        bail!("usage: ask [--age N] [--income LABEL] <question...>");
    }
    Ok(Args { profile, question })
}

fn main() -> Result<()> {
    init_tracing();

    let args = parse_args(std::env::args().skip(1))?;
    let config = CoachConfig::from_env().context("loading configuration")?;
    let coach = CoachOrchestrator::with_gemini(config).context("building the coach")?;

    let profile = (!args.profile.is_empty()).then_some(&args.profile);
    let reply = coach.generate_reply(&args.question, &ConversationHistory::new(), profile);

    println!("{}", reply.text);
    eprintln!("[source: {}]", serde_json::to_string(&reply.source)?);
    Ok(())
}
