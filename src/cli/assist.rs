use anyhow::{Context, Result};
use slack_triage::assist::{AssistEngine, AssistMode};
use slack_triage::message::format_thread;
use slack_triage::slack::SlackClient;

use super::GlobalOpts;

pub fn run(
    opts: &GlobalOpts,
    channel: &str,
    ts: &str,
    mode: &str,
    context: Option<&str>,
    channel_name: Option<&str>,
) -> Result<()> {
    let mode: AssistMode = mode.parse().map_err(anyhow::Error::msg)?;
    let config = opts.load_config()?;
    let prompts = opts.load_prompts();

    let token = config.slack_token();
    if token.is_empty() {
        anyhow::bail!(
            "No Slack token configured. Set slack.token in config.json or SLACK_TOKEN."
        );
    }

    // Retrieval failures are fatal here: assistance over a partial thread
    // would be misleading, so the fetch is all-or-nothing.
    let client = SlackClient::new(token);
    let channel_name = channel_name.unwrap_or(channel);
    let thread = client
        .fetch_thread(channel, ts, channel_name)
        .context("Thread fetch failed")?;

    if thread.is_empty() {
        println!("Thread {} in {} has no messages.", ts, channel);
        return Ok(());
    }

    let root = &thread[0];
    let default_context = format!("{} / {}", root.user_name, root.channel_name);
    let context = context.unwrap_or(default_context.as_str());
    let text = format_thread(&thread);

    let engine = AssistEngine::new(&config, prompts);
    let result = engine.generate(&text, mode, Some(context));

    println!("[{}] {}", result.backend().as_str(), mode.as_str());
    println!();
    println!("{}", result.content());

    Ok(())
}
