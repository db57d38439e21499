use anyhow::{Context, Result};
use slack_triage::message::format_ts;
use slack_triage::slack::SlackClient;

use super::GlobalOpts;

pub fn run(opts: &GlobalOpts, query: Option<&str>, limit: u32) -> Result<()> {
    let config = opts.load_config()?;
    let token = config.slack_token();
    if token.is_empty() {
        anyhow::bail!(
            "No Slack token configured. Set slack.user_token in config.json or SLACK_USER_TOKEN."
        );
    }
    let query = query.unwrap_or(config.slack.search_query.as_str());

    let client = SlackClient::new(token);
    let results = client.search_messages(query, limit).context("Search failed")?;

    if results.is_empty() {
        println!("No messages for: {}", query);
        return Ok(());
    }

    println!("Messages for: {}\n", query);
    for (index, m) in results.iter().enumerate() {
        println!(
            "{:>3}. [{}] #{} {}",
            index + 1,
            format_ts(&m.ts),
            m.channel_name,
            m.user_name,
        );
        println!("     {}", m.preview());
        println!("     channel: {}  ts: {}", m.channel_id, m.thread_ts);
        if let Some(link) = &m.permalink {
            println!("     {}", link);
        }
    }

    println!("\nFound: {} messages", results.len());

    Ok(())
}
