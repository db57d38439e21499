mod cli;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "slack-triage",
    version,
    about = "Slack message triage: search your messages, fetch threads, draft assisted replies"
)]
struct App {
    /// Config file (default: ./config/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Prompt directory (default: ./prompts)
    #[arg(long, global = true)]
    prompts: Option<String>,

    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search messages (defaults to the configured query)
    Search {
        /// Slack search query, e.g. "from:@me in:#support"
        query: Option<String>,
        /// Max results
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Fetch a full thread and generate assistance for it
    Assist {
        /// Channel ID (as printed by search)
        #[arg(long)]
        channel: String,
        /// Thread timestamp (as printed by search)
        #[arg(long)]
        ts: String,
        /// reply | summary | todo
        #[arg(long, default_value = "reply")]
        mode: String,
        /// Context line shown to the model (default: "author / channel")
        #[arg(long)]
        context: Option<String>,
        /// Channel display name for the normalized records
        #[arg(long)]
        channel_name: Option<String>,
    },
}

fn main() {
    let app = App::parse();
    slack_triage::tracing_init::init(app.verbose);

    let opts = cli::GlobalOpts {
        config: app.config,
        prompts: app.prompts,
    };

    match app.command {
        Commands::Search { query, limit } => {
            cli::search::run(&opts, query.as_deref(), limit)
                .unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
        Commands::Assist {
            channel,
            ts,
            mode,
            context,
            channel_name,
        } => {
            cli::assist::run(
                &opts,
                &channel,
                &ts,
                &mode,
                context.as_deref(),
                channel_name.as_deref(),
            )
            .unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
    }
}
