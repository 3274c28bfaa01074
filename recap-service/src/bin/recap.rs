//! Run one recap request from the command line and print the JSON response.

use anyhow::Context as _;
use clap::Parser;
use recap_flow::{RecapConfig, RecapWorkflow};
use recap_service::RecapResponse;

#[derive(Parser, Debug)]
#[command(name = "recap", about = "Spoiler-free TV recap for a free-text request")]
struct Args {
    /// What to recap, e.g. "I'm on season 3 episode 5 of Game of Thrones"
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,

    /// Override RECAP_MODEL
    #[arg(long)]
    recap_model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recap_flow=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = RecapConfig::from_env();
    if let Some(model) = args.recap_model {
        config.recap_model = model;
    }

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        anyhow::bail!("missing credentials: {}", missing.join(", "));
    }

    let query = args.query.join(" ");
    let result = RecapWorkflow::from_config(&config)
        .run(&query)
        .await
        .with_context(|| format!("recap failed for {query:?}"))?;

    let response = RecapResponse::from(result);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{rendered}");

    Ok(())
}
