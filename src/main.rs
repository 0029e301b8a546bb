use clap::Parser;

use qsparse::config::Config;
use qsparse::search_query::{scan, QueryParser};

mod cli;

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    Ok(json)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = cli::Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    tracing::debug!(?config, "starting");
    let parser = QueryParser::with_config(config);

    match args.command {
        cli::Command::Tokens { query } => {
            let stream = scan(&query);
            println!("{}", to_json(&stream.tokens(), args.pretty)?);
        }

        cli::Command::Parse { query } => {
            let parsed = parser.try_parse(&query)?;
            println!("{}", to_json(&parsed, args.pretty)?);
        }

        cli::Command::Render { query } => {
            let parsed = parser.try_parse(&query)?;
            println!("{parsed}");
        }
    }

    Ok(())
}
