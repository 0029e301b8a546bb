use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a YAML config file
    #[clap(long, global = true)]
    pub config: Option<String>,

    /// Pretty-print JSON output
    #[clap(long, global = true, default_value = "false")]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a query as JSON
    Tokens {
        /// Query string
        query: String,
    },

    /// Print the parsed query as JSON
    Parse {
        /// Query string
        query: String,
    },

    /// Print the parsed query back in canonical syntax
    Render {
        /// Query string
        query: String,
    },
}
