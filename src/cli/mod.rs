use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the relay endpoint (POST /api/linkr) over HTTP
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Generate the brief for a company domain, or recall it from history
    Run {
        domain: String,

        /// Base URL of a running `linkr serve` to relay through instead of
        /// calling the completion service directly
        #[arg(short, long)]
        endpoint: Option<String>,
    },

    /// List recent queries, most recent first
    History,

    /// Print a stored brief without calling the completion service
    Show {
        domain: String,
    },
}
