use std::{path::Path, process};

use bizprompt_sdk::{ApiClient, ClientConfig};
use clap::{Parser, Subcommand};

mod admin;
mod auth;
mod checkout;
mod dashboard;
mod lead;
mod output;
mod prompts;
mod surveys;

use auth::store::SessionStore;

/// Shared state handed to every command
#[derive(Clone)]
pub struct Context {
    pub client: ApiClient,
    pub store: SessionStore,
}

impl Context {
    pub fn new(client: ApiClient, store: SessionStore) -> Self {
        Context { client, store }
    }

    /// Persist the client's current session, or remove the stored one if
    /// the backend cleared it
    pub fn sync_session(&self) -> Result<(), String> {
        match self.client.session() {
            Some(session) => self.store.save(&session),
            None => self.store.clear(),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "BizPrompt - AI prompt toolkit client", long_about = None)]
struct Opts {
    /// Backend base URL
    #[arg(
        long = "backend-url",
        short = 'b',
        global = true,
        env = "BACKEND_URL",
        default_value = bizprompt_sdk::types::DEFAULT_ENDPOINT
    )]
    backend_url: String,

    /// Request timeout in milliseconds
    #[arg(long = "timeout-ms", global = true, default_value = "10000")]
    timeout_ms: u64,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long = "verbose", short = 'v', global = true, default_value = "false")]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Account commands
    Auth(auth::AuthCommand),
    /// Sign up for the free prompts guide
    Lead(lead::LeadCommand),
    /// Browse the prompt library
    Prompts(prompts::PromptsCommand),
    /// List and answer surveys
    Surveys(surveys::SurveysCommand),
    /// Admin reports
    Admin(admin::AdminCommand),
    /// Start a checkout on the hosted payment page
    Checkout(checkout::CheckoutCommand),
    /// Confirm a payment after checkout
    Confirm(checkout::ConfirmCommand),
    /// Show account info and unlocked prompt categories
    Dashboard(dashboard::DashboardCommand),
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env before clap reads `env` defaults
    load_env_file(Path::new("."));

    let opts: Opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            process::exit(e.exit_code());
        }
    };

    init_tracing(opts.verbose);

    let ctx = match build_context(&opts) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = handle_command(opts.command, &ctx).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Load environment variables from a .env file in `dir`
fn load_env_file(dir: &Path) {
    let env_file_path = dir.join(".env");

    match dotenvy::from_path(&env_file_path) {
        Ok(_) => {}
        Err(e) if e.not_found() => {
            // .env file not found is fine, just continue silently
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to load .env file at {}: {}",
                env_file_path.display(),
                e
            );
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "bizprompt=debug,bizprompt_sdk=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_context(opts: &Opts) -> Result<Context, String> {
    let config = ClientConfig::new(&opts.backend_url).with_timeout(opts.timeout_ms);
    let client =
        ApiClient::new(config).map_err(|e| format!("Failed to create HTTP client: {}", e))?;

    let store = SessionStore::default_location()?;
    let client = match store.load_valid()? {
        Some(session) => {
            tracing::debug!(email = %session.user.email, "Resumed stored session");
            client.with_session(session)
        }
        None => client,
    };

    Ok(Context::new(client, store))
}

async fn handle_command(command: Command, ctx: &Context) -> Result<(), String> {
    let result = match command {
        Command::Auth(cmd) => cmd.execute(ctx).await,
        Command::Lead(cmd) => cmd.execute(ctx).await,
        Command::Prompts(cmd) => cmd.execute(ctx).await,
        Command::Surveys(cmd) => cmd.execute(ctx).await,
        Command::Admin(cmd) => cmd.execute(ctx).await,
        Command::Checkout(cmd) => cmd.execute(ctx).await,
        Command::Confirm(cmd) => cmd.execute(ctx).await,
        Command::Dashboard(cmd) => cmd.execute(ctx).await,
    };

    // A 401 anywhere clears the client's session; mirror that on disk
    settle(result, ctx.sync_session())
}

/// Outcome of a command once its session has been written back.
/// The command's own error wins over a failed write.
fn settle(result: Result<(), String>, synced: Result<(), String>) -> Result<(), String> {
    match (result, synced) {
        (Err(e), Err(sync_error)) => {
            tracing::warn!(error = %sync_error, "Failed to update stored session");
            Err(e)
        }
        (result, synced) => result.and(synced),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_wins_over_session_write() {
        let write_failed = || Err("Failed to write session file".to_string());

        assert_eq!(
            settle(Err("Login failed: bad password".to_string()), write_failed()),
            Err("Login failed: bad password".to_string())
        );
        assert_eq!(
            settle(Ok(()), write_failed()),
            Err("Failed to write session file".to_string())
        );
        assert_eq!(settle(Err("boom".to_string()), Ok(())), Err("boom".to_string()));
        assert_eq!(settle(Ok(()), Ok(())), Ok(()));
    }
}
