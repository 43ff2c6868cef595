//! Checkout and payment confirmation
//!
//! `checkout` creates a hosted payment session and prints (or opens) its URL.
//! After paying, the browser lands on the success page with a `session_id`
//! query parameter; `confirm` takes that id (or the whole URL) and polls the
//! backend until the payment settles.

use std::time::Duration;

use bizprompt_sdk::{
    CheckoutRequest, ConfirmationView, PaymentPoller, PollState, PollerConfig, ProductType,
    session_id_from_redirect,
};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::Context;

const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct CheckoutCommand {
    /// Product package: presale or regular
    #[arg(long = "product", default_value = "presale")]
    pub product: ProductType,

    /// Site the payment page redirects back to
    #[arg(long = "site-url", env = "SITE_URL", default_value = DEFAULT_SITE_URL)]
    pub site_url: String,

    /// Override the success redirect (default: <site-url>/success)
    #[arg(long = "success-url")]
    pub success_url: Option<String>,

    /// Override the cancel redirect (default: <site-url>/)
    #[arg(long = "cancel-url")]
    pub cancel_url: Option<String>,

    /// Open the payment page in the browser
    #[arg(long = "open", default_value = "false")]
    pub open: bool,
}

impl CheckoutCommand {
    fn request(&self) -> CheckoutRequest {
        let site = self.site_url.trim_end_matches('/');
        CheckoutRequest {
            product_type: self.product,
            success_url: self
                .success_url
                .clone()
                .unwrap_or_else(|| format!("{}/success", site)),
            cancel_url: self
                .cancel_url
                .clone()
                .unwrap_or_else(|| format!("{}/", site)),
        }
    }

    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let request = self.request();
        println!(
            "{} (${:.0} {})",
            style(self.product.display_name()).bold(),
            self.product.price(),
            self.product.currency().to_uppercase()
        );

        let session = ctx
            .client
            .create_checkout(&request)
            .await
            .map_err(|e| format!("Failed to create payment session: {}", e))?;

        // create_checkout rejects sessions without a URL
        let checkout_url = session.checkout_url.unwrap_or_default();

        println!("Payment page: {}", style(&checkout_url).cyan());
        if let Some(session_id) = &session.session_id {
            println!("Session ID:   {}", session_id);
        }

        if self.open && open::that(&checkout_url).is_err() {
            println!(
                "Failed to automatically open your browser. Please open the URL above."
            );
        }

        println!();
        println!(
            "After paying, run `bizprompt confirm --redirect-url <url>` with the page you land on."
        );
        Ok(())
    }
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct ConfirmCommand {
    /// Checkout session ID
    #[arg(long = "session-id", short = 's', conflicts_with = "redirect_url")]
    pub session_id: Option<String>,

    /// Success page URL carrying `session_id` in its query string
    #[arg(long = "redirect-url", short = 'u')]
    pub redirect_url: Option<String>,

    /// Delay between status checks in milliseconds
    #[arg(long = "interval-ms", default_value = "2000")]
    pub interval_ms: u64,

    /// Give up after this many status checks
    #[arg(long = "max-attempts", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Give up after this many seconds (0 waits indefinitely)
    #[arg(long = "timeout-secs", default_value = "600")]
    pub timeout_secs: u64,
}

impl ConfirmCommand {
    /// Session id from the arguments; pasted ids lose surrounding whitespace
    fn session_id(&self) -> Option<String> {
        match (&self.session_id, &self.redirect_url) {
            (Some(id), _) => Some(id.trim().to_string()),
            (None, Some(url)) => session_id_from_redirect(url.trim()),
            (None, None) => None,
        }
    }

    fn poller_config(&self) -> PollerConfig {
        let mut config = PollerConfig::new().with_interval(self.interval_ms);
        if let Some(max) = self.max_attempts {
            config = config.with_max_attempts(max);
        }
        if self.timeout_secs > 0 {
            config = config.with_deadline(Duration::from_secs(self.timeout_secs));
        }
        config
    }

    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let session_id = self.session_id();
        let config = self.poller_config();
        debug!(?session_id, ?config, "Starting payment confirmation");

        let poller = PaymentPoller::new(ctx.client.clone(), config);
        let mut handle = poller.start(session_id.as_deref());
        let mut rx = handle.subscribe();

        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Verifying your payment...");

        let final_state = loop {
            let state = rx.borrow_and_update().clone();
            if state.is_terminal() {
                break state;
            }
            if state.attempts > 1 {
                spinner.set_message(format!(
                    "Verifying your payment... (check {})",
                    state.attempts
                ));
            }

            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break handle.state();
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    handle.cancel();
                    spinner.finish_and_clear();
                    return Err("Payment confirmation cancelled".to_string());
                }
            }
        };
        spinner.finish_and_clear();

        render(&final_state)
    }
}

/// Print the confirmation screen for a finished run
fn render(state: &PollState) -> Result<(), String> {
    match state.view() {
        ConfirmationView::Success(status) => {
            println!("{} {}", style("✓").green().bold(), style("Payment successful!").bold());
            if let Some(product) = &status.product_name {
                println!("Product: {}", product);
            }
            if let Some(amount) = status.formatted_amount() {
                println!("Amount:  {}", amount);
            }
            println!();
            println!("Your prompts are unlocked. Run `bizprompt dashboard` to get started.");
            Ok(())
        }
        ConfirmationView::Incomplete { status } => {
            println!("{} {}", style("!").yellow().bold(), style("Payment incomplete").bold());
            if let Some(status) = status {
                println!("Reported status: {}", status);
            }
            println!();
            println!("Run `bizprompt checkout` to try again, or contact support if you were charged.");
            Err("Payment was not completed".to_string())
        }
        ConfirmationView::Error { message } => {
            println!("{} {}", style("✗").red().bold(), message);
            if let Some(session_id) = &state.session_id {
                println!();
                println!(
                    "Try again later with `bizprompt confirm --session-id {}`.",
                    session_id
                );
            }
            Err(message)
        }
        ConfirmationView::Checking => {
            Err("Payment confirmation stopped before the payment settled".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use bizprompt_sdk::{PaymentStatus, PollError, PollPhase};

    use super::*;

    fn confirm(args: &[&str]) -> ConfirmCommand {
        let mut argv = vec!["confirm"];
        argv.extend_from_slice(args);
        ConfirmCommand::parse_from(argv)
    }

    #[test]
    fn test_checkout_default_redirects() {
        let cmd = CheckoutCommand::parse_from(["checkout", "--site-url", "https://bizprompt.ai/"]);
        let request = cmd.request();
        assert_eq!(request.product_type, ProductType::Presale);
        assert_eq!(request.success_url, "https://bizprompt.ai/success");
        assert_eq!(request.cancel_url, "https://bizprompt.ai/");

        let cmd = CheckoutCommand::parse_from([
            "checkout",
            "--product",
            "regular",
            "--success-url",
            "https://shop.test/thanks",
        ]);
        let request = cmd.request();
        assert_eq!(request.product_type, ProductType::Regular);
        assert_eq!(request.success_url, "https://shop.test/thanks");
    }

    #[test]
    fn test_confirm_session_id_sources() {
        let cmd = confirm(&["--session-id", "cs_test_1"]);
        assert_eq!(cmd.session_id().as_deref(), Some("cs_test_1"));

        let cmd = confirm(&["--session-id", "  cs_test_1\n"]);
        assert_eq!(cmd.session_id().as_deref(), Some("cs_test_1"));

        let cmd = confirm(&["--redirect-url", "http://localhost:3000/success?session_id=cs_test_2"]);
        assert_eq!(cmd.session_id().as_deref(), Some("cs_test_2"));

        let cmd = confirm(&["--redirect-url", "http://localhost:3000/success"]);
        assert_eq!(cmd.session_id(), None);

        // Unparsable redirects fall through to the missing-session screen
        let cmd = confirm(&["--redirect-url", "garbage"]);
        assert_eq!(cmd.session_id(), None);

        let cmd = confirm(&[]);
        assert_eq!(cmd.session_id(), None);

        assert!(
            ConfirmCommand::try_parse_from(["confirm", "--session-id", "a", "--redirect-url", "b"])
                .is_err()
        );
    }

    #[test]
    fn test_confirm_poller_config() {
        let config = confirm(&[]).poller_config();
        assert_eq!(config.interval_ms, 2000);
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.deadline, Some(Duration::from_secs(600)));

        let config = confirm(&["--timeout-secs", "0", "--interval-ms", "500"]).poller_config();
        assert_eq!(config.interval_ms, 500);
        assert!(config.is_unbounded());

        let config = confirm(&["--max-attempts", "5"]).poller_config();
        assert_eq!(config.max_attempts, Some(5));

        assert!(ConfirmCommand::try_parse_from(["confirm", "--max-attempts", "0"]).is_err());
    }

    fn finished(phase: PollPhase, payment_status: Option<&str>, error: Option<PollError>) -> PollState {
        PollState {
            session_id: Some("cs_test_1".to_string()),
            phase,
            last_status: payment_status.map(|s| PaymentStatus::new("cs_test_1", s)),
            error,
            attempts: 1,
        }
    }

    #[test]
    fn test_render_succeeds_only_when_paid() {
        let paid = finished(PollPhase::Succeeded, Some("paid"), None);
        assert!(render(&paid).is_ok());

        let failed = finished(PollPhase::Failed, Some("expired"), None);
        let errored = finished(
            PollPhase::Errored,
            None,
            Some(PollError::Transport("connection refused".to_string())),
        );
        let missing = finished(PollPhase::Errored, None, Some(PollError::MissingSession));
        let timed_out = finished(
            PollPhase::TimedOut,
            Some("pending"),
            Some(PollError::TimedOut {
                attempts: 3,
                elapsed: Duration::from_secs(6),
            }),
        );
        let checking = finished(PollPhase::Checking, Some("pending"), None);

        let incomplete = render(&failed).unwrap_err();
        let transport = render(&errored).unwrap_err();
        assert_eq!(incomplete, "Payment was not completed");
        assert_eq!(transport, "Unable to verify payment status");
        assert_ne!(incomplete, transport);
        assert_eq!(render(&missing).unwrap_err(), "No payment session found");
        assert_eq!(
            render(&timed_out).unwrap_err(),
            "Payment is still processing after 3 checks"
        );
        assert!(render(&checking).is_err());
    }
}
