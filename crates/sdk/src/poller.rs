//! Payment confirmation polling.
//!
//! After the hosted checkout redirects back with a session id, the payment
//! may still be settling. [`PaymentPoller`] checks the status endpoint until
//! the outcome is known:
//!
//! ```text
//! Idle ──► Checking ──► Succeeded   (status "paid")
//!             │   ▲
//!             │   └── "pending": wait `interval`, check again
//!             ├──────► Failed      (any other status)
//!             ├──────► Errored     (missing session, transport failure)
//!             └──────► TimedOut    (attempt cap or deadline, opt-in)
//! ```
//!
//! Exactly one request is in flight at a time; the follow-up is scheduled
//! from the completion of the previous one. Terminal phases are final.

use std::{future::Future, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::{
    client::ApiClient,
    error::Result,
    types::{PaymentStatus, PollerConfig, StatusKind},
};

/// Anything that can report the payment status of a checkout session
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status(&self, session_id: &str) -> impl Future<Output = Result<PaymentStatus>> + Send;
}

impl StatusSource for ApiClient {
    fn fetch_status(&self, session_id: &str) -> impl Future<Output = Result<PaymentStatus>> + Send {
        self.payment_status(session_id)
    }
}

/// Phase of one confirmation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Created, no request issued yet
    Idle,

    /// Waiting for a settled status
    Checking,

    /// Payment reported as paid
    Succeeded,

    /// Payment settled without success (failed, expired, canceled, ...)
    Failed,

    /// The check itself failed
    Errored,

    /// Still pending when the attempt cap or deadline was reached
    TimedOut,
}

impl PollPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollPhase::Idle | PollPhase::Checking)
    }
}

impl std::fmt::Display for PollPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollPhase::Idle => write!(f, "idle"),
            PollPhase::Checking => write!(f, "checking"),
            PollPhase::Succeeded => write!(f, "succeeded"),
            PollPhase::Failed => write!(f, "failed"),
            PollPhase::Errored => write!(f, "errored"),
            PollPhase::TimedOut => write!(f, "timed_out"),
        }
    }
}

/// Why a confirmation run ended without a settled status
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PollError {
    /// No checkout session id was supplied
    #[error("No payment session found")]
    MissingSession,

    /// The status request failed; the detail is kept for logs
    #[error("Unable to verify payment status")]
    Transport(String),

    /// Still pending when the configured bound was hit
    #[error("Payment is still processing after {attempts} checks")]
    TimedOut { attempts: u32, elapsed: Duration },
}

/// Observable state of one confirmation run
#[derive(Debug, Clone, PartialEq)]
pub struct PollState {
    pub session_id: Option<String>,

    pub phase: PollPhase,

    /// Most recent parsed status
    pub last_status: Option<PaymentStatus>,

    /// Set only for `Errored` and `TimedOut`
    pub error: Option<PollError>,

    /// Status requests issued so far
    pub attempts: u32,
}

impl PollState {
    fn idle(session_id: Option<String>) -> Self {
        Self {
            session_id,
            phase: PollPhase::Idle,
            last_status: None,
            error: None,
            attempts: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// User-facing error message, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// Which of the confirmation screens to show
    pub fn view(&self) -> ConfirmationView {
        match self.phase {
            PollPhase::Idle | PollPhase::Checking => ConfirmationView::Checking,
            PollPhase::Succeeded => match &self.last_status {
                Some(status) => ConfirmationView::Success(status.clone()),
                None => ConfirmationView::Checking,
            },
            PollPhase::Failed => ConfirmationView::Incomplete {
                status: self.last_status.as_ref().map(|s| s.payment_status.clone()),
            },
            PollPhase::Errored | PollPhase::TimedOut => ConfirmationView::Error {
                message: self
                    .error_message()
                    .unwrap_or_else(|| "Unable to verify payment status".to_string()),
            },
        }
    }
}

/// The four confirmation screens
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationView {
    /// "Verifying your payment..."
    Checking,

    /// Verification could not complete; recover by retrying later
    Error { message: String },

    /// Paid; offer the way to the dashboard
    Success(PaymentStatus),

    /// Payment did not go through; offer to try again or contact support
    Incomplete { status: Option<String> },
}

/// Payment confirmation poller
///
/// # Example
///
/// ```ignore
/// use bizprompt_sdk::{ApiClient, ClientConfig, PaymentPoller, PollerConfig};
///
/// let client = ApiClient::new(ClientConfig::new("https://api.example.com"))?;
/// let poller = PaymentPoller::new(client, PollerConfig::default());
///
/// let handle = poller.start(Some("cs_test_123"));
/// let mut rx = handle.subscribe();
/// while rx.changed().await.is_ok() {
///     println!("phase: {}", rx.borrow().phase);
/// }
/// ```
pub struct PaymentPoller<S: StatusSource> {
    source: Arc<S>,
    config: PollerConfig,
}

impl<S: StatusSource> PaymentPoller<S> {
    pub fn new(source: S, config: PollerConfig) -> Self {
        Self::from_shared(Arc::new(source), config)
    }

    /// Poll through a source that is also used elsewhere
    pub fn from_shared(source: Arc<S>, config: PollerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Start confirming `session_id` in the background.
    ///
    /// The id is sent as given. A missing or empty id ends in `Errored` right
    /// away without any request.
    /// Must be called from within a tokio runtime.
    pub fn start(&self, session_id: Option<&str>) -> PollHandle {
        let session_id = session_id.filter(|id| !id.is_empty()).map(str::to_string);

        let (state_tx, state_rx) = watch::channel(PollState::idle(session_id.clone()));

        let Some(session_id) = session_id else {
            warn!("Payment confirmation started without a session id");
            state_tx.send_modify(|state| {
                state.phase = PollPhase::Errored;
                state.error = Some(PollError::MissingSession);
            });
            return PollHandle {
                state_rx,
                shutdown_tx: None,
                task: None,
            };
        };

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let source = Arc::clone(&self.source);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            Self::run_poll(source, session_id, config, state_tx, shutdown_rx).await;
        });

        PollHandle {
            state_rx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Confirm `session_id` and wait for the terminal state
    pub async fn confirm(&self, session_id: Option<&str>) -> PollState {
        self.start(session_id).wait().await
    }

    /// Run the poll loop until a terminal phase or shutdown
    async fn run_poll(
        source: Arc<S>,
        session_id: String,
        config: PollerConfig,
        state_tx: watch::Sender<PollState>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        info!(
            session_id = %session_id,
            interval_ms = config.interval_ms,
            max_attempts = ?config.max_attempts,
            deadline = ?config.deadline,
            "Confirming payment"
        );

        loop {
            attempts += 1;
            state_tx.send_modify(|state| {
                state.phase = PollPhase::Checking;
                state.attempts = attempts;
            });
            debug!(session_id = %session_id, attempt = attempts, "Checking payment status");

            let result = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    debug!(session_id = %session_id, "Confirmation torn down during request");
                    return;
                }
                result = source.fetch_status(&session_id) => result,
            };

            let status = match result {
                Ok(status) => status,
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        attempt = attempts,
                        error = %e,
                        "Payment status check failed"
                    );
                    state_tx.send_modify(|state| {
                        state.phase = PollPhase::Errored;
                        state.error = Some(PollError::Transport(e.to_string()));
                    });
                    return;
                }
            };

            match status.classify() {
                StatusKind::Paid => {
                    info!(session_id = %session_id, attempts, "Payment confirmed");
                    state_tx.send_modify(|state| {
                        state.phase = PollPhase::Succeeded;
                        state.last_status = Some(status);
                    });
                    return;
                }
                StatusKind::Settled(reported) => {
                    info!(
                        session_id = %session_id,
                        attempts,
                        payment_status = %reported,
                        "Payment settled without success"
                    );
                    state_tx.send_modify(|state| {
                        state.phase = PollPhase::Failed;
                        state.last_status = Some(status);
                    });
                    return;
                }
                StatusKind::Pending => {
                    state_tx.send_modify(|state| state.last_status = Some(status));
                }
            }

            if Self::out_of_budget(&config, attempts, started.elapsed()) {
                let elapsed = started.elapsed();
                warn!(
                    session_id = %session_id,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Payment still pending, giving up"
                );
                state_tx.send_modify(|state| {
                    state.phase = PollPhase::TimedOut;
                    state.error = Some(PollError::TimedOut { attempts, elapsed });
                });
                return;
            }

            debug!(
                session_id = %session_id,
                delay_ms = config.interval_ms,
                "Payment pending, scheduling next check"
            );

            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    debug!(session_id = %session_id, "Confirmation torn down before next check");
                    return;
                }
                _ = tokio::time::sleep(config.interval()) => {}
            }
        }
    }

    /// True if another check would exceed the attempt cap or the deadline
    fn out_of_budget(config: &PollerConfig, attempts: u32, elapsed: Duration) -> bool {
        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return true;
            }
        }
        if let Some(deadline) = config.deadline {
            if elapsed + config.interval() > deadline {
                return true;
            }
        }
        false
    }
}

/// Handle to a running confirmation
///
/// Dropping the handle tears the run down: a scheduled check never fires and
/// an in-flight result is discarded without touching the state.
pub struct PollHandle {
    state_rx: watch::Receiver<PollState>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Snapshot of the current state
    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Stop polling. No-op if the run already ended.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
    }

    /// Wait for the run to end and return the final state
    pub async fn wait(mut self) -> PollState {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Payment confirmation task ended abnormally");
            }
        }
        self.state()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
