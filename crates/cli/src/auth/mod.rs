//! Account commands
//!
//! Handles registration, login and logout against the BizPrompt backend.

pub mod store;

use bizprompt_sdk::{RegisterRequest, Session};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::Context;

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct AuthCommand {
    #[clap(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum AuthSubcommand {
    /// Create an account
    Register(RegisterCommand),
    /// Log in with email and password
    Login(LoginCommand),
    /// Log out and forget the stored session
    Logout,
    /// Show current login status
    Status,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct LoginCommand {
    /// Email address for authentication
    #[arg(long = "email", short = 'e')]
    pub email: String,

    /// Password (prompted for when omitted)
    #[arg(long = "password", short = 'p', env = "BIZPROMPT_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug, Default)]
pub struct RegisterCommand {
    #[arg(long = "email", short = 'e')]
    pub email: String,

    /// Password (prompted for when omitted)
    #[arg(long = "password", short = 'p', env = "BIZPROMPT_PASSWORD")]
    pub password: Option<String>,

    #[arg(long = "first-name")]
    pub first_name: Option<String>,

    #[arg(long = "last-name")]
    pub last_name: Option<String>,
}

impl AuthCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        match &self.command {
            AuthSubcommand::Register(cmd) => {
                let password = resolve_password(cmd.password.as_deref(), true)?;
                let mut request = RegisterRequest::new(&cmd.email, password);
                request.first_name = cmd.first_name.clone();
                request.last_name = cmd.last_name.clone();

                let session = ctx
                    .client
                    .register(&request)
                    .await
                    .map_err(|e| format!("Registration failed: {}", e))?;
                ctx.store.save(&session)?;
                print_logged_in(&session);
                Ok(())
            }
            AuthSubcommand::Login(cmd) => {
                let password = resolve_password(cmd.password.as_deref(), false)?;
                let session = ctx
                    .client
                    .login(&cmd.email, password)
                    .await
                    .map_err(|e| format!("Login failed: {}", e))?;
                ctx.store.save(&session)?;
                print_logged_in(&session);
                Ok(())
            }
            AuthSubcommand::Logout => {
                ctx.client.logout();
                ctx.store.clear()?;
                println!("Logged out successfully.");
                Ok(())
            }
            AuthSubcommand::Status => {
                if !ctx.client.is_authenticated() {
                    println!("Not logged in. Run `bizprompt auth login` to authenticate.");
                    return Ok(());
                }
                // Ask the backend: the token may have been revoked
                match ctx.client.me().await {
                    Ok(user) => {
                        println!("Logged in as: {}", user.display_name());
                        println!("Email: {}", user.email);
                        println!("Role: {}", user.role);
                        println!("Subscription: {}", user.subscription_status);
                        Ok(())
                    }
                    Err(e) if e.status() == Some(401) => {
                        println!("Session expired. Run `bizprompt auth login` to log in again.");
                        Ok(())
                    }
                    Err(e) => Err(format!("Failed to fetch account: {}", e)),
                }
            }
        }
    }
}

fn resolve_password(password: Option<&str>, confirm: bool) -> Result<String, String> {
    if let Some(password) = password {
        return Ok(password.to_string());
    }

    let theme = ColorfulTheme::default();
    let mut prompt = Password::with_theme(&theme).with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| format!("Failed to read password: {}", e))
}

fn print_logged_in(session: &Session) {
    println!(
        "{} Logged in as {}.",
        style("✓").green(),
        session.user.display_name()
    );
}
