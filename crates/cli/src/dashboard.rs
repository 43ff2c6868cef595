use bizprompt_sdk::SdkError;
use clap::Parser;
use console::style;

use crate::{
    Context,
    output::{OutputFormat, print_json},
};

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct DashboardCommand {
    /// Output format: json or pretty (default: pretty)
    #[arg(long = "format", short = 'f', default_value = "pretty")]
    pub format: OutputFormat,
}

impl DashboardCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let dashboard = ctx.client.dashboard().await.map_err(|e| match e {
            SdkError::NotAuthenticated | SdkError::Unauthorized(_) => {
                "Not logged in. Run `bizprompt auth login` first.".to_string()
            }
            e => format!("Failed to load dashboard: {}", e),
        })?;

        if self.format == OutputFormat::Json {
            return print_json(&dashboard);
        }

        let user = &dashboard.user;
        println!("Welcome back, {}!", style(user.display_name()).bold());
        println!("Email:        {}", user.email);
        println!("Subscription: {}", user.subscription_status);
        println!();

        if !user.has_premium_access() {
            println!(
                "{}",
                style("Premium prompts are locked. Run `bizprompt checkout` to unlock them.")
                    .yellow()
            );
            println!();
        }

        println!("{:<25} {}", "Category", "Prompts");
        println!("{}", "-".repeat(35));
        for entry in &dashboard.categories {
            println!("{:<25} {}", entry.category.title(), entry.count);
        }
        println!();
        println!(
            "{}",
            style(format!("{} prompts available", dashboard.total_prompts())).dim()
        );
        Ok(())
    }
}
