use clap::{Parser, Subcommand};

use crate::{
    Context,
    output::{OutputFormat, print_json},
};

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct AdminCommand {
    /// Output format: json or pretty (default: pretty)
    #[arg(long = "format", short = 'f', global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[clap(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum AdminSubcommand {
    /// Users, leads, surveys and revenue metrics
    Dashboard,
    /// All registered users
    Users,
    /// All survey responses
    Responses,
}

impl AdminCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let denied = |e: bizprompt_sdk::SdkError| match e.status() {
            Some(403) => "Admin access required".to_string(),
            _ => format!("Admin request failed: {}", e),
        };

        match &self.command {
            AdminSubcommand::Dashboard => {
                let metrics = ctx.client.admin_dashboard().await.map_err(denied)?;
                match self.format {
                    OutputFormat::Json => print_json(&metrics),
                    OutputFormat::Pretty => {
                        println!("Users");
                        println!("  total:           {}", metrics.users.total);
                        println!("  paid:            {}", metrics.users.paid);
                        println!("  last 7 days:     {}", metrics.users.recent_signups);
                        println!("  conversion rate: {:.1}%", metrics.users.conversion_rate);
                        println!("Leads");
                        println!("  total:           {}", metrics.leads.total);
                        println!("  last 7 days:     {}", metrics.leads.recent);
                        println!("Surveys");
                        println!("  responses:       {}", metrics.surveys.total_responses);
                        println!("Revenue");
                        println!(
                            "  total:           {:.2} / {:.2} monthly target",
                            metrics.revenue.total, metrics.revenue.monthly_target
                        );
                        Ok(())
                    }
                }
            }
            AdminSubcommand::Users => {
                let users = ctx.client.admin_users().await.map_err(denied)?;
                match self.format {
                    OutputFormat::Json => print_json(&users),
                    OutputFormat::Pretty => {
                        println!("{:<35} {:<25} {:<10} {:<10} {}", "Email", "Name", "Role", "Plan", "Active");
                        println!("{}", "-".repeat(90));
                        for user in &users {
                            println!(
                                "{:<35} {:<25} {:<10} {:<10} {}",
                                user.email,
                                user.display_name(),
                                user.role.to_string(),
                                user.subscription_status,
                                if user.is_active { "✓" } else { "✗" }
                            );
                        }
                        Ok(())
                    }
                }
            }
            AdminSubcommand::Responses => {
                let responses = ctx.client.admin_survey_responses().await.map_err(denied)?;
                match self.format {
                    OutputFormat::Json => print_json(&responses),
                    OutputFormat::Pretty => {
                        for response in &responses {
                            let submitted = response
                                .submitted_at
                                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_default();
                            println!(
                                "{} {} ({} answers) {}",
                                response.survey_id,
                                response.user_email,
                                response.responses.len(),
                                submitted
                            );
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}
