use bizprompt_sdk::{Prompt, PromptCategory, PromptFilter};
use clap::{Parser, Subcommand};
use console::style;

use crate::{
    Context,
    output::{OutputFormat, print_json, truncate},
};

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct PromptsCommand {
    /// Output format: json or pretty (default: pretty)
    #[arg(long = "format", short = 'f', global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[clap(subcommand)]
    pub command: PromptsSubcommand,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum PromptsSubcommand {
    /// List prompts, optionally filtered
    List {
        /// Only prompts of this category (email, content, research, meetings, sales)
        #[arg(long = "category", short = 'c')]
        category: Option<PromptCategory>,

        /// Only premium (true) or free (false) prompts
        #[arg(long = "premium")]
        premium: Option<bool>,
    },
    /// Prompt counts per category
    Categories,
    /// Premium prompts (requires a paid subscription)
    Premium,
}

impl PromptsCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        match &self.command {
            PromptsSubcommand::List { category, premium } => {
                let filter = PromptFilter {
                    category: category.clone(),
                    is_premium: *premium,
                };
                let prompts = ctx
                    .client
                    .list_prompts(&filter)
                    .await
                    .map_err(|e| format!("Failed to list prompts: {}", e))?;
                self.print_prompts(&prompts)
            }
            PromptsSubcommand::Categories => {
                let categories = ctx
                    .client
                    .prompt_categories()
                    .await
                    .map_err(|e| format!("Failed to list categories: {}", e))?;

                match self.format {
                    OutputFormat::Json => print_json(&categories),
                    OutputFormat::Pretty => {
                        println!("{:<25} {}", "Category", "Prompts");
                        println!("{}", "-".repeat(35));
                        for entry in &categories {
                            println!("{:<25} {}", entry.category.title(), entry.count);
                        }
                        Ok(())
                    }
                }
            }
            PromptsSubcommand::Premium => {
                let prompts = ctx.client.premium_prompts().await.map_err(|e| match e.status() {
                    Some(403) => "Premium subscription required. Run `bizprompt checkout` to get full access.".to_string(),
                    _ => format!("Failed to list premium prompts: {}", e),
                })?;
                self.print_prompts(&prompts)
            }
        }
    }

    fn print_prompts(&self, prompts: &[Prompt]) -> Result<(), String> {
        match self.format {
            OutputFormat::Json => print_json(&prompts),
            OutputFormat::Pretty => {
                if prompts.is_empty() {
                    println!("No prompts found.");
                    return Ok(());
                }

                println!(
                    "{:<12} {:<40} {:<10} {:<8} {}",
                    "Category", "Title", "Saves", "Premium", "Description"
                );
                println!("{}", "-".repeat(100));

                for prompt in prompts {
                    let premium = if prompt.is_premium { "✓" } else { "✗" };
                    println!(
                        "{:<12} {:<40} {:<10} {:<8} {}",
                        prompt.category.as_str(),
                        truncate(&prompt.title, 40),
                        format!("{} min", prompt.time_saved_minutes),
                        premium,
                        truncate(&prompt.description, 35)
                    );
                }

                println!();
                println!("{}", style(format!("{} prompts", prompts.len())).dim());
                Ok(())
            }
        }
    }
}
