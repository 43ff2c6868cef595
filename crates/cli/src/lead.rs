use bizprompt_sdk::LeadMagnetSignup;
use clap::Parser;
use console::style;

use crate::Context;

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct LeadCommand {
    /// Email address to send the guide to
    #[arg(long = "email", short = 'e')]
    pub email: String,

    #[arg(long = "first-name")]
    pub first_name: Option<String>,

    /// Where the signup came from
    #[arg(long = "source", default_value = "website")]
    pub source: String,
}

impl LeadCommand {
    fn signup(&self) -> LeadMagnetSignup {
        let mut signup = LeadMagnetSignup::new(&self.email).with_source(&self.source);
        if let Some(first_name) = &self.first_name {
            signup = signup.with_first_name(first_name);
        }
        signup
    }

    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let response = ctx
            .client
            .submit_lead_magnet(&self.signup())
            .await
            .map_err(|e| format!("Signup failed: {}", e))?;

        println!("{} {}", style("✓").green(), response.message);
        if let Some(url) = &response.lead_magnet_url {
            println!("Download: {}", style(url).cyan());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_from_args() {
        let cmd = LeadCommand::parse_from(["lead", "--email", "ada@example.com", "--first-name", "Ada"]);
        let signup = cmd.signup();
        assert_eq!(signup.email, "ada@example.com");
        assert_eq!(signup.first_name.as_deref(), Some("Ada"));
        assert_eq!(signup.lead_magnet_type, "ai_prompts_guide");
        assert_eq!(signup.source, "website");
    }
}
