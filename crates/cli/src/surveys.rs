use clap::{Parser, Subcommand};
use console::style;

use crate::{
    Context,
    output::{OutputFormat, print_json, truncate},
};

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct SurveysCommand {
    /// Output format: json or pretty (default: pretty)
    #[arg(long = "format", short = 'f', global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[clap(subcommand)]
    pub command: SurveysSubcommand,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
pub enum SurveysSubcommand {
    /// List active surveys
    List,
    /// Submit answers to a survey
    Respond {
        /// Survey ID
        survey_id: String,

        /// Email address of the respondent
        #[arg(long = "email", short = 'e')]
        email: String,

        /// Answers as a JSON object, e.g. '{"q1": "yes"}'
        #[arg(long = "answers", short = 'a')]
        answers: String,
    },
}

impl SurveysCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        match &self.command {
            SurveysSubcommand::List => {
                let surveys = ctx
                    .client
                    .list_surveys()
                    .await
                    .map_err(|e| format!("Failed to list surveys: {}", e))?;

                match self.format {
                    OutputFormat::Json => print_json(&surveys),
                    OutputFormat::Pretty => {
                        if surveys.is_empty() {
                            println!("No active surveys.");
                            return Ok(());
                        }
                        println!("{:<38} {:<30} {:<10} {}", "Survey ID", "Title", "Questions", "Description");
                        println!("{}", "-".repeat(100));
                        for survey in &surveys {
                            println!(
                                "{:<38} {:<30} {:<10} {}",
                                survey.id,
                                truncate(&survey.title, 30),
                                survey.questions.len(),
                                truncate(&survey.description, 30)
                            );
                        }
                        Ok(())
                    }
                }
            }
            SurveysSubcommand::Respond {
                survey_id,
                email,
                answers,
            } => {
                let answers = parse_answers(answers)?;
                let ack = ctx
                    .client
                    .submit_survey_response(survey_id, email, &answers)
                    .await
                    .map_err(|e| format!("Failed to submit survey: {}", e))?;
                println!("{} {}", style("✓").green(), ack.message);
                Ok(())
            }
        }
    }
}

fn parse_answers(raw: &str) -> Result<serde_json::Map<String, serde_json::Value>, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err("Answers must be a JSON object".to_string()),
        Err(e) => Err(format!("Invalid answers JSON: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answers() {
        let answers = parse_answers(r#"{"q1": "yes", "q2": 3}"#).unwrap();
        assert_eq!(answers["q1"], "yes");
        assert_eq!(answers["q2"], 3);

        assert!(parse_answers("[1, 2]").is_err());
        assert!(parse_answers("{not json").is_err());
    }
}
