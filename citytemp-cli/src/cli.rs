use anyhow::{Context, Result};
use citytemp_core::{
    Config, Report, TemperatureTool, ToolOutcome, descriptor,
};
use clap::{Parser, Subcommand};
use inquire::{Text, validator::Validation};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citytemp", version, about = "Current or average temperature of an Italian city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the contact email sent to the geocoding service.
    Configure,

    /// Show the temperature for a city.
    Temperature {
        /// City name, e.g. "Roma" or "L'Aquila".
        city: String,

        /// Average over this many past days; 0 means "now".
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        past_days: i64,

        /// Also print the mean of each day in the window.
        #[arg(long)]
        daily: bool,
    },

    /// Invoke the tool with a JSON argument object, e.g. '{"city":"Roma","pastDays":3}'.
    Call {
        args: String,
    },

    /// Print the tool descriptor (name, description, input schema) as JSON.
    Describe,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Describe => {
                println!("{}", serde_json::to_string_pretty(&descriptor())?);
                Ok(())
            }
            Command::Temperature { city, past_days, daily } => {
                let tool = load_tool()?;
                if daily {
                    print_with_breakdown(&tool, &city, past_days).await
                } else {
                    print_outcome(&tool.call(&city, past_days).await)
                }
            }
            Command::Call { args } => {
                let args: serde_json::Value =
                    serde_json::from_str(&args).context("Tool arguments must be a JSON object")?;
                let tool = load_tool()?;
                println!("{}", tool.call_json(args).await);
                Ok(())
            }
        }
    }
}

/// Read configuration and build the tool. A missing contact email stops the
/// process here, before any request is made.
fn load_tool() -> Result<TemperatureTool> {
    let settings = Config::load_with_env()?.resolve()?;

    TemperatureTool::from_settings(&settings)
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let mut prompt = Text::new("Contact email for the geocoding service:")
        .with_help_message("Sent in the User-Agent header so the service operators can reach you.")
        .with_validator(|input: &str| {
            Ok(if input.trim().contains('@') {
                Validation::Valid
            } else {
                Validation::Invalid("Please enter an email address.".into())
            })
        });
    if let Some(current) = cfg.contact_email() {
        prompt = prompt.with_default(current);
    }

    let email = prompt.prompt().context("Failed to read contact email")?;
    cfg.set_contact_email(email);
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_outcome(outcome: &ToolOutcome) -> Result<()> {
    match outcome {
        ToolOutcome::Success(text) => println!("{text}"),
        ToolOutcome::Failure { .. } => println!("{}", outcome.to_json()),
    }
    Ok(())
}

async fn print_with_breakdown(tool: &TemperatureTool, city: &str, past_days: i64) -> Result<()> {
    match tool.run(city, past_days).await {
        Ok(report) => {
            println!("{report}");
            if let Report::Average { daily, .. } = &report {
                for day in daily {
                    println!("  {}  {:.1}°C", day.day, day.mean);
                }
            }
            Ok(())
        }
        Err(err) => {
            tracing::warn!(city, past_days, kind = %err.kind(), "{err}");
            print_outcome(&ToolOutcome::from(err))
        }
    }
}
