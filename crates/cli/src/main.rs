use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use healthsense_core::types::SymptomRequest;
use healthsense_core::validation::validate_request;
use healthsense_core::{AssessmentId, AssessmentPipeline, Prompt, ProviderConfig, ProviderEnv};

#[derive(Parser)]
#[command(name = "healthsense")]
#[command(about = "HealthSense symptom checker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse symptoms against the configured provider and print the assessment as JSON
    Analyze(SymptomArgs),
    /// Print the prompt that would be sent for these symptoms, without calling the provider
    Prompt(SymptomArgs),
    /// List the model candidates in fallback order
    Models,
}

#[derive(Args)]
struct SymptomArgs {
    /// Free-text symptom description
    #[arg(long)]
    symptoms: String,
    /// Age in years (0-120)
    #[arg(long, allow_negative_numbers = true)]
    age: i32,
    /// Gender as reported by the patient
    #[arg(long, default_value = "unspecified")]
    gender: String,
    /// How long the symptoms have lasted, e.g. "3 days"
    #[arg(long, default_value = "unknown")]
    duration: String,
    /// Severity from 1 to 10
    #[arg(long, allow_negative_numbers = true)]
    severity: i32,
}

impl From<SymptomArgs> for SymptomRequest {
    fn from(args: SymptomArgs) -> Self {
        SymptomRequest {
            symptoms: args.symptoms,
            age: args.age,
            gender: args.gender,
            duration: args.duration,
            severity: args.severity,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthsense=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ProviderConfig::from_env_values(ProviderEnv::from_process_env())?;

    match cli.command {
        Commands::Analyze(args) => {
            let request = SymptomRequest::from(args);
            let pipeline = AssessmentPipeline::from_config(config)?;
            let assessment = pipeline.analyze(&request).await?;
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        Commands::Prompt(args) => {
            let request = SymptomRequest::from(args);
            validate_request(&request)?;
            let prompt = Prompt::for_request(&request, &AssessmentId::new());
            println!("--- system ---\n{}\n\n--- user ---\n{}", prompt.system, prompt.user);
        }
        Commands::Models => {
            for (idx, model) in config.models().iter().enumerate() {
                println!("{}. {}", idx + 1, model);
            }
            if !config.is_configured() {
                eprintln!("warning: OPENROUTER_API_KEY is not set; `analyze` will fail");
            }
        }
    }

    Ok(())
}
