use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::debug;
use recipe_ingest::ocr::GoogleVisionRecognizer;
use recipe_ingest::pipelines;
use recipe_ingest::shopping::{aggregate, ShoppingEntry};
use recipe_ingest::{ImportError, IngestConfig, NormalizedRecipe, Orchestrator};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest a recipe page
    Url {
        /// Recipe page URL
        url: String,
    },
    /// Parse recipe photos, or text already recognized from one
    Ocr {
        /// Images to recognize, in page order
        #[arg(required_unless_present = "text")]
        images: Vec<PathBuf>,

        /// Parse this OCR text file instead of calling the recognizer
        #[arg(long, conflicts_with = "images")]
        text: Option<PathBuf>,
    },
    /// Parse a pasted plain text or markdown recipe
    Text {
        file: PathBuf,
    },
    /// Build a shopping list from recipe files (JSON records or text)
    Shopping {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run(Cli::parse()).await {
        match err.ingestion_code() {
            Some(code) => eprintln!("error: {err} ({})", code.as_str()),
            None => eprintln!("error: {err}"),
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), ImportError> {
    debug!("{:?}", cli);
    match cli.command {
        Command::Url { url } => {
            let config = IngestConfig::load()?;
            let orchestrator = Orchestrator::from_config(&config)?;
            let import = pipelines::url::process(&orchestrator, &url).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&import.recipe)?);
            } else {
                print_recipe(&import.recipe);
                if let Some(score) = import.report.score() {
                    println!(
                        "\n(stage: {:?}, score: {score:.1})",
                        import.report.diagnostics.stage_used
                    );
                }
            }
        }
        Command::Ocr { images, text } => {
            let recipe = match text {
                Some(path) => {
                    pipelines::image::from_ocr_text(&tokio::fs::read_to_string(path).await?)?
                }
                None => {
                    let config = IngestConfig::load()?;
                    let recognizer = GoogleVisionRecognizer::from_config(&config.ocr)?;
                    pipelines::image::process(&recognizer, &images).await?
                }
            };
            output(&recipe, cli.json)?;
        }
        Command::Text { file } => {
            let text = tokio::fs::read_to_string(file).await?;
            output(&pipelines::text::process(&text)?, cli.json)?;
        }
        Command::Shopping { files } => {
            let mut entries = Vec::new();
            for file in files {
                let content = tokio::fs::read_to_string(&file).await?;
                let recipe = match serde_json::from_str::<NormalizedRecipe>(&content) {
                    Ok(recipe) => recipe,
                    Err(_) => pipelines::text::process(&content)?,
                };
                entries.extend(ShoppingEntry::from_recipe(&recipe));
            }
            let list = aggregate(&entries);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for category in &list {
                    println!("{}", category.category);
                    for item in &category.items {
                        match &item.amount {
                            Some(amount) => println!("  - {} ({amount})", item.display),
                            None => println!("  - {}", item.display),
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn output(recipe: &NormalizedRecipe, json: bool) -> Result<(), ImportError> {
    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        print_recipe(recipe);
    }
    Ok(())
}

fn print_recipe(recipe: &NormalizedRecipe) {
    println!("# {}\n", recipe.title);
    if let Some(description) = &recipe.description {
        println!("{description}\n");
    }
    println!("## Ingredients\n");
    for line in &recipe.ingredients {
        println!("- {line}");
    }
    println!("\n## Instructions\n");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("{}. {step}", i + 1);
    }
    if !recipe.notes.is_empty() {
        println!("\n## Notes\n");
        for note in &recipe.notes {
            println!("- {note}");
        }
    }
}
