//! flagform CLI - resolve a YAML-defined form from flags and prompts

use std::io::{self, IsTerminal};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use flagform::{form_command, FixSuggestion, FormDefinition, FormError, MatchesInput, TerminalAsker};

#[derive(Parser)]
#[command(name = "flagform")]
#[command(about = "flagform - resolve form fields from flags and interactive answers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a form and print the values as JSON
    Resolve {
        /// Path to the form definition (YAML)
        file: String,

        /// Never ask questions; missing required values are errors
        #[arg(short = 'n', long)]
        no_interaction: bool,

        /// Field flags, after `--`
        #[arg(last = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Validate a form definition (parse only)
    Check {
        /// Path to the form definition (YAML)
        file: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            file,
            no_interaction,
            args,
        } => resolve_form(&file, no_interaction, args),
        Commands::Check { file } => check_form(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn resolve_form(file: &str, no_interaction: bool, args: Vec<String>) -> Result<(), FormError> {
    let mut form = FormDefinition::from_file(file)?.into_form()?;

    let matches = form_command("flagform resolve", &form)
        .no_binary_name(true)
        .try_get_matches_from(args)
        .unwrap_or_else(|e| e.exit());

    let interactive = !no_interaction && io::stdin().is_terminal();
    let input = MatchesInput::new(&matches, form.option_specs()).interactive(interactive);
    let values = form.resolve(&input, &mut TerminalAsker::stdio())?;

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn check_form(file: &str) -> Result<(), FormError> {
    let form = FormDefinition::from_file(file)?.into_form()?;

    println!("{} Form '{}' is valid", "✓".green(), file);
    for (key, field) in form.fields() {
        let flag = if field.is_option() {
            format!("--{}", field.get_option_name())
        } else {
            "(prompt only)".to_string()
        };
        println!("  {}: {} {} [{}]", key, field.name(), flag.cyan(), field.kind().label());
    }

    Ok(())
}
