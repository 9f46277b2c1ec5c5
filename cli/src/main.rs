use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

use jsontagger::{process_file, Config, Mode, Report, TaggerError, DEFAULT_KEY};

#[derive(Parser)]
#[command(name = "jsontagger")]
#[command(about = "A tool for managing JSON tags in Go struct fields")]
#[command(long_about = "A tool for managing JSON tags in Go struct fields.

 - Converts existing tags between snake_case and lowerCamelCase
 - Generates new tags for fields without them
 - Preserves tag options like `omitempty`
 - Works with fields that have other, non-JSON tags")]
struct Cli {
    /// Go file to process
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Convert tags to snake_case
    #[arg(long)]
    snake: bool,

    /// Convert tags to lowerCamelCase (default)
    #[arg(long)]
    camel: bool,

    /// Struct tag key to normalize
    #[arg(long, default_value = DEFAULT_KEY)]
    key: String,

    /// Print the rewritten source instead of overwriting the file
    #[arg(long)]
    dry_run: bool,

    /// Print a JSON report of the changed fields
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(TaggerError::MissingFile) => {
            eprintln!("Error: Missing required --file parameter\n");
            eprintln!("{}", Cli::command().render_help());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Printed regardless of the log filter.
fn flag_warning(cli: &Cli) -> Option<&'static str> {
    (cli.snake && cli.camel).then_some("Warning: Both --snake and --camel flags set. Using snake_case.")
}

fn run(cli: &Cli) -> Result<(), TaggerError> {
    if let Some(warning) = flag_warning(cli) {
        eprintln!("{}", warning);
    }
    let mode = Mode::from_flags(cli.snake, cli.camel);
    let config = Config::new(cli.file.clone(), &cli.key, mode, cli.dry_run)?;

    let rewrite = process_file(&config)?;

    if cli.json {
        println!("{}", Report::new(&config, &rewrite).to_json()?);
    } else if let (true, Some(output)) = (config.dry_run, &rewrite.output) {
        print!("{}", output);
    } else if rewrite.changed() {
        println!("Successfully updated {} tags in {}", config.key, config.path.display());
    } else {
        println!("No {} tags were modified.", config.key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_case_flags_warn() {
        let cli = Cli::try_parse_from(["jsontagger", "-f", "a.go", "--snake", "--camel"]).unwrap();
        assert!(flag_warning(&cli).is_some_and(|w| w.contains("Using snake_case")));
        assert_eq!(Mode::from_flags(cli.snake, cli.camel), Mode::Snake);

        let cli = Cli::try_parse_from(["jsontagger", "-f", "a.go", "--camel"]).unwrap();
        assert_eq!(flag_warning(&cli), None);
    }

    #[test]
    fn test_key_defaults_to_json() {
        let cli = Cli::try_parse_from(["jsontagger", "--file", "a.go"]).unwrap();
        assert_eq!(cli.key, DEFAULT_KEY);
        assert!(!cli.dry_run && !cli.json);
    }
}
