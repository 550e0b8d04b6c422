use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::info;

use polyglot_core::language::{self, Language};
use polyglot_core::{Conversion, convert};

#[derive(Parser)]
#[command(name = "polyglot")]
#[command(about = "Best-effort source-to-source code conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source file (or stdin) to another language
    Convert {
        /// Input file; reads stdin when omitted
        input: Option<PathBuf>,

        /// Source language identifier (inferred from the input extension
        /// when omitted)
        #[arg(long, short)]
        from: Option<String>,

        /// Target language identifier (inferred from the output extension
        /// when omitted)
        #[arg(long, short)]
        to: Option<String>,

        /// Output file; prints to stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Emit the result and warnings as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the supported languages
    Languages {
        /// Emit the registry as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every supported (from, to) conversion pair
    Pairs,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            output,
            json,
        } => run_convert(
            input.as_deref(),
            from.as_deref(),
            to.as_deref(),
            output.as_deref(),
            json,
        ),
        Commands::Languages { json } => run_languages(json),
        Commands::Pairs => run_pairs(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_convert(
    input: Option<&Path>,
    from: Option<&str>,
    to: Option<&str>,
    output: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let source = read_source(input)?;
    let from = resolve_language(from, input, "--from")?;
    let to = resolve_language(to, output, "--to")?;

    let result = convert(&source, from, to).map_err(|e| e.to_string())?;
    info!(
        "converted {} -> {}: {} warnings",
        from,
        to,
        result.warnings.len()
    );

    if json {
        let rendered = render_json(&result)?;
        write_output(output, &rendered)?;
        return Ok(());
    }

    for warning in &result.warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }
    write_output(output, &result.code)
}

fn run_languages(json: bool) -> Result<(), String> {
    let entries = language::registry();
    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to encode registry: {}", e))?;
        println!("{}", rendered);
        return Ok(());
    }
    for info in entries {
        println!(
            "{:<12} {:<12} .{}",
            info.identifier, info.display_name, info.extension
        );
    }
    Ok(())
}

fn run_pairs() -> Result<(), String> {
    for (from, to) in language::supported_pairs() {
        println!("{} -> {}", from, to);
    }
    Ok(())
}

fn read_source(input: Option<&Path>) -> Result<String, String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

/// Resolve a language from an explicit tag, falling back to a file
/// extension when one is available
fn resolve_language(
    tag: Option<&str>,
    path: Option<&Path>,
    flag: &str,
) -> Result<Language, String> {
    if let Some(tag) = tag {
        return Language::parse(tag).map_err(|e| e.to_string());
    }
    if let Some(ext) = path.and_then(|p| p.extension()).and_then(|e| e.to_str())
        && let Some(lang) = Language::from_extension(ext)
    {
        return Ok(lang);
    }
    Err(format!(
        "{} is required (no file extension to infer the language from)",
        flag
    ))
}

fn render_json(result: &Conversion) -> Result<String, String> {
    serde_json::to_string_pretty(result).map_err(|e| format!("Failed to encode result: {}", e))
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, text)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e)),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_tag_wins_over_extension() {
        let path = PathBuf::from("main.py");
        let lang = resolve_language(Some("rust"), Some(&path), "--from").unwrap();
        assert_eq!(lang, Language::Rust);
    }

    #[test]
    fn extension_inference() {
        let path = PathBuf::from("main.py");
        let lang = resolve_language(None, Some(&path), "--from").unwrap();
        assert_eq!(lang, Language::Python);
    }

    #[test]
    fn missing_language_is_an_error() {
        let err = resolve_language(None, None, "--to").unwrap_err();
        assert!(err.contains("--to"));
    }

    #[test]
    fn convert_file_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("add.js");
        let output = dir.path().join("add.py");

        let mut file = fs::File::create(&input).expect("create input");
        writeln!(file, "function add(a, b) {{\n  return a + b;\n}}").expect("write input");

        run_convert(Some(&input), None, None, Some(&output), false).expect("convert");

        let converted = fs::read_to_string(&output).expect("read output");
        assert!(converted.contains("def add(a, b):"));
    }

    #[test]
    fn json_output_includes_warnings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("broken.js");
        let output = dir.path().join("out.json");

        fs::write(&input, "if (x > 0) {\n  doSomething();\n").expect("write input");

        run_convert(Some(&input), None, Some("python"), Some(&output), true).expect("convert");

        let rendered = fs::read_to_string(&output).expect("read output");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert!(value["code"].as_str().is_some());
        assert!(!value["warnings"].as_array().expect("warnings array").is_empty());
    }
}
