//! CLI tool to tokenize, check, and inspect source files.

use std::fs;
use std::process::ExitCode;

use minic::{Analysis, analyze, report};

fn print_usage() {
    eprintln!("Usage: minic <command> [--json] [files...]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  tokens   Print the token stream and per-kind counts");
    eprintln!("  check    Report lexical, syntax, and semantic errors");
    eprintln!("  symbols  Print the symbol table");
    eprintln!("  report   Print tokens, errors, and symbols together");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json   Emit machine-readable JSON on stdout");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  minic check main.mc");
    eprintln!("  minic symbols --json main.mc");
}

#[derive(Clone, Copy)]
enum Command {
    Tokens,
    Check,
    Symbols,
    Report,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "tokens" => Some(Self::Tokens),
            "check" => Some(Self::Check),
            "symbols" => Some(Self::Symbols),
            "report" => Some(Self::Report),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return ExitCode::from(2);
    }

    let Some(command) = Command::from_arg(&args[1]) else {
        eprintln!("Unknown command: {}", args[1]);
        return ExitCode::from(2);
    };

    let json = args[2..].iter().any(|a| a == "--json");
    let files: Vec<&String> = args[2..].iter().filter(|a| *a != "--json").collect();

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        let analysis = analyze(&content);
        let result = if json {
            print_json(command, &analysis)
        } else {
            print_text(command, path, &analysis);
            Ok(())
        };

        if let Err(e) = result {
            eprintln!("{path}: {e}");
            had_error = true;
        }

        if matches!(command, Command::Check) && !analysis.is_clean() {
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_text(command: Command, path: &str, analysis: &Analysis) {
    match command {
        Command::Tokens => print!("{}", report::format_tokens(&analysis.tokens)),
        Command::Check => {
            for diag in analysis.diagnostics() {
                let span = diag.span();
                eprintln!(
                    "{path}:{}:{}: {} error: {}",
                    span.line,
                    span.column,
                    diag.category(),
                    diag.message()
                );
            }
            if !analysis.parsed() {
                eprintln!("{path}: syntax analysis skipped: fix lexical errors first");
            }
            if analysis.is_clean() {
                eprintln!(
                    "{path}: ok ({} declaration(s), {})",
                    analysis.declarations().len(),
                    report::summary_line(analysis)
                );
            }
        }
        Command::Symbols => print!("{}", report::format_symbol_table(&analysis.symbols)),
        Command::Report => print!("{}", report::format_report(analysis)),
    }
}

fn print_json(command: Command, analysis: &Analysis) -> Result<(), serde_json::Error> {
    let out = match command {
        Command::Tokens => serde_json::to_string_pretty(&analysis.tokens)?,
        Command::Check => serde_json::to_string_pretty(&analysis.diagnostics())?,
        Command::Symbols => serde_json::to_string_pretty(&analysis.symbols)?,
        Command::Report => serde_json::to_string_pretty(analysis)?,
    };
    println!("{out}");
    Ok(())
}
