//! Refract CLI
//!
//! Runs one refactoring against one file at a cursor position.

use refract_engine::refactorings;
use refractc::{parse_args, FileEditor};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("REFRACT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "help" || args[0] == "--help" {
        print_usage();
        return;
    }
    if args[0] == "list" {
        for name in refactorings::command_names() {
            println!("{name}");
        }
        return;
    }

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(reason) => {
            eprintln!("error: {reason}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let Some(refactoring) = refactorings::by_name(&parsed.command) else {
        eprintln!("error: unknown refactoring `{}`", parsed.command);
        eprintln!("run `refract list` to see what is available");
        std::process::exit(2);
    };

    let mut editor = match FileEditor::open(&parsed) {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = refract_engine::execute(refactoring.as_ref(), &mut editor) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    match editor.finish() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: refract <refactoring> <file> --at <line:col[-line:col]> [options]");
    eprintln!();
    eprintln!("Runs a refactoring at a cursor position (1-based line:col) and");
    eprintln!("prints the rewritten file to stdout.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --write             Write the result back to the file(s)");
    eprintln!("  --choice <n|cancel> Answer for a choice prompt (default: 0)");
    eprintln!("  --input <s|cancel>  Answer for a text prompt (default: cancel)");
    eprintln!("  --order <i,j,...>   New parameter order for change-signature,");
    eprintln!("                      as original indices (default: cancel)");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  refract list        List available refactorings");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REFRACT_LOG         Tracing filter (e.g. debug)");
}
