// minic: syntax and semantic analyzer for a small C-like language

use std::fs;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("minic");
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.c>", program_name);
        std::process::exit(1);
    }

    let input_file = &args[1];

    if !Path::new(input_file).exists() {
        eprintln!("Error: File '{}' not found", input_file);
        std::process::exit(1);
    }

    let source = match fs::read_to_string(input_file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Could not read '{}': {}", input_file, e);
            std::process::exit(1);
        }
    };

    let analysis = minic::analyze(&source);

    for diagnostic in analysis.diagnostics.iter() {
        eprintln!("{}", diagnostic);
    }

    let errors = analysis.error_count();
    let warnings = analysis.diagnostics.warning_count();
    if errors > 0 {
        eprintln!("{}: {} error(s), {} warning(s)", input_file, errors, warnings);
        std::process::exit(1);
    }
    eprintln!("{}: ok, {} warning(s)", input_file, warnings);
}
