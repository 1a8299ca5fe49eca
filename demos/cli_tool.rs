//! CLI Tool Example
//!
//! This example demonstrates how to build a command-line tool
//! using xlsxconv for converting spreadsheets to Markdown, CSV, JSON or HTML.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use xlsxconv::{list_sheet_names, ConvertError, ConverterBuilder, OutputFormat, SheetSelector};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage(&args[0]);
        process::exit(1);
    }

    if args[2] == "--list" {
        match list_sheet_names(&args[1]) {
            Ok(names) => {
                for name in names {
                    println!("{}", name);
                }
                return;
            }
            Err(e) => {
                handle_error(e);
                process::exit(1);
            }
        }
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let use_stdout = output_path == "-";

    // Parse options
    let mut sheet_selector = SheetSelector::All;
    let mut format = None;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--sheet" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --sheet requires a value");
                    process::exit(1);
                }
                sheet_selector = SheetSelector::Name(args[i + 1].clone());
                i += 2;
            }
            "--format" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --format requires a value");
                    process::exit(1);
                }
                format = Some(args[i + 1].parse::<OutputFormat>().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }));
                i += 2;
            }
            _ => {
                eprintln!("Error: Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
    }

    // Without --format, infer the format from the output file extension
    let format = format.unwrap_or_else(|| {
        Path::new(output_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<OutputFormat>().ok())
            .unwrap_or(OutputFormat::Markdown)
    });

    match convert(input_path, output_path, sheet_selector, format, use_stdout) {
        Ok(_) => {
            if !use_stdout {
                println!(
                    "Conversion completed: {} -> {} ({})",
                    input_path, output_path, format
                );
            }
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <input.xlsx> <output> [options]", program);
    eprintln!("       {} <input.xlsx> --list", program);
    eprintln!("\nOptions:");
    eprintln!("  --sheet <name>     Convert a single sheet (default: whole workbook)");
    eprintln!("  --format <fmt>     markdown | csv | json | html (default: from output extension)");
    eprintln!("\nExamples:");
    eprintln!("  {} input.xlsx output.md", program);
    eprintln!("  {} input.xlsx output.json --sheet \"Sheet1\"", program);
    eprintln!("  {} input.xlsx - --format csv", program);
    eprintln!("  {} input.xlsx --list", program);
}

fn convert(
    input_path: &str,
    output_path: &str,
    sheet_selector: SheetSelector,
    format: OutputFormat,
    use_stdout: bool,
) -> Result<(), ConvertError> {
    let converter = ConverterBuilder::new()
        .with_sheet_selector(sheet_selector)
        .with_output_format(format)
        .build()?;

    // The output file is only created once the conversion has succeeded
    let document = converter.convert_path(input_path)?;

    if use_stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", document)?;
        handle.flush()?;
    } else {
        let mut output = File::create(output_path)?;
        output.write_all(document.as_bytes())?;
    }

    Ok(())
}

fn handle_error(error: ConvertError) {
    match error {
        ConvertError::NotFound { path, source } => {
            eprintln!("File Not Found: {}: {}", path.display(), source);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        ConvertError::InvalidFormat(sheet) => {
            eprintln!("Unknown Sheet: '{}'", sheet);
            eprintln!("Use --list to see the sheets in the workbook.");
        }
        ConvertError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid spreadsheet or may be corrupted.");
        }
        ConvertError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
        }
        ConvertError::Json(json_err) => {
            eprintln!("JSON Error: {}", json_err);
        }
        ConvertError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
        ConvertError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates security constraints (e.g., file size limit).");
        }
    }
}
