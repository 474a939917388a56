//! Padterm Headless Runner
//!
//! Feeds a recorded child-output stream through the terminal engine and
//! prints the resulting snapshot, plus anything the terminal replied.
//! Reads input from stdin or a file.

use std::io::{self, Read};
use std::process::ExitCode;

use padterm::error::escape_for_log;
use padterm::{RecordingHost, TermConfig, Terminal};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = TermConfig::load_or_default();
    let mut input_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;
    let mut chunk_size = 0usize;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--cols" => {
                i += 1;
                if i < args.len() {
                    config.cols = args[i].parse().unwrap_or(80);
                }
            },
            "-r" | "--rows" => {
                i += 1;
                if i < args.len() {
                    config.rows = args[i].parse().unwrap_or(24);
                }
            },
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "--chunk" => {
                i += 1;
                if i < args.len() {
                    chunk_size = args[i].parse().unwrap_or(0);
                }
            },
            "--no-wrap" => {
                config.autowrap = false;
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let input_data = match &input_file {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    let (rows, cols) = (config.rows, config.cols);
    let mut terminal = Terminal::new(config);
    let mut host = RecordingHost::new();

    // Chunk size 0 feeds everything at once
    if chunk_size == 0 {
        terminal.process(&input_data, &mut host);
    } else {
        for chunk in input_data.chunks(chunk_size) {
            terminal.process(chunk, &mut host);
        }
    }

    let snapshot = terminal.snapshot();
    match output_format {
        OutputFormat::Text => {
            println!("Terminal State ({}x{}):", cols, rows);
            println!("Cursor: ({}, {})", snapshot.cursor.row, snapshot.cursor.col);
            println!(
                "Margins: {}..={}  History: {} lines",
                snapshot.top_margin, snapshot.bottom_margin, snapshot.history_len
            );
            println!("---");
            print!("{}", snapshot.to_text());
            println!("---");
            if !host.sent.is_empty() {
                println!("Replies: {}", escape_for_log(&host.sent));
            }
            for err in &host.errors {
                println!("Error: {}", err);
            }
        },
        OutputFormat::Json => match snapshot.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("Padterm Headless Runner");
    println!();
    println!("Usage: padterm-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --cols <N>     Set terminal width (default: 80)");
    println!("  -r, --rows <N>     Set terminal height (default: 24)");
    println!("  -f, --file <PATH>  Read input from file");
    println!("      --chunk <N>    Feed input in chunks of N bytes (default: all at once)");
    println!("      --no-wrap      Start with autowrap off");
    println!("  -j, --json         Output snapshot as JSON");
    println!("  -t, --text         Output snapshot as text (default)");
    println!("  -h, --help         Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!("Defaults come from ~/.config/padterm/config.json when present.");
    println!();
    println!("Examples:");
    println!("  printf 'Hello\\033[31mWorld\\033[0m' | padterm-headless");
    println!("  padterm-headless -c 132 -r 24 --chunk 1 session.bin");
    println!("  padterm-headless --json < session.bin > snapshot.json");
}
