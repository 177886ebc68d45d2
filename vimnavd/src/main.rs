//! # vimnav Host Daemon
//!
//! Main entry point for the scripted vimnav host.

use std::env;
use std::fs;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vimnavd::{HostRuntime, HostRuntimeConfig};

fn main() {
    // Logs go to stderr so the trace on stdout stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("vimnavd");

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    runtime.run();
    println!();
    println!("{}", runtime.render_summary());
}

fn read_file(path: &str, what: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {} file {}: {}", what, path, e))
}

fn parse_args(args: &[String]) -> Result<HostRuntimeConfig, String> {
    let mut config = HostRuntimeConfig {
        echo: true,
        ..HostRuntimeConfig::default()
    };
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--page" | "-p" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --page".to_string());
                }
                config.page = Some(read_file(&args[i], "page")?);
            }
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                config.script = Some(read_file(&args[i], "script")?);
            }
            "--settings" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --settings".to_string());
                }
                config.settings = Some(read_file(&args[i], "settings")?);
            }
            "--key-interval" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --key-interval".to_string());
                }
                config.key_interval_ms = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid key-interval value: {}", args[i]))?;
            }
            "--max-steps" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --max-steps".to_string());
                }
                config.max_steps = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid max-steps value: {}", args[i]))?;
            }
            "--quiet" | "-q" => {
                config.echo = false;
            }
            "--help" | "-h" => {
                print_usage(args.first().map(String::as_str).unwrap_or("vimnavd"));
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    if config.script.is_none() {
        return Err("Missing --script".to_string());
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} --script <FILE> [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --page <FILE>        Page fixture (JSON); empty page if omitted");
    eprintln!("  -s, --script <FILE>      Key script");
    eprintln!("  --settings <FILE>        Settings file (versioned JSON)");
    eprintln!("  --key-interval <MS>      Simulated time between key presses (default 50)");
    eprintln!("  --max-steps <N>          Maximum steps to run (0 = unlimited)");
    eprintln!("  -q, --quiet              Only print the final page state");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Logging is controlled with RUST_LOG (default: info).");
    eprintln!();
    eprintln!("Examples:");
    eprintln!(
        "  {} --page demos/article.json --script demos/follow_link.vnkeys",
        program
    );
    eprintln!(
        "  RUST_LOG=debug {} -p demos/article.json -s demos/scroll_and_cancel.vnkeys",
        program
    );
}
