use clap::Parser;
use flipflop_strategy::{chain_from_json, Request};
use serde_json::Value;
use tracing::Level;

/// Evaluate a feature against a strategy chain and a described request.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Feature to evaluate
    feature: String,
    /// Strategy configuration: JSON array of {"type": ..., "options": {...}}
    #[arg(long)]
    config: String,
    /// Query parameter on the request (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_pair)]
    params: Vec<(String, String)>,
    /// Cookie on the request (repeatable)
    #[arg(long = "cookie", value_name = "KEY=VALUE", value_parser = parse_pair)]
    cookies: Vec<(String, String)>,
    /// Log strategy decisions to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    // Parse strategy configuration.
    let doc: Value = match serde_json::from_str(&args.config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid JSON: {e}");
            std::process::exit(1);
        }
    };
    let chain = match chain_from_json(&doc) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Describe the request.
    let mut request = Request::new("GET", "/");
    request.params.extend(args.params);
    request.cookies.extend(args.cookies);

    // Evaluate and print true, false or null.
    match chain.enabled(&args.feature, request) {
        Ok(state) => println!("{}", Value::from(state)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
