//! Command-line interface for textfx
//! Inspects effect-tag markup: strips tags, lists parsed spans and samples the default wave.
//!
//! Usage:
//!   textfx strip `<path>` [--config `<file>`]                     - Print the display text
//!   textfx spans `<path>` [--config `<file>`] [--format `<format>`] - List the parsed tag spans
//!   textfx tags [--config `<file>`]                               - List the configured tags
//!   textfx wave [--config `<file>`] [--duration `<s>`] [--step `<s>`] - Sample the default wave

use clap::{Arg, Command};
use std::fs;
use textfx::textfx::config::{Loader, TextFxConfig};
use textfx::textfx::pipeline::EffectPipeline;
use textfx::textfx::registry::StaticRegistry;
use textfx::textfx::tags::TagPrefix;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("TOML file layered over the built-in defaults")
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the marked-up text file")
        .required(true)
        .index(1)
}

fn main() {
    let matches = Command::new("textfx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting effect-tag markup")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("strip")
                .about("Print the display text with tags removed")
                .arg(path_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("spans")
                .about("List the tag spans of a document")
                .arg(path_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('text' or 'json')")
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("tags")
                .about("List the configured tags")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("wave")
                .about("Sample the configured default wave")
                .arg(config_arg())
                .arg(
                    Arg::new("duration")
                        .long("duration")
                        .help("Seconds to sample")
                        .value_parser(clap::value_parser!(f32))
                        .default_value("2"),
                )
                .arg(
                    Arg::new("step")
                        .long("step")
                        .help("Seconds between samples")
                        .value_parser(clap::value_parser!(f32))
                        .default_value("0.1"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("strip", strip_matches)) => {
            let config = load_config(strip_matches.get_one::<String>("config"));
            let path = strip_matches.get_one::<String>("path").unwrap();
            handle_strip_command(&config, path);
        }
        Some(("spans", spans_matches)) => {
            let config = load_config(spans_matches.get_one::<String>("config"));
            let path = spans_matches.get_one::<String>("path").unwrap();
            let format = spans_matches.get_one::<String>("format").unwrap();
            handle_spans_command(&config, path, format);
        }
        Some(("tags", tags_matches)) => {
            let config = load_config(tags_matches.get_one::<String>("config"));
            handle_tags_command(&config);
        }
        Some(("wave", wave_matches)) => {
            let config = load_config(wave_matches.get_one::<String>("config"));
            let duration = *wave_matches.get_one::<f32>("duration").unwrap();
            let step = *wave_matches.get_one::<f32>("step").unwrap();
            handle_wave_command(&config, duration, step);
        }
        _ => unreachable!(),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn load_config(path: Option<&String>) -> TextFxConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader.build().unwrap_or_else(|e| fail(e))
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(format!("cannot read {}: {}", path, e)))
}

fn pipeline(config: &TextFxConfig) -> EffectPipeline<StaticRegistry> {
    EffectPipeline::from_config(config).unwrap_or_else(|e| fail(e))
}

/// Handle the strip command
fn handle_strip_command(config: &TextFxConfig, path: &str) {
    let source = read_source(path);
    let document = pipeline(config).set_text(&source);
    println!("{}", document.text);
}

/// Handle the spans command
fn handle_spans_command(config: &TextFxConfig, path: &str, format: &str) {
    let source = read_source(path);
    let document = pipeline(config).set_text(&source);
    match format {
        "text" => {
            for span in &document.spans {
                println!("{}", span);
            }
        }
        "json" => {
            let output = serde_json::json!({
                "text": document.text,
                "spans": document.spans,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => fail(e),
            }
        }
        other => fail(format!("unknown format '{}' (expected 'text' or 'json')", other)),
    }
}

/// Handle the tags command
fn handle_tags_command(config: &TextFxConfig) {
    let registry = config.registry().unwrap_or_else(|e| fail(e));
    for (prefix, name, spec) in registry.tags() {
        let params: Vec<String> = spec
            .params
            .iter()
            .map(|(key, kind)| {
                let required = if spec.required.contains(key) { "!" } else { "" };
                let key = if key.is_empty() { "=" } else { key.as_str() };
                format!("{}{}:{}", key, required, kind.name())
            })
            .collect();
        println!(
            "{:<10} {}{} ({:?}) {}",
            prefix.family_name(),
            prefix,
            name,
            spec.tag_type,
            params.join(" ")
        );
    }
    for prefix in TagPrefix::ALL {
        if registry.is_open(prefix) {
            println!("{:<10} {}* (open family)", prefix.family_name(), prefix);
        }
    }
}

/// Handle the wave command
fn handle_wave_command(config: &TextFxConfig, duration: f32, step: f32) {
    if step.is_nan() || step <= 0.0 || !duration.is_finite() {
        fail("--step must be positive and --duration finite");
    }
    let wave = config.base_wave().unwrap_or_else(|e| fail(e));
    let mut time = 0.0f32;
    while time <= duration {
        let (value, direction) = wave.evaluate(time, 0.0);
        println!("{:>7.3} {:>8.4} {:>2}", time, value, direction);
        time += step;
    }
}
