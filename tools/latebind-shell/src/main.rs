// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! latebind-shell - command-line host for latebind objects
//!
//! Plays the part of a scripting host: every command reaches the object by
//! name, with its arguments as untyped text.
//!
//! # Usage
//!
//! ```bash
//! # Member ids of some names
//! latebind-shell hash open send readyState
//!
//! # Run a script against a fresh request (stdin when no file is given)
//! latebind-shell run demo.lbs --transport echo
//!
//! # Same, with a YAML runtime config and JSON output
//! latebind-shell run demo.lbs --config latebind.yaml --json
//!
//! # Registered classes and their members
//! latebind-shell classes
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use latebind::dispatch::{list_classes, member_id};
use latebind::script::{Interpreter, Step};
use latebind::xhr::{EchoTransport, NullTransport, RequestFactory, Transport};
use latebind::{Dispatch, RuntimeConfig, Variant};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// latebind command-line host
#[derive(Parser, Debug)]
#[command(name = "latebind-shell")]
#[command(about = "Drive late-bound objects with untyped text commands")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the member id of each name
    Hash {
        /// Member names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Run a command script against a new request
    Run {
        /// Script file (reads stdin when omitted)
        #[arg(value_name = "FILE")]
        script: Option<PathBuf>,

        /// YAML runtime configuration
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Transport executing `send`
        #[arg(short, long, value_enum, default_value = "echo")]
        transport: TransportKind,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered classes and their members
    Classes,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TransportKind {
    /// Complete immediately with no response
    Null,
    /// Answer with the request's own headers and parameters
    Echo,
}

impl TransportKind {
    fn build(self) -> Arc<dyn Transport> {
        match self {
            Self::Null => Arc::new(NullTransport),
            Self::Echo => Arc::new(EchoTransport),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash { names } => cmd_hash(&names),
        Commands::Run {
            script,
            config,
            transport,
            json,
        } => cmd_run(script.as_deref(), config.as_deref(), transport, json)?,
        Commands::Classes => cmd_classes(),
    }

    Ok(())
}

fn cmd_hash(names: &[String]) {
    for name in names {
        println!("{:<32} {}", name, member_id(name));
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    let Some(path) = path else {
        return Ok(RuntimeConfig::default());
    };
    let config = RuntimeConfig::load_from_file(path)
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!("using config {}: {:?}", path.display(), config);
    Ok(config)
}

fn read_script(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("reading script from stdin")?;
            Ok(source)
        }
    }
}

fn cmd_run(
    script: Option<&Path>,
    config: Option<&Path>,
    transport: TransportKind,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let source = read_script(script)?;

    let factory = RequestFactory::new(transport.build(), config);
    let Variant::Object(request) = factory.construct(&mut [])? else {
        anyhow::bail!("factory did not return an object");
    };

    let interpreter = Interpreter::new(&*request);
    let steps = interpreter.run(&source)?;

    if json {
        let rendered: Vec<serde_json::Value> = steps.iter().map(step_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for step in &steps {
            if step.result.is_empty() {
                println!("[OK] {:>3}: {}", step.line, step.command);
            } else {
                println!("[OK] {:>3}: {} -> {}", step.line, step.command, step.result);
            }
        }
        println!();
        println!("readyState = {}", request.get("readyState")?);
    }

    log::debug!("pool: {:?}", factory.pool_stats());
    Ok(())
}

fn step_to_json(step: &Step) -> serde_json::Value {
    serde_json::json!({
        "line": step.line,
        "command": step.command.to_string(),
        "result": variant_to_json(&step.result),
    })
}

fn variant_to_json(value: &Variant) -> serde_json::Value {
    match value {
        Variant::Empty => serde_json::Value::Null,
        Variant::Bool(b) => serde_json::Value::from(*b),
        Variant::Int(n) => serde_json::Value::from(*n),
        Variant::Float(f) => serde_json::Value::from(*f),
        Variant::Text(s) => serde_json::Value::from(s.as_str()),
        Variant::Object(_) => serde_json::Value::from("[object]"),
    }
}

fn cmd_classes() {
    // Building a factory and one request publishes both classes.
    let factory = RequestFactory::with_defaults();
    drop(factory.create());

    for class in list_classes() {
        println!("{} ({} members)", class.name, class.members.len());
        for member in &class.members {
            println!("  {:<28} {}", member, member_id(member));
        }
    }
}
