//! CLI: run a small demo graph, or print the built-in node catalogue.
//!
//! The demo graph runs a `For` loop driving a persistent counter from an entry
//! pulse, then spawns an interval loop for a bounded time and cancels it.
//!
//! Usage: `pulse_demo [OPTIONS]`
//! Example: pulse_demo --count 5 --interval-ms 20 --run-ms 200 --report pulses.jsonl
//!
//! Set RUST_LOG=pulsegraph=trace for TRACE-level span enter/exit and events.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pulsegraph::nodes::{ConstantNode, CounterIncrementNode, LogNode, LogSink};
use pulsegraph::report_io::{append_reports, save_reports};
use pulsegraph::{Graph, GraphBuilder, NodeRegistry, RuntimeConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Run the pulsegraph demo graph.
#[derive(Parser, Debug)]
#[command(name = "pulse_demo")]
#[command(after_help = r#"Environment variables:
  PULSEGRAPH_DEMO_COUNT          Loop count (overrides the default of --count).
  PULSEGRAPH_MAX_FLOW_DEPTH      Maximum flow nesting per pulse.
  PULSEGRAPH_RECORD_ACTIVATIONS  Record activated nodes in pulse reports (true/false).

Examples:
  pulse_demo --catalogue
  pulse_demo --count 5 --interval-ms 20 --run-ms 200 --report pulses.jsonl"#)]
struct Args {
  /// Print the node catalogue as JSON and exit.
  #[arg(long)]
  catalogue: bool,

  /// Iterations of the For loop.
  #[arg(long, env = "PULSEGRAPH_DEMO_COUNT", default_value_t = 3)]
  count: i32,

  /// Period of the interval loop in milliseconds.
  #[arg(long, value_name = "MS", default_value_t = 50)]
  interval_ms: i32,

  /// How long the interval loop runs before it is cancelled.
  #[arg(long, value_name = "MS", default_value_t = 200)]
  run_ms: u64,

  /// Write the pulse reports to this JSON Lines file.
  #[arg(long, value_name = "FILE")]
  report: Option<PathBuf>,

  /// Append to the report file instead of replacing it.
  #[arg(long, requires = "report")]
  append: bool,
}

fn build_demo(args: &Args, log: LogSink<i32>) -> Result<Arc<Graph>, pulsegraph::GraphError> {
  let registry = NodeRegistry::builtin();
  GraphBuilder::new("demo")
    .config(RuntimeConfig::from_env())
    .add_registered(registry, "start", "On Trigger", None)
    .add_node("count", ConstantNode::new(args.count))
    .add_registered(registry, "loop", "For", None)
    .add_registered(registry, "counter", "Counter Increment", None)
    .add_node("log", LogNode::<i32>::with_sink(log))
    .add_node("interval", ConstantNode::new(args.interval_ms))
    .add_registered(registry, "ticker", "Fire On Interval", None)
    .add_registered(registry, "ticks", "Counter Increment", None)
    .connect_value("count", "Value", "loop", "Count")
    .connect_value("counter", "Count", "log", "Value")
    .connect_value("interval", "Value", "ticker", "Interval")
    .connect_flow("start", "Next", "loop")
    .connect_flow("loop", "Loop", "counter")
    .connect_flow("counter", "Next", "log")
    .connect_flow("ticker", "On Fire", "ticks")
    .build()
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  info!(?args, "pulse_demo starting");

  if args.catalogue {
    match serde_json::to_string_pretty(&NodeRegistry::builtin().catalogue()) {
      Ok(json) => println!("{}", json),
      Err(e) => {
        eprintln!("Error serializing catalogue: {}", e);
        process::exit(1);
      }
    }
    return;
  }

  let log = LogSink::default();
  let graph = match build_demo(&args, log.clone()) {
    Ok(g) => g,
    Err(e) => {
      eprintln!("Graph error: {}", e);
      process::exit(1);
    }
  };

  let mut reports = Vec::new();
  match graph.trigger_named("start").await {
    Ok(report) => reports.push(report),
    Err(e) => {
      eprintln!("Pulse error: {}", e);
      process::exit(1);
    }
  }

  let Some(ticker) = graph.node_id("ticker") else {
    eprintln!("Graph error: ticker node missing");
    process::exit(1);
  };
  let handle = graph.spawn(ticker);
  tokio::select! {
    _ = tokio::time::sleep(Duration::from_millis(args.run_ms)) => {}
    _ = tokio::signal::ctrl_c() => info!("interrupted"),
  }
  handle.cancel();
  match handle.join().await {
    Ok(report) => reports.push(report),
    Err(e) => {
      eprintln!("Pulse error: {}", e);
      process::exit(1);
    }
  }

  let counter = graph
    .node_named::<CounterIncrementNode>("counter")
    .map(CounterIncrementNode::count)
    .unwrap_or_default();
  let ticks = graph
    .node_named::<CounterIncrementNode>("ticks")
    .map(CounterIncrementNode::count)
    .unwrap_or_default();

  println!("Demo completed.");
  println!("  Loop values: {:?}", log.entries());
  println!("  Counter: {}", counter);
  println!("  Interval ticks: {}", ticks);
  println!("  Pulses: {}", reports.len());

  if let Some(path) = &args.report {
    let written = if args.append {
      append_reports(path, &reports)
    } else {
      save_reports(path, &reports)
    };
    if let Err(e) = written {
      eprintln!("Error writing {}: {}", path.display(), e);
      process::exit(1);
    }
    println!("  Reports: {}", path.display());
  }
}
