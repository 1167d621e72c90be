use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use scholarscope_core::{
    ConfigLoader, EventCollector, Provenance, ResearchEvent, ResearchOrchestrator, ResearchOutcome,
    SUGGESTED_TOPICS, SearchResults, TelemetryOptions, init_telemetry,
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "scholarscope",
    version,
    about = "Aggregate papers, patents, news and trends for a research topic"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Research a topic and print the aggregated results.
    Research(ResearchArgs),
    /// List example topics.
    Topics,
}

#[derive(Args, Debug)]
struct ResearchArgs {
    /// Topic to research.
    #[arg(long)]
    query: String,

    /// Configuration file (defaults to `SCHOLARSCOPE_CONFIG` or `scholarscope.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Skip live providers and use placeholder data only (no credentials needed).
    #[arg(long)]
    offline: bool,

    /// Print per-section progress to stderr.
    #[arg(long)]
    progress: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Topics => {
            for topic in SUGGESTED_TOPICS {
                println!("{topic}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Research(args) => {
            let rt = Runtime::new()?;
            rt.block_on(research_command(args))
        }
    }
}

async fn research_command(args: ResearchArgs) -> Result<ExitCode> {
    let config = ConfigLoader::load(args.config.clone())?;
    init_telemetry(TelemetryOptions {
        env_filter: Some(config.logging.level.clone()),
        ..TelemetryOptions::default()
    })?;

    let mut orchestrator = if args.offline {
        info!("offline mode: every section uses placeholder data");
        ResearchOrchestrator::builder()
            .snapshot_chars(config.summary.snapshot_chars)
            .build()
    } else {
        ResearchOrchestrator::from_config(&config)?
    };

    let printer = if args.progress {
        let (collector, receiver) = EventCollector::new();
        orchestrator = orchestrator.with_events(collector);
        Some(tokio::spawn(print_progress(receiver)))
    } else {
        None
    };

    info!(query = %args.query, "starting research");
    let (outcome, provenance) = match args.format {
        Format::Json => (orchestrator.perform_research(&args.query).await, None),
        Format::Text => match orchestrator.research(&args.query).await {
            Ok(run) => (
                ResearchOutcome::Success { data: run.results },
                Some(run.provenance),
            ),
            Err(err) => (
                ResearchOutcome::Error {
                    message: err.to_string(),
                },
                None,
            ),
        },
    };

    // Closes the progress channel so the printer can finish.
    drop(orchestrator);
    if let Some(printer) = printer {
        printer.await?;
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        Format::Text => match outcome.results() {
            Some(results) => print!("{}", render_report(results, provenance.as_ref())),
            None => eprintln!("research failed: {}", outcome.message().unwrap_or_default()),
        },
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn print_progress(mut receiver: UnboundedReceiver<ResearchEvent>) {
    while let Some(event) = receiver.recv().await {
        match event {
            ResearchEvent::Started { section, .. } => {
                eprintln!("[{}] started", section.as_str());
            }
            ResearchEvent::Finished {
                section,
                origin,
                items,
                duration_ms,
                ..
            } => {
                eprintln!(
                    "[{}] {items} item(s) from {origin} in {duration_ms} ms",
                    section.as_str()
                );
            }
            ResearchEvent::Completed { search_time, .. } => {
                eprintln!("[done] {search_time:.2}s");
            }
        }
    }
}

fn render_report(results: &SearchResults, provenance: Option<&Provenance>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Research: {}", results.query);
    let _ = writeln!(
        out,
        "{} results in {:.2}s\n",
        results.total_results(),
        results.search_time
    );

    let summary = &results.summary;
    let _ = writeln!(out, "Overview\n  {}\n", summary.overview);
    write_list(&mut out, "Key findings", &summary.key_findings);
    write_list(&mut out, "Future directions", &summary.future_directions);
    let _ = writeln!(
        out,
        "Related fields: {}\n",
        summary.related_fields.join(", ")
    );

    let _ = writeln!(out, "Papers");
    for (index, paper) in results.papers.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} ({}, {}; {} citations)",
            index + 1,
            paper.title,
            paper.journal,
            paper.publication_date,
            paper.citation_count
        );
        let _ = writeln!(out, "     {}", paper.authors.join(", "));
    }

    let _ = writeln!(out, "\nPatents");
    for (index, patent) in results.patents.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} [{}] {}, {}",
            index + 1,
            patent.title,
            patent.patent_number,
            patent.assignee,
            patent.publication_date
        );
    }

    let _ = writeln!(out, "\nNews");
    for (index, item) in results.news.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} ({}, {})",
            index + 1,
            item.title,
            item.source,
            item.published_date
        );
    }

    let _ = writeln!(out, "\nInterest trend");
    for point in &results.trends {
        let bar = "#".repeat((point.interest / 5) as usize);
        let _ = writeln!(out, "  {} {:>3} {bar}", point.date, point.interest);
    }

    if let Some(provenance) = provenance {
        let _ = writeln!(
            out,
            "\nSources: papers={} patents={} news={} trends={} summary={}",
            provenance.papers,
            provenance.patents,
            provenance.news,
            provenance.trends,
            provenance.summary
        );
    }
    out
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(out, "{heading}");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
    out.push('\n');
}
