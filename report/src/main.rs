use std::path::PathBuf;
use std::thread;

use report::{input, local_group, report_results, ReportConfig, ReportFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn print_usage() {
    eprintln!("Usage: hpcg-report --input <run.json> [OPTIONS]");
    eprintln!();
    eprintln!("  --input <path>     Recorded run: geometry, matrix totals, per-rank timings");
    eprintln!("  --format <name>    Output format: yaml, json (default: yaml)");
    eprintln!("  --echo             Echo the report from inside the reporting call");
    eprintln!("  --help             Show this help");
}

fn main() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("off")),
                ),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut config = ReportConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                if i < args.len() { input_path = Some(PathBuf::from(&args[i])); }
            }
            "--format" => {
                i += 1;
                config.format = match args.get(i).map(String::as_str) {
                    Some("yaml") => ReportFormat::Yaml,
                    Some("json") => ReportFormat::Json,
                    other => {
                        eprintln!("Unknown format: {}", other.unwrap_or(""));
                        print_usage();
                        std::process::exit(1);
                    }
                };
            }
            "--echo" => config.echo = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown flag: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(input_path) = input_path else {
        print_usage();
        std::process::exit(1);
    };

    let run = match input::load(&input_path) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Failed to load run: {:?}", e);
            std::process::exit(1);
        }
    };

    // One thread per recorded rank, all joining the same collective.
    let group = local_group(run.process_count());
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = group
            .iter()
            .zip(&run.timings)
            .enumerate()
            .map(|(rank, (comm, times))| {
                let ctx = run.context_for(rank);
                let config = &config;
                let run = &run;
                scope.spawn(move || {
                    report_results(comm, &ctx, &run.matrix, run.niters, run.normr, times, config)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    let mut failed = false;
    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(Ok(Some(text))) if !config.echo => print!("{}", text),
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                eprintln!("Rank {} failed: {:?}", rank, e);
                failed = true;
            }
            Err(_) => {
                eprintln!("Rank {} panicked", rank);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
