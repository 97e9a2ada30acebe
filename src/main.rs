use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcstress::{
    BenchmarkRegistry, BenchmarkRunner, HarnessConfig, MemoryManager, RecordingHeap, SystemHeap,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(
    name = "gcstress",
    about = "Allocation-pattern stress harness for memory managers"
)]
struct Cli {
    /// Run the timed top-down vs bottom-up tree construction sweep.
    #[arg(long)]
    timed_depth_sweep: bool,
    /// Request collections and log heap counters between tree phases.
    #[arg(long)]
    diagnostics: bool,
    /// Memory manager to drive.
    #[arg(long, value_enum, default_value_t = Backend::System)]
    backend: Backend,
    /// Run only the named benchmark (repeatable). Registry order is kept.
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,
    /// List the registered benchmarks and exit.
    #[arg(long)]
    list: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Backend {
    /// Real values on the process heap.
    System,
    /// Count and fingerprint requests without allocating.
    Recording,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = HarnessConfig::default()
        .with_timed_depth_sweep(cli.timed_depth_sweep)
        .with_diagnostics(cli.diagnostics);

    let mut registry =
        BenchmarkRegistry::standard(&config).context("failed to build benchmark registry")?;
    if !cli.only.is_empty() {
        registry
            .retain_named(cli.only.as_slice())
            .context("failed to select benchmarks")?;
    }

    if cli.list {
        for info in registry.list() {
            println!("{}", info);
        }
        return Ok(());
    }

    match cli.backend {
        Backend::System => run(registry, SystemHeap::new()).map(drop),
        Backend::Recording => {
            let heap = run(registry, RecordingHeap::new())?;
            println!("fingerprint {}", heap.fingerprint().to_hex());
            Ok(())
        }
    }
}

fn run<M: MemoryManager>(registry: BenchmarkRegistry, heap: M) -> Result<M> {
    let mut runner = BenchmarkRunner::new(registry, heap);
    runner.run_all().context("benchmark run aborted")?;
    Ok(runner.into_heap())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
