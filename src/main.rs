//! Orgsize - npm organization package size reporter
//!
//! A CLI tool that lists every package published under an npm
//! organization, fetches each package's unpacked size concurrently, and
//! writes a sorted report as a console table and a CSV file.
//!
//! Exit codes:
//!   0 - Success (including runs where individual package fetches failed)
//!   1 - Missing organization argument or unresolvable registry token

mod aggregate;
mod cli;
mod credentials;
mod models;
mod registry;
mod report;

use anyhow::Result;
use cli::Args;
use registry::RegistryClient;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    init_logging(&args);

    info!("Orgsize v{}", env!("CARGO_PKG_VERSION"));
    debug!("Organization: {}", args.org_name());

    // Fatal setup phase: without a token there is nothing to do, and no
    // network request has been made yet.
    let token = match credentials::resolve_token(&args.registry, args.token.as_deref()) {
        Ok(token) => token,
        Err(e) => {
            error!("Credential resolution failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    // Everything past setup is best-effort. A failure here is logged
    // once at this outermost boundary and the process still exits 0;
    // per-package failures were already absorbed further down.
    if let Err(e) = run_report(&args, &token).await {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
    }
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete reporting pipeline:
/// list → fan-out fetch → filter → sort → write/print.
async fn run_report(args: &Args, token: &str) -> Result<()> {
    let start_time = Instant::now();
    let org = args.org_name();

    let client = RegistryClient::new(&args.registry, token)?;

    // Step 1: List the organization's packages
    println!("📦 Listing packages for organization: {}", org);
    let packages = client.list_org_packages(org).await;

    if packages.is_empty() {
        println!("   No packages found.");
    } else {
        println!("   Found {} packages", packages.len());
    }

    // Step 2: Fetch per-package sizes concurrently
    println!("\n🔎 Fetching package sizes...");
    let progress = aggregate::fetch_progress_bar(packages.len() as u64, !args.quiet);
    let sizes =
        aggregate::collect_package_sizes(&client, &packages, args.concurrency_limit(), &progress)
            .await;
    progress.finish_and_clear();

    // Step 3: Write the CSV and print the table
    report::write_csv(&sizes, &args.output)?;
    println!("{}", report::render_table(&sizes));

    let skipped = packages.len() - sizes.len();
    println!("\n📊 Report Summary:");
    println!("   Packages reported: {}", sizes.len());
    if skipped > 0 {
        println!("   Packages skipped: {}", skipped);
    }
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    println!("\n✅ Report saved to: {}", args.output.display());

    Ok(())
}
