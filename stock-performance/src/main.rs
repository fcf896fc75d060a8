use stock_performance::{
    config::Config,
    error::PerformanceError,
    logging::init_logging_from_env,
    query::queries,
    scenario::run_all,
};
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/self_test.json");

/// `stock-performance [CONFIG_PATH]` runs every self-test scenario of the config.
///
/// `stock-performance queries` prints the bundled SQL queries.
fn main() -> Result<(), PerformanceError> {
    init_logging_from_env();

    let argument = std::env::args().nth(1);

    if argument.as_deref() == Some("queries") {
        for query in queries()? {
            println!("{query}\n");
        }
        return Ok(());
    }

    let path = argument.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&path).inspect_err(|error| {
        error!(%path, %error, "failed to load config");
    })?;

    let reports = run_all(&config);
    for report in &reports {
        report.print();
    }

    info!(
        scenarios = reports.len(),
        passed = reports.iter().filter(|report| report.passed()).count(),
        "finished self-test scenarios"
    );

    Ok(())
}
