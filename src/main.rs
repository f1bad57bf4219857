use clap::Parser;
use tracing::{error, info};

use grid_smoke::{smoke, Browser, SmokeConfig};

#[derive(Parser)]
#[command(name = "grid-smoke")]
#[command(about = "Run a scripted browser smoke test against a remote WebDriver hub")]
struct Cli {
    /// Browser to run the test in
    #[arg(value_enum, default_value_t = Browser::Chrome)]
    browser: Browser,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let mut config = match SmokeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };
    config.browser = cli.browser;

    info!(browser = %config.browser, "will use browser");
    info!(
        browser = %config.browser,
        sleep_secs = config.step_sleep.as_secs_f64(),
        "will sleep between test steps"
    );

    if let Err(err) = smoke::run(&config).await {
        error!(browser = %config.browser, error = %err, "smoke test failed");
        std::process::exit(1);
    }

    println!("{} | All done. SUCCESS!", config.browser);
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_smoke=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
