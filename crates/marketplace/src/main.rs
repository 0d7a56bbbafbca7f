use ashmart::{Marketplace, MarketplaceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = r#"Ashmart - coal ash marketplace engine

USAGE:
    ashmart [OPTIONS]

OPTIONS:
    -c, --config <PATH>   Load configuration and seed data from a JSON file
        --check           Validate the configuration and seed data, then exit
    -h, --help            Print this help message

ENVIRONMENT VARIABLES:
    HOST                  Listen address (default: 0.0.0.0)
    PORT                  Listen port (default: 8080)
    RUST_LOG              Log level filter (default: ashmart=info,tower_http=debug)

Every /api request must carry X-User-Id and X-User-Role headers, set by
the authentication proxy in front of the engine.

EXAMPLES:
    ashmart --config marketplace.json
    ashmart --config marketplace.json --check
    PORT=9000 ashmart
"#;

#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<String>,
    check_only: bool,
}

impl CliArgs {
    /// `Ok(None)` means help was requested
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>, String> {
        let mut parsed = CliArgs::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Ok(None),
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| "--config requires a path argument".to_string())?;
                    parsed.config_path = Some(path);
                }
                "--check" => parsed.check_only = true,
                other => return Err(format!("Unknown argument: {}", other)),
            }
        }
        Ok(Some(parsed))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ashmart=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            eprint!("{}", USAGE);
            return Ok(());
        }
        Err(message) => {
            eprintln!("Error: {}\n", message);
            eprint!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let mut config = match &cli.config_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading configuration");
            MarketplaceConfig::from_file(path)?
        }
        None => {
            tracing::info!("No --config given, starting empty with defaults");
            MarketplaceConfig::default()
        }
    };

    if let Ok(host) = std::env::var("HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| format!("PORT must be a port number, got '{}'", port))?;
    }

    tracing::info!(
        name = %config.name,
        users = config.users.len(),
        products = config.products.len(),
        demands = config.demands.len(),
        confirmed_cancellation = ?config.engine.confirmed_cancellation,
        "Configuration ready"
    );

    let marketplace = Marketplace::from_config(config).await?;

    if cli.check_only {
        tracing::info!("Configuration and seed data are valid");
        return Ok(());
    }

    tracing::info!(
        "REST API: http://{}:{}/api/",
        marketplace.config.server.host,
        marketplace.config.server.port
    );
    tracing::info!("  catalog:   /api/products, /api/demands");
    tracing::info!("  orders:    /api/orders, /api/orders/{{id}}/status");
    tracing::info!("  matching:  /api/matching/suggestions");
    tracing::info!("  analytics: /api/analytics/dashboard");

    marketplace.run().await
}
