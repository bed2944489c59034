use std::env::var;

use tracing::info;
use tracing_subscriber::EnvFilter;

use wgtpack::Cli;

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`/`-q` when set.
pub fn init(cli: &Cli) {
    let filter = if var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(cli.log_level())
    };

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        Ok(_) => info!("logging initialised"),
        Err(e) => eprintln!("Failed to initialise logging, continuing with none\n{e}"),
    }
}
