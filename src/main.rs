use clap::Parser;
use rexy::cli::commands::{cmd_fill, cmd_markup, cmd_scan};
use rexy::cli::config::{Cli, Commands, load_config, resolve_strategy};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());
    let endpoint = cli.endpoint.as_deref();

    match cli.command {
        Commands::Scan {
            page,
            strategy,
            format,
        } => {
            let strategy = resolve_strategy(strategy.as_deref(), &config);
            cmd_scan(&page, strategy, &format, &config, endpoint)?;
        }
        Commands::Fill {
            page,
            strategy,
            fields,
            delay_ms,
            output,
        } => {
            let strategy = resolve_strategy(strategy.as_deref(), &config);
            cmd_fill(
                &page,
                strategy,
                &fields,
                delay_ms,
                output.as_deref(),
                &config,
                endpoint,
            )?;
        }
        Commands::Markup { page, output } => {
            cmd_markup(&page, output.as_deref(), &config)?;
        }
    }

    Ok(())
}
