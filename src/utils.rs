//! Utils
//!
//! Command-line arguments and logging setup shared by the demos.

use std::path::PathBuf;

use clap::{Args, Parser};
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cart::{Cart, CartError};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset or invalid
    #[arg(short, long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct CheckoutArgs {
    /// Fixture set providing products & offers
    #[arg(short, long, default_value = "default")]
    pub fixture: String,

    /// Cart contents, e.g. `CAP:1,TSHIRT:4`
    #[arg(short, long, value_parser = parse_cart_arg)]
    pub cart: Option<Cart>,

    /// File holding a saved cart, one `CODE: QUANTITY` per line
    #[arg(long)]
    pub cart_file: Option<PathBuf>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Errors raised while initialising logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a global tracing subscriber writing to stderr.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(args: &LoggingArgs) -> Result<(), LoggingError> {
    match args.log_format {
        LogFormat::Compact => init_with_layer(
            args,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(std::io::stderr),
        ),
        LogFormat::Json => init_with_layer(
            args,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true)
                .with_writer(std::io::stderr),
        ),
    }
}

fn init_with_layer<L>(args: &LoggingArgs, fmt_layer: L) -> Result<(), LoggingError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(args))
        .try_init()?;

    Ok(())
}

fn build_env_filter(args: &LoggingArgs) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()))
}

/// Parses a comma separated `CODE:QUANTITY` list into a cart.
///
/// Whitespace around entries is ignored and repeated codes are added together.
///
/// # Errors
///
/// Returns [`CartError::InvalidCartFormat`] naming the 1-based entry that is
/// malformed, or the error from [`Cart::add`].
pub fn parse_cart_arg(input: &str) -> Result<Cart, CartError> {
    let mut cart = Cart::new();

    for (idx, entry) in input.split(',').enumerate() {
        let entry = entry.trim();

        if entry.is_empty() {
            continue;
        }

        let invalid = |reason: &str| CartError::InvalidCartFormat {
            line: idx + 1,
            reason: reason.to_string(),
        };

        let (code, quantity) = entry
            .split_once(':')
            .ok_or_else(|| invalid("expected `CODE:QUANTITY`"))?;

        let quantity = quantity
            .trim()
            .parse::<u32>()
            .map_err(|_err| invalid("quantity is not a non-negative integer"))?;

        cart.add(code.trim(), quantity)?;
    }

    Ok(cart)
}
