use crate::demo::{run_batch, run_demo, run_format, run_predict, BatchArgs, DemoArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use house_pricing::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "House Price Estimator",
    about = "Serve and demo the synthetic house price estimator from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Estimate a single house from command-line fields
    Predict(PredictArgs),
    /// Estimate every row of a CSV export
    Batch(BatchArgs),
    /// Print a rupee amount the way the estimate card shows it
    Format {
        /// Amount in rupees
        price: u64,
    },
    /// Walk through a few sample houses end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args).await,
        Command::Batch(args) => run_batch(args),
        Command::Format { price } => {
            run_format(price);
            Ok(())
        }
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_defaults_to_serve() {
        let cli = Cli::try_parse_from(["house-pricing-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn predict_accepts_form_fields() {
        let cli = Cli::try_parse_from([
            "house-pricing-api",
            "predict",
            "--area",
            "4000",
            "--bedrooms",
            "3",
            "--furnishingstatus",
            "furnished",
            "--no-delay",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.area.as_deref(), Some("4000"));
                assert!(args.no_delay);
                assert!(args.parking.is_none());
            }
            other => panic!("expected predict, got {other:?}"),
        }
    }

    #[test]
    fn format_takes_positional_price() {
        let cli = Cli::try_parse_from(["house-pricing-api", "format", "12345678"]).expect("parses");
        assert!(matches!(cli.command, Some(Command::Format { price: 12_345_678 })));
    }
}
