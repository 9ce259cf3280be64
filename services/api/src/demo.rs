use crate::infra::{build_prediction_service, InMemoryPredictionRepository};
use clap::Args;
use house_pricing::config::{AppConfig, PredictionConfig};
use house_pricing::error::AppError;
use house_pricing::prediction::{
    format_price, HouseCsvImporter, Notification, PredictionService, PredictionServiceError,
    PredictionView, PriceEstimator, RandomNoise, RawForm, ValidationErrors,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Built-up area in square feet (1000-20000)
    #[arg(long)]
    pub(crate) area: Option<String>,
    /// Number of bedrooms
    #[arg(long)]
    pub(crate) bedrooms: Option<String>,
    /// Number of bathrooms
    #[arg(long)]
    pub(crate) bathrooms: Option<String>,
    /// Number of stories
    #[arg(long)]
    pub(crate) stories: Option<String>,
    /// Main road access (yes/no)
    #[arg(long)]
    pub(crate) mainroad: Option<String>,
    /// Guest room (yes/no)
    #[arg(long)]
    pub(crate) guestroom: Option<String>,
    /// Basement (yes/no)
    #[arg(long)]
    pub(crate) basement: Option<String>,
    /// Hot water heating (yes/no)
    #[arg(long)]
    pub(crate) hotwaterheating: Option<String>,
    /// Air conditioning (yes/no)
    #[arg(long)]
    pub(crate) airconditioning: Option<String>,
    /// Parking spaces
    #[arg(long)]
    pub(crate) parking: Option<String>,
    /// Preferred area (yes/no)
    #[arg(long)]
    pub(crate) prefarea: Option<String>,
    /// furnished, semi-furnished or unfurnished
    #[arg(long)]
    pub(crate) furnishingstatus: Option<String>,
    /// Skip the cosmetic wait before the estimate is shown
    #[arg(long)]
    pub(crate) no_delay: bool,
    /// Seed the price variation for a reproducible estimate
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

impl PredictArgs {
    fn form(&self) -> RawForm {
        [
            ("area", &self.area),
            ("bedrooms", &self.bedrooms),
            ("bathrooms", &self.bathrooms),
            ("stories", &self.stories),
            ("mainroad", &self.mainroad),
            ("guestroom", &self.guestroom),
            ("basement", &self.basement),
            ("hotwaterheating", &self.hotwaterheating),
            ("airconditioning", &self.airconditioning),
            ("parking", &self.parking),
            ("prefarea", &self.prefarea),
            ("furnishingstatus", &self.furnishingstatus),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|value| (name.to_string(), value)))
        .collect()
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export whose headers match the form field names
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Seed the price variation for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Keep the cosmetic prediction and save delays
    #[arg(long)]
    pub(crate) with_delay: bool,
    /// Seed the price variation for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

fn prediction_config(no_delay: bool, seed: Option<u64>) -> Result<PredictionConfig, AppError> {
    let mut config = AppConfig::load()?.prediction;
    if no_delay {
        config = PredictionConfig {
            notification_ttl: config.notification_ttl,
            random_seed: config.random_seed,
            ..PredictionConfig::immediate()
        };
    }
    if seed.is_some() {
        config.random_seed = seed;
    }
    Ok(config)
}

pub(crate) async fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = prediction_config(args.no_delay, args.seed)?;
    let service = build_prediction_service(&config);

    if !config.delay.is_zero() {
        println!("Estimating...");
    }

    match service.predict(&args.form()).await {
        Ok(view) => {
            render_prediction(&view);
            Ok(())
        }
        Err(PredictionServiceError::Validation(errors)) => {
            render_field_errors(&errors);
            Err(PredictionServiceError::Validation(errors).into())
        }
        Err(other) => {
            render_notification(&service.notifier().prediction_failed());
            Err(other.into())
        }
    }
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let rows = HouseCsvImporter::from_path(&args.csv)?;
    let estimator = PriceEstimator::new(Arc::new(RandomNoise::from_seed_option(args.seed)));

    println!("Batch estimates for {}", args.csv.display());
    let mut rejected = 0usize;
    for row in &rows {
        match &row.attributes {
            Ok(attrs) => {
                let view = PredictionView::from_prediction(estimator.estimate(attrs));
                let listed = row
                    .listed_price
                    .map(|price| format!(" (listed {})", format_price(price)))
                    .unwrap_or_default();
                println!(
                    "- line {}: {}{} | confidence {:.0}% | {}",
                    row.line,
                    view.formatted_price,
                    listed,
                    view.confidence * 100.0,
                    factor_summary(&view.factors)
                );
            }
            Err(errors) => {
                rejected += 1;
                let details: Vec<String> = errors
                    .iter()
                    .map(|(field, message)| format!("{}: {message}", field.name()))
                    .collect();
                println!("- line {}: rejected ({})", row.line, details.join("; "));
            }
        }
    }

    println!(
        "\n{} row(s) estimated, {} rejected",
        rows.len() - rejected,
        rejected
    );
    Ok(())
}

pub(crate) fn run_format(price: u64) {
    println!("{}", format_price(price));
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = prediction_config(!args.with_delay, args.seed)?;
    let service = build_prediction_service(&config);

    println!("House price estimator demo");
    let mut first_estimate = None;
    for (title, form) in sample_forms() {
        println!("\n{title}");
        match service.predict(&form).await {
            Ok(view) => {
                render_prediction(&view);
                first_estimate.get_or_insert(view);
            }
            Err(PredictionServiceError::Validation(errors)) => render_field_errors(&errors),
            Err(other) => return Err(other.into()),
        }
    }

    if let Some(view) = first_estimate {
        save_and_list(&service, view).await?;
    }

    println!("\nSearch");
    for banner in service.notifier().search("3 BHK near metro") {
        render_notification(&banner);
    }

    Ok(())
}

async fn save_and_list(
    service: &PredictionService<InMemoryPredictionRepository>,
    view: PredictionView,
) -> Result<(), AppError> {
    println!("\nSaving first estimate");
    let ack = service.save(view).await?;
    render_notification(&ack.notification);

    render_notification(&service.notifier().opening_saved());
    for saved in service.saved(10)? {
        println!(
            "- {} | {} | saved {}",
            saved.id.0,
            saved.prediction.formatted_price,
            saved.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

fn sample_forms() -> Vec<(&'static str, RawForm)> {
    let build = |entries: [(&str, &str); 12]| -> RawForm {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    };

    vec![
        (
            "Starter home",
            build([
                ("area", "3000"),
                ("bedrooms", "2"),
                ("bathrooms", "1"),
                ("stories", "1"),
                ("mainroad", "yes"),
                ("guestroom", "no"),
                ("basement", "yes"),
                ("hotwaterheating", "no"),
                ("airconditioning", "no"),
                ("parking", "1"),
                ("prefarea", "no"),
                ("furnishingstatus", "semi-furnished"),
            ]),
        ),
        (
            "Family house in a preferred area",
            build([
                ("area", "7420"),
                ("bedrooms", "4"),
                ("bathrooms", "2"),
                ("stories", "3"),
                ("mainroad", "yes"),
                ("guestroom", "no"),
                ("basement", "no"),
                ("hotwaterheating", "no"),
                ("airconditioning", "yes"),
                ("parking", "2"),
                ("prefarea", "yes"),
                ("furnishingstatus", "furnished"),
            ]),
        ),
        (
            "Estate",
            build([
                ("area", "16200"),
                ("bedrooms", "5"),
                ("bathrooms", "3"),
                ("stories", "2"),
                ("mainroad", "yes"),
                ("guestroom", "yes"),
                ("basement", "yes"),
                ("hotwaterheating", "yes"),
                ("airconditioning", "yes"),
                ("parking", "3"),
                ("prefarea", "yes"),
                ("furnishingstatus", "furnished"),
            ]),
        ),
        (
            "Plot below the minimum area",
            build([
                ("area", "800"),
                ("bedrooms", "1"),
                ("bathrooms", "1"),
                ("stories", "1"),
                ("mainroad", "no"),
                ("guestroom", "no"),
                ("basement", "no"),
                ("hotwaterheating", "no"),
                ("airconditioning", "no"),
                ("parking", "0"),
                ("prefarea", "no"),
                ("furnishingstatus", "unfurnished"),
            ]),
        ),
    ]
}

fn factor_summary(factors: &[String]) -> String {
    if factors.is_empty() {
        "no standout factors".to_string()
    } else {
        factors.join(", ")
    }
}

fn render_prediction(view: &PredictionView) {
    println!("Predicted price: {}", view.formatted_price);
    println!("Confidence: {:.0}%", view.confidence * 100.0);
    if view.factors.is_empty() {
        println!("Key factors: none");
    } else {
        println!("Key factors");
        for factor in &view.factors {
            println!("- {factor}");
        }
    }
}

fn render_field_errors(errors: &ValidationErrors) {
    println!("Please fix the highlighted fields");
    for (field, message) in errors.iter() {
        println!("- {}: {}", field.name(), message);
    }
}

fn render_notification(notification: &Notification) {
    println!("[{:?}] {}", notification.level, notification.message);
}
