//! House price estimate form: validation, synthetic pricing, display formatting
//! and the small amount of glue (wishlist, banners, HTTP routes) around them.

pub mod domain;
pub mod estimator;
pub mod format;
pub mod import;
pub mod noise;
pub mod notification;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Amenities, FormField, FurnishingStatus, HouseAttributes, PricePrediction, PredictionView,
};
pub use estimator::{PriceBreakdown, PriceEstimator, PriceFactor, PricingRules};
pub use format::format_price;
pub use import::{HouseCsvImporter, HouseImportError, HouseRow};
pub use noise::{FixedNoise, NoiseSource, RandomNoise};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use repository::{PredictionId, PredictionRepository, RepositoryError, SavedPrediction};
pub use router::prediction_router;
pub use service::{LatencyProfile, PredictionService, PredictionServiceError, SaveAcknowledgement};
pub use validation::{single_valued, validate, RawForm, ValidationErrors};
