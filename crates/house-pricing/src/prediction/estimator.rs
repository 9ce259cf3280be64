use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{FurnishingStatus, HouseAttributes, PricePrediction};
use super::noise::NoiseSource;

/// Weights behind the synthetic estimate. All amounts are rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRules {
    pub base_rate_per_sqft: u64,
    pub prefarea_rate: u64,
    pub mainroad_rate: u64,
    pub basement_rate: u64,
    pub hotwaterheating_rate: u64,
    pub airconditioning_rate: u64,
    pub guestroom_rate: u64,
    pub extra_bedroom: u64,
    pub extra_bathroom: u64,
    pub extra_story: u64,
    pub per_parking_space: u64,
    pub furnished_bonus: u64,
    pub semi_furnished_bonus: u64,
    pub variation: (f64, f64),
    pub confidence: (f64, f64),
    pub spacious_bedrooms: u32,
    pub max_factors: usize,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            base_rate_per_sqft: 500,
            prefarea_rate: 150,
            mainroad_rate: 100,
            basement_rate: 50,
            hotwaterheating_rate: 25,
            airconditioning_rate: 75,
            guestroom_rate: 50,
            extra_bedroom: 100_000,
            extra_bathroom: 150_000,
            extra_story: 200_000,
            per_parking_space: 100_000,
            furnished_bonus: 500_000,
            semi_furnished_bonus: 250_000,
            variation: (0.9, 1.1),
            confidence: (0.85, 0.95),
            spacious_bedrooms: 4,
            max_factors: 3,
        }
    }
}

/// Highlights surfaced next to an estimate, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFactor {
    PremiumLocation,
    MainRoadAccess,
    SpaciousLayout,
    BasementIncluded,
    FullyFurnished,
}

impl PriceFactor {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::PremiumLocation,
            Self::MainRoadAccess,
            Self::SpaciousLayout,
            Self::BasementIncluded,
            Self::FullyFurnished,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PremiumLocation => "Premium location",
            Self::MainRoadAccess => "Main road access",
            Self::SpaciousLayout => "Spacious layout",
            Self::BasementIncluded => "Basement included",
            Self::FullyFurnished => "Fully furnished",
        }
    }

    fn applies(self, attrs: &HouseAttributes, rules: &PricingRules) -> bool {
        match self {
            Self::PremiumLocation => attrs.amenities.prefarea,
            Self::MainRoadAccess => attrs.amenities.mainroad,
            Self::SpaciousLayout => attrs.bedrooms >= rules.spacious_bedrooms,
            Self::BasementIncluded => attrs.amenities.basement,
            Self::FullyFurnished => attrs.furnishing == FurnishingStatus::Furnished,
        }
    }
}

/// Deterministic part of an estimate, before any variation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub rate_per_sqft: u64,
    pub area_value: u64,
    pub bedrooms_value: u64,
    pub bathrooms_value: u64,
    pub stories_value: u64,
    pub parking_value: u64,
    pub furnishing_value: u64,
    pub total: u64,
}

/// Applies [`PricingRules`] to validated attributes and mixes in noise.
#[derive(Clone)]
pub struct PriceEstimator {
    rules: PricingRules,
    noise: Arc<dyn NoiseSource>,
}

impl PriceEstimator {
    pub fn new(noise: Arc<dyn NoiseSource>) -> Self {
        Self::with_rules(PricingRules::default(), noise)
    }

    pub fn with_rules(rules: PricingRules, noise: Arc<dyn NoiseSource>) -> Self {
        Self { rules, noise }
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    pub fn breakdown(&self, attrs: &HouseAttributes) -> PriceBreakdown {
        let rules = &self.rules;
        let amenities = &attrs.amenities;

        let mut rate_per_sqft = rules.base_rate_per_sqft;
        for (present, bonus) in [
            (amenities.prefarea, rules.prefarea_rate),
            (amenities.mainroad, rules.mainroad_rate),
            (amenities.basement, rules.basement_rate),
            (amenities.hotwaterheating, rules.hotwaterheating_rate),
            (amenities.airconditioning, rules.airconditioning_rate),
            (amenities.guestroom, rules.guestroom_rate),
        ] {
            if present {
                rate_per_sqft += bonus;
            }
        }

        let area_value = u64::from(attrs.area) * rate_per_sqft;
        // Counts below one contribute nothing instead of a negative amount.
        let bedrooms_value = u64::from(attrs.bedrooms.saturating_sub(1)) * rules.extra_bedroom;
        let bathrooms_value = u64::from(attrs.bathrooms.saturating_sub(1)) * rules.extra_bathroom;
        let stories_value = u64::from(attrs.stories.saturating_sub(1)) * rules.extra_story;
        let parking_value = u64::from(attrs.parking) * rules.per_parking_space;
        let furnishing_value = match attrs.furnishing {
            FurnishingStatus::Furnished => rules.furnished_bonus,
            FurnishingStatus::SemiFurnished => rules.semi_furnished_bonus,
            FurnishingStatus::Unfurnished => 0,
        };

        PriceBreakdown {
            rate_per_sqft,
            area_value,
            bedrooms_value,
            bathrooms_value,
            stories_value,
            parking_value,
            furnishing_value,
            total: area_value
                + bedrooms_value
                + bathrooms_value
                + stories_value
                + parking_value
                + furnishing_value,
        }
    }

    pub fn factors(&self, attrs: &HouseAttributes) -> Vec<PriceFactor> {
        PriceFactor::ordered()
            .into_iter()
            .filter(|factor| factor.applies(attrs, &self.rules))
            .take(self.rules.max_factors)
            .collect()
    }

    pub fn estimate(&self, attrs: &HouseAttributes) -> PricePrediction {
        let breakdown = self.breakdown(attrs);
        let (low, high) = self.rules.variation;
        let variation = self.noise.sample(low, high);
        let price = (breakdown.total as f64 * variation).round() as u64;

        let (low, high) = self.rules.confidence;
        let confidence = self.noise.sample(low, high);

        let factors = self
            .factors(attrs)
            .into_iter()
            .map(|factor| factor.label().to_string())
            .collect();

        debug!(
            base_total = breakdown.total,
            variation, price, confidence, "estimated house price"
        );

        PricePrediction {
            price,
            confidence,
            factors,
        }
    }
}
