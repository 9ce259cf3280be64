use serde::{Deserialize, Serialize};

/// Named controls on the estimate form, in the order they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Area,
    Bedrooms,
    Bathrooms,
    Stories,
    MainRoad,
    GuestRoom,
    Basement,
    HotWaterHeating,
    AirConditioning,
    Parking,
    PrefArea,
    FurnishingStatus,
}

impl FormField {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::Area,
            Self::Bedrooms,
            Self::Bathrooms,
            Self::Stories,
            Self::MainRoad,
            Self::GuestRoom,
            Self::Basement,
            Self::HotWaterHeating,
            Self::AirConditioning,
            Self::Parking,
            Self::PrefArea,
            Self::FurnishingStatus,
        ]
    }

    /// Wire name used by form controls and CSV headers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Bedrooms => "bedrooms",
            Self::Bathrooms => "bathrooms",
            Self::Stories => "stories",
            Self::MainRoad => "mainroad",
            Self::GuestRoom => "guestroom",
            Self::Basement => "basement",
            Self::HotWaterHeating => "hotwaterheating",
            Self::AirConditioning => "airconditioning",
            Self::Parking => "parking",
            Self::PrefArea => "prefarea",
            Self::FurnishingStatus => "furnishingstatus",
        }
    }

    /// Human wording used inside validation messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Bedrooms => "number of bedrooms",
            Self::Bathrooms => "number of bathrooms",
            Self::Stories => "number of stories",
            Self::MainRoad => "main road access",
            Self::GuestRoom => "guest room option",
            Self::Basement => "basement option",
            Self::HotWaterHeating => "hot water heating option",
            Self::AirConditioning => "air conditioning option",
            Self::Parking => "parking spaces",
            Self::PrefArea => "preferred area option",
            Self::FurnishingStatus => "furnishing status",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|field| field.name() == name)
    }
}

/// Mutually exclusive furnishing levels offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnishingStatus {
    Furnished,
    SemiFurnished,
    Unfurnished,
}

impl FurnishingStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Furnished => "furnished",
            Self::SemiFurnished => "semi-furnished",
            Self::Unfurnished => "unfurnished",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "furnished" => Some(Self::Furnished),
            "semi-furnished" => Some(Self::SemiFurnished),
            "unfurnished" => Some(Self::Unfurnished),
            _ => None,
        }
    }
}

/// Amenity flags collected as yes/no answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
    pub mainroad: bool,
    pub guestroom: bool,
    pub basement: bool,
    pub hotwaterheating: bool,
    pub airconditioning: bool,
    pub prefarea: bool,
}

/// A fully validated house description ready for pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseAttributes {
    pub area: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub stories: u32,
    pub parking: u32,
    pub amenities: Amenities,
    pub furnishing: FurnishingStatus,
}

/// Raw estimate produced by the pricing formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub price: u64,
    pub confidence: f64,
    pub factors: Vec<String>,
}

/// Display-ready estimate returned to form callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionView {
    pub price: u64,
    pub formatted_price: String,
    pub confidence: f64,
    pub factors: Vec<String>,
}

impl PredictionView {
    pub fn from_prediction(prediction: PricePrediction) -> Self {
        Self {
            formatted_price: super::format::format_price(prediction.price),
            price: prediction.price,
            confidence: prediction.confidence,
            factors: prediction.factors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_through_lookup() {
        for field in FormField::ordered() {
            assert_eq!(FormField::from_name(field.name()), Some(field));
        }
        assert_eq!(FormField::from_name("price"), None);
    }

    #[test]
    fn furnishing_parse_is_case_insensitive() {
        assert_eq!(
            FurnishingStatus::parse(" Semi-Furnished "),
            Some(FurnishingStatus::SemiFurnished)
        );
        assert_eq!(FurnishingStatus::parse("semi furnished"), None);
    }

    #[test]
    fn furnishing_serializes_with_form_values() {
        let encoded = serde_json::to_string(&FurnishingStatus::SemiFurnished).unwrap();
        assert_eq!(encoded, "\"semi-furnished\"");
    }
}
