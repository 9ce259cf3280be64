use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::domain::{Amenities, FormField, FurnishingStatus, HouseAttributes};

/// Field name to raw control value, as collected from a form post.
pub type RawForm = BTreeMap<String, String>;

pub const MIN_AREA: u32 = 1_000;
pub const MAX_AREA: u32 = 20_000;

/// Per-field messages for a rejected submission. One message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    // A later message for the same field replaces the earlier one.
    fn insert(&mut self, field: FormField, message: String) {
        self.fields.insert(field, message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.keys().map(|field| field.name()).collect();
        write!(
            f,
            "{} invalid field(s): {}",
            self.fields.len(),
            names.join(", ")
        )
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects posted pairs into a [`RawForm`]. A key sent more than once is left
/// out entirely, so [`validate`] treats it as having no single selection.
pub fn single_valued<I>(pairs: I) -> RawForm
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut form = RawForm::new();
    let mut repeated = Vec::new();
    for (key, value) in pairs {
        if form.contains_key(&key) {
            repeated.push(key);
        } else {
            form.insert(key, value);
        }
    }
    for key in repeated {
        form.remove(&key);
    }
    form
}

pub fn missing_message(field: FormField) -> String {
    match field {
        FormField::FurnishingStatus => "Please select furnishing status".to_string(),
        other => format!("Please select {}", other.label()),
    }
}

pub fn area_range_message() -> String {
    "Area must be between 1,000 and 20,000 sq ft".to_string()
}

fn whole_number_message(field: FormField) -> String {
    format!("Please enter a whole number for {}", field.label())
}

fn minimum_message(field: FormField, minimum: i64) -> String {
    let label = field.label();
    let mut chars = label.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{capitalized} must be at least {minimum}")
}

/// Check every control and build the attribute record, or report all problems at once.
pub fn validate(form: &RawForm) -> Result<HouseAttributes, ValidationErrors> {
    let mut reader = FieldReader {
        form,
        errors: ValidationErrors::default(),
    };

    let area = reader.area();
    let bedrooms = reader.count(FormField::Bedrooms, 1);
    let bathrooms = reader.count(FormField::Bathrooms, 1);
    let stories = reader.count(FormField::Stories, 1);
    let mainroad = reader.yes_no(FormField::MainRoad);
    let guestroom = reader.yes_no(FormField::GuestRoom);
    let basement = reader.yes_no(FormField::Basement);
    let hotwaterheating = reader.yes_no(FormField::HotWaterHeating);
    let airconditioning = reader.yes_no(FormField::AirConditioning);
    let parking = reader.count(FormField::Parking, 0);
    let prefarea = reader.yes_no(FormField::PrefArea);
    let furnishing = reader.furnishing();

    match (
        area,
        bedrooms,
        bathrooms,
        stories,
        parking,
        mainroad,
        guestroom,
        basement,
        hotwaterheating,
        airconditioning,
        prefarea,
        furnishing,
    ) {
        (
            Some(area),
            Some(bedrooms),
            Some(bathrooms),
            Some(stories),
            Some(parking),
            Some(mainroad),
            Some(guestroom),
            Some(basement),
            Some(hotwaterheating),
            Some(airconditioning),
            Some(prefarea),
            Some(furnishing),
        ) if reader.errors.is_empty() => Ok(HouseAttributes {
            area,
            bedrooms,
            bathrooms,
            stories,
            parking,
            amenities: Amenities {
                mainroad,
                guestroom,
                basement,
                hotwaterheating,
                airconditioning,
                prefarea,
            },
            furnishing,
        }),
        _ => Err(reader.errors),
    }
}

struct FieldReader<'a> {
    form: &'a RawForm,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    fn present(&mut self, field: FormField) -> Option<&'a str> {
        let form: &'a RawForm = self.form;
        match form.get(field.name()).map(|value| value.trim()) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                self.errors.insert(field, missing_message(field));
                None
            }
        }
    }

    fn integer(&mut self, field: FormField) -> Option<i64> {
        let raw = self.present(field)?;
        match raw.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.insert(field, whole_number_message(field));
                None
            }
        }
    }

    fn area(&mut self) -> Option<u32> {
        let area = self.integer(FormField::Area)?;
        if area < i64::from(MIN_AREA) || area > i64::from(MAX_AREA) {
            self.errors.insert(FormField::Area, area_range_message());
            return None;
        }
        u32::try_from(area).ok()
    }

    fn count(&mut self, field: FormField, minimum: i64) -> Option<u32> {
        let value = self.integer(field)?;
        if value < minimum {
            self.errors.insert(field, minimum_message(field, minimum));
            return None;
        }
        match u32::try_from(value) {
            Ok(count) => Some(count),
            Err(_) => {
                self.errors.insert(field, whole_number_message(field));
                None
            }
        }
    }

    fn yes_no(&mut self, field: FormField) -> Option<bool> {
        let raw = self.present(field)?;
        if raw.eq_ignore_ascii_case("yes") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("no") {
            Some(false)
        } else {
            self.errors.insert(field, missing_message(field));
            None
        }
    }

    fn furnishing(&mut self) -> Option<FurnishingStatus> {
        let raw = self.present(FormField::FurnishingStatus)?;
        let status = FurnishingStatus::parse(raw);
        if status.is_none() {
            self.errors.insert(
                FormField::FurnishingStatus,
                missing_message(FormField::FurnishingStatus),
            );
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> RawForm {
        [
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
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
    }

    #[test]
    fn complete_form_produces_attributes() {
        let attrs = validate(&complete_form()).expect("form is valid");
        assert_eq!(attrs.area, 7420);
        assert_eq!(attrs.bedrooms, 4);
        assert_eq!(attrs.parking, 2);
        assert!(attrs.amenities.mainroad);
        assert!(!attrs.amenities.guestroom);
        assert!(attrs.amenities.prefarea);
        assert_eq!(attrs.furnishing, FurnishingStatus::Furnished);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate(&RawForm::new()).expect_err("nothing filled in");
        assert_eq!(errors.len(), 12);
        assert_eq!(
            errors.get(FormField::Bedrooms),
            Some("Please select number of bedrooms")
        );
        assert_eq!(
            errors.get(FormField::PrefArea),
            Some("Please select preferred area option")
        );
        assert_eq!(
            errors.get(FormField::FurnishingStatus),
            Some("Please select furnishing status")
        );
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let mut form = complete_form();
        form.insert("stories".to_string(), "   ".to_string());
        let errors = validate(&form).expect_err("stories blank");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FormField::Stories),
            Some("Please select number of stories")
        );
    }

    #[test]
    fn area_outside_range_gets_range_message_only() {
        for raw in ["999", "20001", "-5"] {
            let mut form = complete_form();
            form.insert("area".to_string(), raw.to_string());
            let errors = validate(&form).expect_err("area out of range");
            assert_eq!(errors.len(), 1, "only area should fail for {raw}");
            assert_eq!(
                errors.get(FormField::Area),
                Some("Area must be between 1,000 and 20,000 sq ft")
            );
        }
    }

    #[test]
    fn area_bounds_are_inclusive() {
        for raw in ["1000", "20000"] {
            let mut form = complete_form();
            form.insert("area".to_string(), raw.to_string());
            assert!(validate(&form).is_ok(), "{raw} should be accepted");
        }
    }

    #[test]
    fn missing_area_reports_presence_not_range() {
        let mut form = complete_form();
        form.remove("area");
        let errors = validate(&form).expect_err("area missing");
        assert_eq!(errors.get(FormField::Area), Some("Please select area"));
    }

    #[test]
    fn non_numeric_and_below_minimum_counts_are_rejected() {
        let mut form = complete_form();
        form.insert("bedrooms".to_string(), "three".to_string());
        form.insert("bathrooms".to_string(), "0".to_string());
        form.insert("parking".to_string(), "-1".to_string());
        let errors = validate(&form).expect_err("counts invalid");
        assert_eq!(
            errors.get(FormField::Bedrooms),
            Some("Please enter a whole number for number of bedrooms")
        );
        assert_eq!(
            errors.get(FormField::Bathrooms),
            Some("Number of bathrooms must be at least 1")
        );
        assert_eq!(
            errors.get(FormField::Parking),
            Some("Parking spaces must be at least 0")
        );
    }

    #[test]
    fn parking_may_be_zero() {
        let mut form = complete_form();
        form.insert("parking".to_string(), "0".to_string());
        assert_eq!(validate(&form).expect("valid").parking, 0);
    }

    #[test]
    fn yes_no_accepts_any_case_and_rejects_other_values() {
        let mut form = complete_form();
        form.insert("basement".to_string(), "YES".to_string());
        form.insert("guestroom".to_string(), "maybe".to_string());
        let errors = validate(&form).expect_err("guestroom invalid");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FormField::GuestRoom),
            Some("Please select guest room option")
        );

        form.insert("guestroom".to_string(), "No".to_string());
        let attrs = validate(&form).expect("valid");
        assert!(attrs.amenities.basement);
        assert!(!attrs.amenities.guestroom);
    }

    #[test]
    fn unknown_furnishing_value_is_rejected() {
        let mut form = complete_form();
        form.insert("furnishingstatus".to_string(), "luxury".to_string());
        let errors = validate(&form).expect_err("furnishing invalid");
        assert_eq!(
            errors.get(FormField::FurnishingStatus),
            Some("Please select furnishing status")
        );
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut form = complete_form();
        form.insert("price".to_string(), "13300000".to_string());
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn repeated_keys_count_as_no_selection() {
        let mut pairs: Vec<(String, String)> = complete_form().into_iter().collect();
        pairs.push(("furnishingstatus".to_string(), "unfurnished".to_string()));
        pairs.push(("area".to_string(), "7420".to_string()));

        let form = single_valued(pairs);
        assert!(!form.contains_key("furnishingstatus"));
        assert!(!form.contains_key("area"));
        assert_eq!(form.get("bedrooms").map(String::as_str), Some("4"));

        let errors = validate(&form).expect_err("repeated fields rejected");
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(FormField::FurnishingStatus),
            Some("Please select furnishing status")
        );
    }

    #[test]
    fn errors_serialize_keyed_by_field_name() {
        let mut form = complete_form();
        form.remove("mainroad");
        let errors = validate(&form).expect_err("mainroad missing");
        let encoded = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({ "mainroad": "Please select main road access" })
        );
        assert_eq!(errors.to_string(), "1 invalid field(s): mainroad");
    }
}
