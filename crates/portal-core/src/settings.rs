//! Restaurant Settings
//!
//! Form state for the vendor's restaurant profile.

use serde::{Deserialize, Serialize};

use crate::models::{parse_amount, FormError};

/// Restaurant profile as returned by `GET /vendor/restaurant`.
///
/// The minimum order amount has gone by several names on the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSettings {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub minimum_order_amount: Option<f64>,
    #[serde(default)]
    pub minimum_order_value: Option<f64>,
    #[serde(default)]
    pub min_order_amount: Option<f64>,
    #[serde(default)]
    pub min_order_value: Option<f64>,
}

impl RestaurantSettings {
    pub fn minimum_order(&self) -> Option<f64> {
        self.minimum_order_amount
            .or(self.minimum_order_value)
            .or(self.min_order_amount)
            .or(self.min_order_value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: String,
    pub description: String,
    pub minimum_order_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    pub name: String,
    pub description: String,
    pub min_order_amount: String,
}

impl SettingsForm {
    pub fn from_settings(settings: &RestaurantSettings) -> Self {
        Self {
            name: settings.name.clone().unwrap_or_default(),
            description: settings.description.clone().unwrap_or_default(),
            min_order_amount: format_minimum(settings.minimum_order()),
        }
    }

    /// Form after a save; fields the server left out keep the submitted values
    pub fn after_save(saved: &RestaurantSettings, submitted: &RestaurantUpdate) -> Self {
        Self {
            name: saved.name.clone().unwrap_or_else(|| submitted.name.clone()),
            description: saved
                .description
                .clone()
                .unwrap_or_else(|| submitted.description.clone()),
            min_order_amount: format_minimum(saved.minimum_order()),
        }
    }

    pub fn to_update(&self) -> Result<RestaurantUpdate, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyRestaurantName);
        }
        let minimum = parse_amount(&self.min_order_amount).ok_or(FormError::InvalidMinimumOrder)?;
        Ok(RestaurantUpdate {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            minimum_order_amount: minimum,
        })
    }
}

fn format_minimum(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}
