// ABOUTME: Canonical UI-facing data model: meals, macro breakdowns, weekly plans, cart items
// ABOUTME: Independent of backend payload shape; constructed fresh by the normalizer, never mutated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Macro breakdown for a meal, grams per macro, never negative
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroBreakdown {
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbohydrates_g: f64,
    /// Fat in grams
    pub fat_g: f64,
}

/// Canonical meal representation, independent of backend payload shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    /// Unique identifier within a list
    pub id: String,
    /// Display title
    pub title: String,
    /// Image URI, possibly empty
    pub image_url: String,
    /// Calorie count, never negative
    pub calories: f64,
    /// Macro breakdown
    pub macros: MacroBreakdown,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Originating day key when sourced from a weekly plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    /// Originating section name when sourced from a weekly plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Section name to ordered meal list, for one day
pub type SectionMap = BTreeMap<String, Vec<Meal>>;

/// Canonical weekly plan: day key to section map
///
/// Every day key present in the backend plan produces an entry, even when
/// its section map is empty; section lists are never null, only possibly
/// empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeeklyPlan {
    /// Day key to section map
    pub days: BTreeMap<String, SectionMap>,
}

/// Summed calories and macros for one day of a plan
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DayTotals {
    /// Total calories for the day
    pub calories: f64,
    /// Total macros for the day
    pub macros: MacroBreakdown,
}

impl WeeklyPlan {
    /// True when the plan holds no days at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Section map for a day, if present
    #[must_use]
    pub fn day(&self, key: &str) -> Option<&SectionMap> {
        self.days.get(key)
    }

    /// Total number of meals across every day and section
    #[must_use]
    pub fn meal_count(&self) -> usize {
        self.days
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Iterate over every meal in the plan
    pub fn meals(&self) -> impl Iterator<Item = &Meal> {
        self.days.values().flat_map(BTreeMap::values).flatten()
    }

    /// Summed calories and macros for one day, for dashboard summaries
    #[must_use]
    pub fn day_totals(&self, key: &str) -> DayTotals {
        let mut totals = DayTotals::default();
        let Some(sections) = self.days.get(key) else {
            return totals;
        };
        for meal in sections.values().flatten() {
            totals.calories += meal.calories;
            totals.macros.protein_g += meal.macros.protein_g;
            totals.macros.carbohydrates_g += meal.macros.carbohydrates_g;
            totals.macros.fat_g += meal.macros.fat_g;
        }
        totals
    }
}

/// Full profile payload collected by the registration wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupProfile {
    /// Phone number in E.164 form, the account identity
    pub phone_number: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email, optional on signup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Height in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Self-reported activity level (sedentary, light, moderate, active)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    /// Dietary preferences selected in the wizard
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary_preferences: Vec<String>,
    /// Declared allergies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    /// Primary goal (lose, maintain, gain)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// Item in the user's cart
///
/// Deserialization is tolerant: the backend has shipped both `_id` and
/// `id`, and both `title` and `name`, for the same fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Item identifier
    #[serde(alias = "_id", default)]
    pub id: String,
    /// Display name
    #[serde(alias = "title", default)]
    pub name: String,
    /// Unit price
    #[serde(default)]
    pub price: f64,
    /// Quantity in the cart
    #[serde(default = "one")]
    pub quantity: u32,
    /// Image URI, if any
    #[serde(default, alias = "image", alias = "img")]
    pub image_url: Option<String>,
}

fn one() -> u32 {
    1
}
