// ABOUTME: Response shape normalizer: converts loose backend meal/plan payloads into canonical models
// ABOUTME: Declarative alias tables with ordered source keys, coercions, and defaults per field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Normalization of untrusted backend payloads.
//!
//! The backend has shipped the same semantic field under several names
//! (`name` vs `title`, `_id` vs `id`, `protein` vs `macros.protein`) and
//! weekly plans in several container shapes. Each canonical field is
//! resolved from an ordered alias table; earlier sources win. Nothing in
//! this module fails: anything unresolvable degrades to a default so a
//! render never aborts on a malformed payload.

use crate::models::{MacroBreakdown, Meal, SectionMap, WeeklyPlan};
use serde_json::Value;

/// Ordered source keys for the meal identifier
pub const ID_SOURCES: &[&str] = &["_id", "id"];
/// Ordered source keys for the meal title
pub const TITLE_SOURCES: &[&str] = &["name", "title"];
/// Ordered source keys for the meal image URI
pub const IMAGE_SOURCES: &[&str] = &["image.url", "image", "img"];
/// Ordered source keys for the calorie count
pub const CALORIE_SOURCES: &[&str] = &["calories", "kcal"];
/// Ordered source keys for protein grams
pub const PROTEIN_SOURCES: &[&str] = &["protein", "macros.protein"];
/// Ordered source keys for carbohydrate grams
pub const CARB_SOURCES: &[&str] = &["carbs", "carbohydrates", "macros.carbs"];
/// Ordered source keys for fat grams
pub const FAT_SOURCES: &[&str] = &["fat", "macros.fat"];
/// Ordered source keys for the optional description
pub const DESCRIPTION_SOURCES: &[&str] = &["description", "desc"];

/// Ordered source keys for the weekly-plan container inside a response
pub const PLAN_CONTAINER_SOURCES: &[&str] = &["plan", "weeklyPlan", "weekPlan"];

/// Title used when no alias resolves
const DEFAULT_TITLE: &str = "Meal";

/// Three-letter weekday prefixes recognized by the fallback classifier
const DAY_PREFIXES: &[&str] = &["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Shape of a plan payload, as consumed by the plan screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// Day keys to section maps
    Weekly,
    /// One flat section map
    Single,
}

/// Walk a dotted path (`macros.protein`) into a JSON value.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Resolve the first source that carries usable text.
///
/// Strings must be non-empty; numbers are rendered, which covers backends
/// that send numeric ids.
fn resolve_text(value: &Value, sources: &[&str]) -> Option<String> {
    for source in sources {
        match lookup(value, source) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Resolve the first numeric source, clamped non-negative, defaulting to zero.
///
/// Accepts numbers and numeric strings; anything else counts as absent.
fn resolve_number(value: &Value, sources: &[&str]) -> f64 {
    for source in sources {
        let resolved = match lookup(value, source) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        if let Some(n) = resolved {
            if n.is_finite() {
                return n.max(0.0);
            }
        }
    }
    0.0
}

/// Normalize one backend meal object into a canonical [`Meal`].
///
/// Never fails: every field falls back to its declared default, so the
/// result is structurally valid for any input, including non-objects.
#[must_use]
pub fn normalize_meal(raw: &Value) -> Meal {
    Meal {
        id: resolve_text(raw, ID_SOURCES).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        title: resolve_text(raw, TITLE_SOURCES).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        image_url: resolve_text(raw, IMAGE_SOURCES).unwrap_or_default(),
        calories: resolve_number(raw, CALORIE_SOURCES),
        macros: MacroBreakdown {
            protein_g: resolve_number(raw, PROTEIN_SOURCES),
            carbohydrates_g: resolve_number(raw, CARB_SOURCES),
            fat_g: resolve_number(raw, FAT_SOURCES),
        },
        description: resolve_text(raw, DESCRIPTION_SOURCES),
        day: None,
        section: None,
    }
}

/// Section values arrive as a single meal object or an array of them.
/// A bare object wraps into a one-element list; anything else is empty.
fn as_meal_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![value],
        _ => Vec::new(),
    }
}

/// Locate the plan container inside a response payload.
///
/// The backend has used `plan`, `weeklyPlan`, and `weekPlan`; when none of
/// those holds an object, the payload itself is used only if its keys look
/// like day keys, so an envelope such as `{ userId, name }` with an absent
/// plan normalizes to an empty plan rather than garbage days.
fn plan_container(raw: &Value) -> Option<&Value> {
    for source in PLAN_CONTAINER_SOURCES {
        if let Some(candidate) = lookup(raw, source) {
            if candidate.is_object() {
                return Some(candidate);
            }
        }
    }
    match raw.as_object() {
        Some(map) if map.keys().any(|k| is_day_key(k)) => Some(raw),
        _ => None,
    }
}

/// Normalize a weekly-plan payload into a canonical [`WeeklyPlan`].
///
/// Every day key in the container produces an entry even when its section
/// map is empty; each meal is tagged with its originating day and section.
#[must_use]
pub fn normalize_plan(raw: &Value) -> WeeklyPlan {
    let mut plan = WeeklyPlan::default();
    let Some(container) = plan_container(raw) else {
        return plan;
    };
    let Some(days) = container.as_object() else {
        return plan;
    };

    for (day, sections) in days {
        let entry = plan.days.entry(day.clone()).or_default();
        let Some(sections) = sections.as_object() else {
            continue;
        };
        for (section, value) in sections {
            let meals = as_meal_list(value)
                .into_iter()
                .map(|raw_meal| {
                    let mut meal = normalize_meal(raw_meal);
                    meal.day = Some(day.clone());
                    meal.section = Some(section.clone());
                    meal
                })
                .collect();
            entry.insert(section.clone(), meals);
        }
    }
    plan
}

/// Normalize a flat section map (a single day's worth of sections).
#[must_use]
pub fn normalize_sections(raw: &Value) -> SectionMap {
    let mut result = SectionMap::new();
    let Some(sections) = raw.as_object() else {
        return result;
    };
    for (section, value) in sections {
        let meals = as_meal_list(value)
            .into_iter()
            .map(|raw_meal| {
                let mut meal = normalize_meal(raw_meal);
                meal.section = Some(section.clone());
                meal
            })
            .collect();
        result.insert(section.clone(), meals);
    }
    result
}

/// True when a key case-insensitively starts with a weekday abbreviation.
#[must_use]
pub fn is_day_key(key: &str) -> bool {
    let lower = key.trim().to_ascii_lowercase();
    DAY_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// Classify a plan payload as weekly or single-day.
///
/// An explicit `kind: "weekly" | "single"` discriminant always wins. Only
/// when the backend omits it does the weekday-prefix fallback apply; a
/// section map whose names start with a weekday abbreviation would then
/// misclassify, which is why the discriminant exists.
#[must_use]
pub fn classify_plan(raw: &Value) -> PlanKind {
    if let Some(kind) = raw.get("kind").and_then(Value::as_str) {
        if kind.eq_ignore_ascii_case("weekly") {
            return PlanKind::Weekly;
        }
        if kind.eq_ignore_ascii_case("single") {
            return PlanKind::Single;
        }
    }

    let container = plan_container(raw).unwrap_or(raw);
    let has_day_keys = container
        .as_object()
        .is_some_and(|map| map.keys().any(|k| is_day_key(k)));
    if has_day_keys {
        PlanKind::Weekly
    } else {
        PlanKind::Single
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_lookup_walks_nested_objects() {
        let value = json!({ "macros": { "protein": 31.5 } });
        assert_eq!(
            lookup(&value, "macros.protein").and_then(Value::as_f64),
            Some(31.5)
        );
        assert!(lookup(&value, "macros.fiber").is_none());
    }

    #[test]
    fn resolve_text_skips_empty_strings() {
        let value = json!({ "name": "  ", "title": "Oat Bowl" });
        assert_eq!(
            resolve_text(&value, TITLE_SOURCES),
            Some("Oat Bowl".to_string())
        );
    }

    #[test]
    fn resolve_number_accepts_numeric_strings_and_clamps() {
        assert!((resolve_number(&json!({ "calories": "420" }), CALORIE_SOURCES) - 420.0).abs() < f64::EPSILON);
        assert!(resolve_number(&json!({ "calories": -50 }), CALORIE_SOURCES).abs() < f64::EPSILON);
        assert!(resolve_number(&json!({ "calories": "lots" }), CALORIE_SOURCES).abs() < f64::EPSILON);
    }

    #[test]
    fn numeric_id_becomes_string() {
        let meal = normalize_meal(&json!({ "_id": 77, "name": "Soup" }));
        assert_eq!(meal.id, "77");
    }

    #[test]
    fn missing_id_gets_generated() {
        let a = normalize_meal(&json!({ "name": "Soup" }));
        let b = normalize_meal(&json!({ "name": "Soup" }));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn nested_image_url_wins_over_flat() {
        let meal = normalize_meal(&json!({
            "image": { "url": "https://cdn/x.jpg" },
            "img": "https://cdn/y.jpg"
        }));
        assert_eq!(meal.image_url, "https://cdn/x.jpg");
    }

    #[test]
    fn day_key_detection() {
        assert!(is_day_key("Monday"));
        assert!(is_day_key("tue"));
        assert!(is_day_key("SATURDAY"));
        assert!(!is_day_key("Breakfast"));
        assert!(!is_day_key("Lunch"));
    }

    #[test]
    fn explicit_kind_beats_heuristic() {
        // "Sunrise Smoothies" starts with "sun": the fallback would say weekly
        let payload = json!({
            "kind": "single",
            "Sunrise Smoothies": { },
            "Lunch": { }
        });
        assert_eq!(classify_plan(&payload), PlanKind::Single);
    }

    #[test]
    fn heuristic_applies_without_discriminant() {
        let weekly = json!({ "plan": { "Monday": {} } });
        assert_eq!(classify_plan(&weekly), PlanKind::Weekly);

        let flat = json!({ "Breakfast": {}, "Lunch": {} });
        assert_eq!(classify_plan(&flat), PlanKind::Single);
    }

    #[test]
    fn envelope_without_plan_yields_empty_plan() {
        let payload = json!({ "userId": "u1", "name": "Ada" });
        let plan = normalize_plan(&payload);
        assert!(plan.is_empty());
    }

    #[test]
    fn sections_normalize_flat_maps() {
        let sections = normalize_sections(&json!({
            "Breakfast": { "name": "Eggs" },
            "Lunch": [{ "name": "Wrap" }, { "name": "Salad" }]
        }));
        assert_eq!(sections["Breakfast"].len(), 1);
        assert_eq!(sections["Lunch"].len(), 2);
        assert_eq!(sections["Lunch"][0].section.as_deref(), Some("Lunch"));
    }
}
