//! POI normalization
//!
//! Folds one untrusted POI record and its geocode result into the canonical
//! `Poi`. Every field has its own fallback, so the function is total.

use serde::{Deserialize, Serialize};

use super::untrusted::RawPoi;
use crate::geocode::{Geocode, Location};

pub const DEFAULT_SUMMARY: &str = "No summary provided.";
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_MAX_HIGHLIGHTS: usize = 3;
pub const DEFAULT_MAX_TAGS: usize = 6;

/// Whether a POI got a map pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodeStatus {
    Ok,
    Unavailable,
}

/// Canonical point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub category: String,
    pub area: String,
    pub best_time: String,
    pub highlights: Vec<String>,
    pub tags: Vec<String>,
    pub address: String,
    pub location: Option<Location>,
    pub geocode_status: GeocodeStatus,
}

/// Plan-level values a POI falls back on
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDefaults {
    pub best_time_to_visit: Option<String>,
    pub max_highlights: usize,
    pub max_tags: usize,
}

impl PoiDefaults {
    pub fn new(best_time_to_visit: Option<String>) -> Self {
        Self {
            best_time_to_visit,
            max_highlights: DEFAULT_MAX_HIGHLIGHTS,
            max_tags: DEFAULT_MAX_TAGS,
        }
    }

    pub fn with_limits(mut self, max_highlights: usize, max_tags: usize) -> Self {
        self.max_highlights = max_highlights;
        self.max_tags = max_tags;
        self
    }
}

/// Build the canonical POI at position `ordinal` (0-based)
pub fn normalize_poi(raw: &RawPoi, geocode: Option<&Geocode>, defaults: &PoiDefaults, ordinal: usize) -> Poi {
    let number = ordinal + 1;

    Poi {
        id: format!("poi-{}", number),
        name: raw.name().unwrap_or_else(|| format!("Point {}", number)),
        summary: raw.summary().unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        category: raw.category().unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        area: raw.area().unwrap_or_default(),
        best_time: raw
            .best_time()
            .or_else(|| defaults.best_time_to_visit.clone())
            .unwrap_or_default(),
        highlights: raw.highlights(defaults.max_highlights),
        tags: raw.tags(defaults.max_tags),
        address: raw
            .address()
            .or_else(|| geocode.map(|g| g.label.clone()))
            .unwrap_or_default(),
        location: geocode.map(Geocode::location),
        geocode_status: if geocode.is_some() {
            GeocodeStatus::Ok
        } else {
            GeocodeStatus::Unavailable
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn harpa() -> Geocode {
        Geocode {
            lat: 64.1504,
            lng: -21.9325,
            label: "Harpa, Austurbakki 2, Reykjavik".to_string(),
        }
    }

    #[test]
    fn test_full_record_with_geocode() {
        let raw = RawPoi::new(json!({
            "name": "Harpa",
            "summary": "Glass concert hall on the harbour.",
            "category": "architecture",
            "highlights": ["facade", "concerts", "harbour views", "cafe"],
            "bestTime": "Evening",
            "tags": ["music", "design"],
            "area": "Old Harbour"
        }));
        let poi = normalize_poi(&raw, Some(&harpa()), &PoiDefaults::new(Some("Summer".to_string())), 0);

        assert_eq!(poi.id, "poi-1");
        assert_eq!(poi.name, "Harpa");
        assert_eq!(poi.category, "architecture");
        assert_eq!(poi.highlights, vec!["facade", "concerts", "harbour views"]);
        assert_eq!(poi.best_time, "Evening");
        assert_eq!(poi.address, "Harpa, Austurbakki 2, Reykjavik");
        assert_eq!(
            poi.location,
            Some(Location {
                lat: 64.1504,
                lng: -21.9325
            })
        );
        assert_eq!(poi.geocode_status, GeocodeStatus::Ok);
    }

    #[test]
    fn test_empty_record_fallbacks() {
        let poi = normalize_poi(&RawPoi::new(json!({})), None, &PoiDefaults::new(None), 4);

        assert_eq!(poi.id, "poi-5");
        assert_eq!(poi.name, "Point 5");
        assert_eq!(poi.summary, DEFAULT_SUMMARY);
        assert_eq!(poi.category, "general");
        assert_eq!(poi.area, "");
        assert_eq!(poi.best_time, "");
        assert!(poi.highlights.is_empty());
        assert!(poi.tags.is_empty());
        assert_eq!(poi.address, "");
        assert!(poi.location.is_none());
        assert_eq!(poi.geocode_status, GeocodeStatus::Unavailable);
    }

    #[test]
    fn test_best_time_falls_back_to_plan() {
        let poi = normalize_poi(
            &RawPoi::new(json!({ "name": "Sun Voyager" })),
            None,
            &PoiDefaults::new(Some("June to August".to_string())),
            0,
        );
        assert_eq!(poi.best_time, "June to August");
    }

    #[test]
    fn test_upstream_address_wins_over_geocode_label() {
        let raw = RawPoi::new(json!({ "name": "Harpa", "address": "Austurbakki 2" }));
        let poi = normalize_poi(&raw, Some(&harpa()), &PoiDefaults::new(None), 0);
        assert_eq!(poi.address, "Austurbakki 2");
    }

    #[test]
    fn test_wrong_types() {
        let raw = RawPoi::new(json!({
            "name": ["not", "a", "string"],
            "summary": 7,
            "highlights": "a single string",
            "tags": {"a": 1},
            "category": null
        }));
        let poi = normalize_poi(&raw, None, &PoiDefaults::new(None), 1);

        assert_eq!(poi.name, "Point 2");
        assert_eq!(poi.summary, "7");
        assert!(poi.highlights.is_empty());
        assert!(poi.tags.is_empty());
        assert_eq!(poi.category, "general");
    }

    #[test]
    fn test_text_kept_as_written() {
        let raw = RawPoi::new(json!({
            "name": "  Perlan",
            "summary": "Glass dome on a hill. ",
            "area": "   ",
            "highlights": [null, " planetarium "]
        }));
        let poi = normalize_poi(&raw, None, &PoiDefaults::new(None), 0);

        assert_eq!(poi.name, "  Perlan");
        assert_eq!(poi.summary, "Glass dome on a hill. ");
        assert_eq!(poi.area, "");
        assert_eq!(poi.highlights, vec!["null", " planetarium "]);
    }

    #[test]
    fn test_tags_truncated_to_six() {
        let raw = RawPoi::new(json!({ "tags": ["a", "b", "c", "d", "e", "f", "g", "h"] }));
        let poi = normalize_poi(&raw, None, &PoiDefaults::new(None), 0);
        assert_eq!(poi.tags.len(), 6);
    }

    #[test]
    fn test_serialized_shape() {
        let poi = normalize_poi(&RawPoi::new(json!({ "name": "Perlan" })), None, &PoiDefaults::new(None), 2);
        let value = serde_json::to_value(&poi).unwrap();

        assert_eq!(value["id"], "poi-3");
        assert_eq!(value["geocodeStatus"], "unavailable");
        assert_eq!(value["bestTime"], "");
        assert!(value["location"].is_null());
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            any::<f64>().prop_map(|f| serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)),
            ".{0,12}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..12).prop_map(Value::Array),
                prop::collection::hash_map("[a-zA-Z]{1,10}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn arb_poi() -> impl Strategy<Value = Value> {
        let fields = [
            "name",
            "summary",
            "category",
            "highlights",
            "bestTime",
            "tags",
            "area",
            "address",
        ];
        prop::collection::vec(proptest::option::of(arb_json()), fields.len()).prop_map(move |values| {
            let mut map = serde_json::Map::new();
            for (key, value) in fields.iter().zip(values) {
                if let Some(v) = value {
                    map.insert(key.to_string(), v);
                }
            }
            Value::Object(map)
        })
    }

    proptest! {
        #[test]
        fn prop_normalize_is_total(raw in prop_oneof![arb_json(), arb_poi()], ordinal in 0usize..10, pinned in any::<bool>()) {
            let geocode = pinned.then(harpa);
            let poi = normalize_poi(&RawPoi::new(raw), geocode.as_ref(), &PoiDefaults::new(None), ordinal);

            prop_assert_eq!(poi.id, format!("poi-{}", ordinal + 1));
            prop_assert!(!poi.name.is_empty());
            prop_assert!(poi.highlights.len() <= DEFAULT_MAX_HIGHLIGHTS);
            prop_assert!(poi.tags.len() <= DEFAULT_MAX_TAGS);
            prop_assert_eq!(poi.geocode_status == GeocodeStatus::Ok, poi.location.is_some());
        }

        #[test]
        fn prop_normalize_is_idempotent(raw in arb_poi(), ordinal in 0usize..10) {
            let raw = RawPoi::new(raw);
            let defaults = PoiDefaults::new(Some("Spring".to_string()));
            prop_assert_eq!(
                normalize_poi(&raw, None, &defaults, ordinal),
                normalize_poi(&raw, None, &defaults, ordinal)
            );
        }
    }
}
