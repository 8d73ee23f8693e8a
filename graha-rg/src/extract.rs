//! Resilient fact extraction
//!
//! **[RG-EXT-010]** Provider payload shapes are not contractually stable:
//! key names, nesting, and value types drift across upstream versions. Every
//! read in the render path therefore goes through this module, which tries an
//! ordered list of candidate key paths, coerces the first present-and-non-null
//! value to the caller's expected type, and otherwise returns the caller's
//! default. No accessor here panics or returns an error; layout depends on
//! that totality to stay deterministic.

use crate::services::aggregator::FactBag;
use serde_json::Value;

/// Read-only extraction view over a fact bag
#[derive(Clone, Copy)]
pub struct Extract<'a> {
    bag: &'a FactBag,
}

impl<'a> Extract<'a> {
    pub fn new(bag: &'a FactBag) -> Self {
        Self { bag }
    }

    /// Resolve the first candidate path that yields a present, non-null value
    ///
    /// Candidate paths accept both `&str` literals and `format!`-built
    /// strings.
    pub fn value<S: AsRef<str>>(&self, fact: &str, paths: &[S]) -> Option<&'a Value> {
        let payload = self.bag.payload(fact)?;
        for path in paths {
            if let Some(v) = resolve_path(payload, path.as_ref()) {
                if !v.is_null() {
                    return Some(v);
                }
            }
        }
        None
    }

    /// Resolve the first candidate that both exists and coerces to the
    /// caller's expected type; candidates of the wrong shape fall through
    fn first_coerced<S: AsRef<str>, T>(
        &self,
        fact: &str,
        paths: &[S],
        coerce: fn(&Value) -> Option<T>,
    ) -> Option<T> {
        let payload = self.bag.payload(fact)?;
        for path in paths {
            if let Some(v) = resolve_path(payload, path.as_ref()) {
                if let Some(coerced) = coerce(v) {
                    return Some(coerced);
                }
            }
        }
        None
    }

    /// Extract a display string, coercing numbers and booleans
    pub fn text<S: AsRef<str>>(&self, fact: &str, paths: &[S], default: &str) -> String {
        self.first_coerced(fact, paths, value_as_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// Extract a number, coercing numeric strings
    pub fn number<S: AsRef<str>>(&self, fact: &str, paths: &[S], default: f64) -> f64 {
        self.first_coerced(fact, paths, value_as_number)
            .unwrap_or(default)
    }

    /// Extract a number; when absent, derive it as the sum of the numeric
    /// members found at `sum_path` (an array or object of contributions)
    ///
    /// **[RG-EXT-020]** Some upstream versions omit precomputed totals and
    /// only ship the per-item breakdown.
    pub fn number_or_sum<S: AsRef<str>>(
        &self,
        fact: &str,
        paths: &[S],
        sum_path: &str,
        item_key: Option<&str>,
        default: f64,
    ) -> f64 {
        if let Some(n) = self.first_coerced(fact, paths, value_as_number) {
            return n;
        }
        self.sum_at(fact, sum_path, item_key).unwrap_or(default)
    }

    /// Extract an integer (truncating fractional upstream values)
    pub fn integer<S: AsRef<str>>(&self, fact: &str, paths: &[S], default: i64) -> i64 {
        self.first_coerced(fact, paths, value_as_number)
            .map(|n| n as i64)
            .unwrap_or(default)
    }

    /// Extract a boolean, accepting 0/1 and "true"/"yes"/"false"/"no"
    pub fn boolean<S: AsRef<str>>(&self, fact: &str, paths: &[S], default: bool) -> bool {
        self.first_coerced(fact, paths, value_as_bool)
            .unwrap_or(default)
    }

    /// Extract a list; candidates that are not arrays fall through, and a
    /// missing fact yields an empty list
    pub fn list<S: AsRef<str>>(&self, fact: &str, paths: &[S]) -> Vec<&'a Value> {
        let Some(payload) = self.bag.payload(fact) else {
            return Vec::new();
        };
        for path in paths {
            if let Some(items) = resolve_path(payload, path.as_ref()).and_then(|v| v.as_array()) {
                return items.iter().collect();
            }
        }
        Vec::new()
    }

    /// Sum numeric members at a path. Arrays sum their elements, objects sum
    /// their values; `item_key` descends one level into each member first.
    fn sum_at(&self, fact: &str, path: &str, item_key: Option<&str>) -> Option<f64> {
        let container = self.value(fact, &[path])?;

        let member_value = |member: &Value| -> Option<f64> {
            let leaf = match item_key {
                Some(key) => member.get(key)?,
                None => member,
            };
            value_as_number(leaf)
        };

        match container {
            Value::Array(items) => Some(items.iter().filter_map(member_value).sum()),
            Value::Object(map) => Some(map.values().filter_map(member_value).sum()),
            _ => None,
        }
    }
}

/// First candidate field of a free-standing value, as display text
///
/// Sections use this for the elements returned by `list`, which are no
/// longer attached to a fact bag.
pub fn field_text(item: &Value, paths: &[&str], default: &str) -> String {
    for path in paths {
        if let Some(s) = resolve_path(item, path).and_then(value_as_string) {
            return s;
        }
    }
    default.to_string()
}

/// First candidate field of a free-standing value, as a number
pub fn field_number(item: &Value, paths: &[&str], default: f64) -> f64 {
    for path in paths {
        if let Some(n) = resolve_path(item, path).and_then(value_as_number) {
            return n;
        }
    }
    default
}

/// Resolve a dotted path (`"a.b.0.c"`) through nested objects and arrays
///
/// The empty path resolves to the payload root.
fn resolve_path<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            // Render integral floats without the trailing ".0"
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                Some(n.to_string())
            }
        }
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        _ => None,
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fact_client::FactResult;
    use serde_json::json;

    fn bag_with(fact: &str, payload: Value) -> FactBag {
        FactBag::from_results(vec![FactResult::ok(fact, payload)])
    }

    #[test]
    fn test_candidate_path_order() {
        let bag = bag_with("astro", json!({"rasi": "Mesha", "sign": "Aries"}));
        let x = Extract::new(&bag);

        assert_eq!(x.text("astro", &["rasi", "sign"], "N/A"), "Mesha");
        assert_eq!(x.text("astro", &["moon_sign", "sign"], "N/A"), "Aries");
    }

    #[test]
    fn test_missing_fact_yields_default() {
        let bag = FactBag::from_results(vec![FactResult::failed("astro")]);
        let x = Extract::new(&bag);

        assert_eq!(x.text("astro", &["rasi"], "N/A"), "N/A");
        assert_eq!(x.number("astro", &["points"], 0.0), 0.0);
        assert!(x.list("astro", &["items"]).is_empty());
    }

    #[test]
    fn test_unknown_fact_yields_default() {
        let bag = FactBag::default();
        let x = Extract::new(&bag);

        assert_eq!(x.text("nope", &["a"], "N/A"), "N/A");
        assert!(!x.boolean("nope", &["flag"], false));
    }

    #[test]
    fn test_nested_and_indexed_paths() {
        let bag = bag_with(
            "chart",
            json!({"houses": [{"sign": 1, "planets": ["Sun", "Mercury"]}]}),
        );
        let x = Extract::new(&bag);

        assert_eq!(x.integer("chart", &["houses.0.sign"], 0), 1);
        assert_eq!(x.text("chart", &["houses.0.planets.1"], ""), "Mercury");
        assert_eq!(x.integer("chart", &["houses.5.sign"], -1), -1);
    }

    #[test]
    fn test_null_value_falls_through() {
        let bag = bag_with("astro", json!({"nakshatra": null, "naksatra": "Rohini"}));
        let x = Extract::new(&bag);

        assert_eq!(x.text("astro", &["nakshatra", "naksatra"], "N/A"), "Rohini");
    }

    #[test]
    fn test_numeric_string_coercion() {
        let bag = bag_with("score", json!({"points": "7.5", "max": 8}));
        let x = Extract::new(&bag);

        assert!((x.number("score", &["points"], 0.0) - 7.5).abs() < 1e-9);
        assert_eq!(x.text("score", &["max"], ""), "8");
    }

    #[test]
    fn test_bool_coercion() {
        let bag = bag_with(
            "manglik",
            json!({"a": true, "b": 1, "c": "yes", "d": "No", "e": 0}),
        );
        let x = Extract::new(&bag);

        assert!(x.boolean("manglik", &["a"], false));
        assert!(x.boolean("manglik", &["b"], false));
        assert!(x.boolean("manglik", &["c"], false));
        assert!(!x.boolean("manglik", &["d"], true));
        assert!(!x.boolean("manglik", &["e"], true));
    }

    #[test]
    fn test_sum_fallback_over_array() {
        let bag = bag_with(
            "dasha",
            json!({"periods": [{"years": 6}, {"years": 10}, {"years": 7}]}),
        );
        let x = Extract::new(&bag);

        let total = x.number_or_sum("dasha", &["total_years"], "periods", Some("years"), 0.0);
        assert!((total - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_sum_fallback_over_object() {
        let bag = bag_with(
            "koot",
            json!({"dina": {"points": 3}, "gana": {"points": 5}, "yoni": {"points": 2}}),
        );
        let x = Extract::new(&bag);

        let total = x.number_or_sum("koot", &["total.points"], "", Some("points"), 0.0);
        assert!((total - 10.0).abs() < 1e-9, "got {}", total);
    }

    #[test]
    fn test_present_total_preferred_over_sum() {
        let bag = bag_with("koot", json!({"total": 20, "rows": [{"p": 1}, {"p": 2}]}));
        let x = Extract::new(&bag);

        let total = x.number_or_sum("koot", &["total"], "rows", Some("p"), 0.0);
        assert!((total - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_type_candidate_falls_through() {
        let bag = bag_with("astro", json!({"points": {"nested": true}, "score": 4}));
        let x = Extract::new(&bag);

        assert!((x.number("astro", &["points", "score"], 0.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_list_skips_non_array_candidates() {
        let bag = bag_with("chart", json!({"houses": {"a": 1}, "planets": [1, 2, 3]}));
        let x = Extract::new(&bag);

        assert_eq!(x.list("chart", &["houses", "planets"]).len(), 3);
    }

    #[test]
    fn test_wrong_shape_never_panics() {
        // Scalar where object expected, object where array expected
        let bag = bag_with("odd", json!("just a string"));
        let x = Extract::new(&bag);

        assert_eq!(x.text("odd", &["a.b.c"], "N/A"), "N/A");
        assert!(x.list("odd", &["a"]).is_empty());
        assert_eq!(x.number_or_sum("odd", &["t"], "items", None, -1.0), -1.0);
    }
}
