//! Slide scope resolution
//!
//! Scopes arrive as loose JSON (`{"slides": {"list": [3]}}` or
//! `{"slides": {"from": 2, "to": 4}}`). Anything that cannot be read as a
//! slide restriction is treated as unrestricted rather than rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Where an action may apply. The default scope covers every slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides: Option<SlideSelector>,
}

/// Slide restriction after integer coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlideSelector {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

impl Scope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn slides(list: impl IntoIterator<Item = i64>) -> Self {
        Self {
            slides: Some(SlideSelector {
                list: list.into_iter().collect(),
                ..Default::default()
            }),
        }
    }

    pub fn range(from: Option<i64>, to: Option<i64>) -> Self {
        Self {
            slides: Some(SlideSelector {
                list: Vec::new(),
                from,
                to,
            }),
        }
    }

    /// Build a scope from an arbitrary JSON value, never failing.
    pub fn from_value(value: &Value) -> Self {
        let Some(slides) = value.get("slides").and_then(Value::as_object) else {
            return Self::all();
        };

        let list = slides
            .get("list")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(coerce_int).collect())
            .unwrap_or_default();

        Self {
            slides: Some(SlideSelector {
                list,
                from: slides.get("from").and_then(coerce_int),
                to: slides.get("to").and_then(coerce_int),
            }),
        }
    }

    /// Whether this scope includes the one-based `slide_no`.
    ///
    /// An explicit list decides alone. Otherwise a range applies where a
    /// missing `from` is 1 and a missing `to` is the slide being tested, so
    /// `{from: 5}` matches every slide from 5 onwards.
    pub fn applies(&self, slide_no: u32) -> bool {
        let Some(selector) = &self.slides else {
            return true;
        };
        let slide_no = i64::from(slide_no);

        if !selector.list.is_empty() {
            return selector.list.contains(&slide_no);
        }

        if selector.from.is_none() && selector.to.is_none() {
            return true;
        }

        let start = selector.from.unwrap_or(1);
        let end = selector.to.unwrap_or(slide_no);
        start <= slide_no && slide_no <= end
    }

    pub fn is_unrestricted(&self) -> bool {
        match &self.slides {
            None => true,
            Some(s) => s.list.is_empty() && s.from.is_none() && s.to.is_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Integer coercion for scope entries: integers, truncated floats,
/// booleans and trimmed integer strings.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
