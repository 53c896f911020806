//! Typed view of the `bootstrap` payload served by the backend.
//!
//! Every field the renderer treats as optional is an `Option` (or defaults to
//! empty) so a sparse payload deserializes cleanly; fields the renderer does
//! not know about are ignored.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// Response envelope of `GET <base>/bootstrap.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapEnvelope {
    pub bootstrap: Option<Bootstrap>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Bootstrap {
    pub html_lang: String,
    pub html_classes: Option<String>,
    pub csrf_token: Option<String>,
    /// Usually an array of ids, but scalars are accepted as sent.
    pub theme_ids: Option<Value>,
    /// Kept in document order; `serde_json` is built with `preserve_order`.
    pub setup_data: Map<String, Value>,
    pub stylesheets: Option<Vec<Stylesheet>>,
    pub plugin_js: Vec<String>,
    pub extra_locales: Option<Vec<String>>,
    pub locale_script: Option<String>,
    pub theme_html: ThemeHtml,
    pub html: HtmlSnippets,
    /// `None` only when the field is missing; an explicit `null` is kept.
    #[serde(deserialize_with = "present_value")]
    pub preloaded: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stylesheet {
    pub href: String,
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub theme_id: Option<i64>,
}

/// Pre-rendered theme markup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeHtml {
    pub translations: Option<String>,
    pub js: Option<String>,
    pub head_tag: Option<String>,
    pub header: Option<String>,
    pub body_tag: Option<String>,
}

/// Pre-rendered site customization markup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlSnippets {
    pub before_head_close: Option<String>,
    pub before_script_load: Option<String>,
    pub header: Option<String>,
    pub before_body_close: Option<String>,
}

impl Bootstrap {
    /// Stylesheets in document order; absent means none.
    pub fn stylesheets(&self) -> impl Iterator<Item = &Stylesheet> {
        self.stylesheets.iter().flatten()
    }

    pub fn extra_locales(&self) -> impl Iterator<Item = &str> {
        self.extra_locales.iter().flatten().map(String::as_str)
    }

    /// `setup_data` entries that produce an attribute, as
    /// `(attribute suffix, attribute value before encoding)`.
    pub fn setup_attributes(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.setup_data
            .iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(key, value)| (key.replace('_', "-"), stringify(value)))
    }

    /// Content of the theme-ids meta tag, when `theme_ids` is truthy.
    /// Arrays are joined with `,`; `null` elements become empty.
    #[must_use]
    pub fn theme_ids_text(&self) -> Option<String> {
        let theme_ids = self.theme_ids.as_ref().filter(|value| is_truthy(value))?;
        let text = match theme_ids {
            Value::Array(ids) => ids
                .iter()
                .map(|id| match id {
                    Value::Null => String::new(),
                    other => stringify(other),
                })
                .collect::<Vec<_>>()
                .join(","),
            other => stringify(other),
        };
        Some(text)
    }
}

/// `None`, empty strings, `false`, zero, and `null` count as unset.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[must_use]
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// Strings are taken verbatim, numbers use their shortest form (`1.0` is
/// `1`), everything else becomes compact JSON text.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number_text(number),
        other => other.to_string(),
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(value)
            if number.is_f64() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER =>
        {
            (value as i64).to_string()
        }
        _ => number.to_string(),
    }
}
