use serde_json::{Map, Value};

/// A single attribute value as carried by the datasets.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Flat, ordered attribute map of one feature.
///
/// Key casing differs between dataset variants (`cat_color` vs `CAT_COLOR`), so
/// lookups are case-insensitive with an exact-case match taking precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pairs: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new(pairs: Vec<(String, AttrValue)>) -> Self {
        Self { pairs }
    }

    /// Converts GeoJSON `properties`. Nulls, arrays and objects are dropped;
    /// booleans become text.
    pub fn from_properties(props: &Map<String, Value>) -> Self {
        let pairs = props
            .iter()
            .filter_map(|(k, v)| {
                let value = match v {
                    Value::String(s) => AttrValue::Text(s.clone()),
                    Value::Number(n) => AttrValue::Number(n.as_f64()?),
                    Value::Bool(b) => AttrValue::Text(b.to_string()),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((k.clone(), value))
            })
            .collect();
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> + '_ {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| self.pairs.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)))
            .map(|(_, v)| v)
    }

    /// Display text for `key`, treating blank text as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        let s = self.get(key)?.to_string();
        if s.trim().is_empty() { None } else { Some(s) }
    }

    /// First non-blank value among `keys`, in order.
    pub fn first_text<S: AsRef<str>>(&self, keys: &[S]) -> Option<String> {
        keys.iter().find_map(|k| self.text(k.as_ref()))
    }
}
