use crate::statics;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};

/// Represents a value in a record document (JSON5 subset: no floats).
/// Objects keep insertion order so documents round-trip with stable structure.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
    Array(Vec<DocValue>),
    Object(IndexMap<String, DocValue>),
}

impl DocValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, DocValue>> {
        match self {
            DocValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DocValue::Null => "null",
            DocValue::Bool(_) => "bool",
            DocValue::Integer(_) => "integer",
            DocValue::String(_) => "string",
            DocValue::Array(_) => "array",
            DocValue::Object(_) => "object",
        }
    }

    pub fn parse_json5(text: &str) -> anyhow::Result<DocValue> {
        Ok(json5::from_str::<DocValue>(text)?)
    }

    /// 4-space indented JSON5 with quoted keys and a trailing newline.
    pub fn to_json5_pretty(&self) -> String {
        let mut out = String::new();
        self.write_json5(&mut out, 0);
        out.push_str(statics::NL_LF);
        out
    }

    fn write_json5(&self, out: &mut String, indent: usize) {
        match self {
            DocValue::Null => out.push_str("null"),
            DocValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            DocValue::Integer(v) => out.push_str(&v.to_string()),
            DocValue::String(s) => write_escaped_string(out, s),
            DocValue::Array(values) => {
                out.push('[');
                if !values.is_empty() {
                    out.push_str(statics::NL_LF);
                }
                for (i, v) in values.iter().enumerate() {
                    out.push_str(&" ".repeat(indent + 4));
                    v.write_json5(out, indent + 4);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    out.push_str(statics::NL_LF);
                }
                if !values.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            DocValue::Object(map) => {
                out.push('{');
                if !map.is_empty() {
                    out.push_str(statics::NL_LF);
                }
                for (i, (k, v)) in map.iter().enumerate() {
                    out.push_str(&" ".repeat(indent + 4));
                    write_escaped_string(out, k);
                    out.push_str(": ");
                    v.write_json5(out, indent + 4);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    out.push_str(statics::NL_LF);
                }
                if !map.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04X}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl<'de> Deserialize<'de> for DocValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = DocValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON5 value without fractional numbers")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(DocValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(DocValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(DocValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(DocValue::Integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(DocValue::Integer)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                // Some parsers report every number as f64; accept the integral ones.
                if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Ok(DocValue::Integer(v as i64))
                } else {
                    Err(E::invalid_value(de::Unexpected::Float(v), &self))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DocValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(DocValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<DocValue>()? {
                    values.push(value);
                }
                Ok(DocValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, DocValue>()? {
                    values.insert(key, value);
                }
                Ok(DocValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::DocValue;
    use indexmap::IndexMap;

    #[test]
    fn parse_json5_accepts_unquoted_keys_and_trailing_commas() {
        let v = DocValue::parse_json5("{ a: 1, b: ['x', 'y',], }").unwrap();
        assert_eq!(v.get("a"), Some(&DocValue::Integer(1)));
        let b = v.get("b").and_then(DocValue::as_array).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b[1].as_str(), Some("y"));
    }

    #[test]
    fn parse_json5_rejects_fractional_numbers() {
        assert!(DocValue::parse_json5("{ a: 1.5 }").is_err());
    }

    #[test]
    fn pretty_output_indents_and_quotes_keys() {
        let mut map = IndexMap::new();
        map.insert("k".to_string(), DocValue::String("v".to_string()));
        map.insert(
            "list".to_string(),
            DocValue::Array(vec![DocValue::Integer(1)]),
        );
        let v = DocValue::Object(map);
        assert_eq!(
            v.to_json5_pretty(),
            "{\n    \"k\": \"v\",\n    \"list\": [\n        1\n    ]\n}\n"
        );
    }

    #[test]
    fn strings_escape_quotes_and_controls() {
        let v = DocValue::String("a\"b\\c\n\u{1}".to_string());
        assert_eq!(v.to_json5_pretty(), "\"a\\\"b\\\\c\\n\\u0001\"\n");
    }
}
