//! YAML (and JSON) decoding.

use datatree_core::Value;
use serde::Deserialize;
use serde::de::Error as _;

/// Decode a YAML stream.
///
/// A stream holding exactly one document decodes to that document; any other
/// number of documents (including none) decodes to the sequence of documents.
/// Merge keys are applied. Application-specific tags such as `!custom` are
/// rejected.
pub fn decode(text: &str) -> Result<Value, serde_yaml::Error> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let mut value = serde_yaml::Value::deserialize(document)?;
        value.apply_merge()?;
        documents.push(plain(value)?);
    }
    if documents.len() == 1 {
        Ok(documents.swap_remove(0))
    } else {
        Ok(Value::Sequence(documents))
    }
}

fn plain(value: serde_yaml::Value) -> Result<Value, serde_yaml::Error> {
    let value = match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Integer(u.into())
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(plain).collect::<Result<_, _>>()?)
        }
        serde_yaml::Value::Mapping(entries) => Value::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| Ok((plain(key)?, plain(value)?)))
                .collect::<Result<_, serde_yaml::Error>>()?,
        ),
        serde_yaml::Value::Tagged(tagged) => {
            return Err(serde_yaml::Error::custom(format!(
                "could not determine a constructor for the tag {}",
                tagged.tag
            )));
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_document() {
        let value = decode("a: 1\nb:\n  c: 2\n  d: 3\n").unwrap();
        assert_eq!(
            value,
            Value::mapping([
                ("a", Value::from(1)),
                ("b", Value::mapping([("c", Value::from(2)), ("d", Value::from(3))])),
            ])
        );
    }

    #[test]
    fn test_multi_document() {
        let text = "---\nname: Pauraegen\n---\nname: Paurnen\n";
        let value = decode(text).unwrap();
        assert_eq!(
            value,
            Value::Sequence(vec![
                Value::mapping([("name", Value::from("Pauraegen"))]),
                Value::mapping([("name", Value::from("Paurnen"))]),
            ])
        );
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(decode("").unwrap(), Value::Sequence(Vec::new()));
    }

    #[test]
    fn test_json_is_yaml() {
        let value = decode(r#"{"a": 1, "b": {"c": 2.5, "d": true}}"#).unwrap();
        assert_eq!(value.get("a"), Some(&Value::from(1)));
        assert_eq!(value.get("b").and_then(|b| b.get("c")), Some(&Value::from(2.5)));
        assert_eq!(value.get("b").and_then(|b| b.get("d")), Some(&Value::from(true)));
    }

    #[test]
    fn test_merge_keys() {
        let text = "base: &base\n  x: 1\nderived:\n  <<: *base\n  y: 2\n";
        let value = decode(text).unwrap();
        let derived = value.get("derived").unwrap();
        assert_eq!(derived.get("x"), Some(&Value::from(1)));
        assert_eq!(derived.get("y"), Some(&Value::from(2)));
    }

    #[test]
    fn test_exponent_floats_keep_exponent_text() {
        let value = decode("big: 1e20\nsmall: 1.5e-5\nplain: 2.0\n").unwrap();
        let text = |key: &str| value.get(key).and_then(Value::as_text);
        assert_eq!(text("big").as_deref(), Some("1e+20"));
        assert_eq!(text("small").as_deref(), Some("1.5e-05"));
        assert_eq!(text("plain").as_deref(), Some("2.0"));
    }

    #[test]
    fn test_custom_tags_rejected() {
        let err = decode("item: !custom value\n").unwrap_err();
        assert!(err.to_string().contains("!custom"), "{err}");
        assert!(decode("- 1\n- !point {x: 1, y: 2}\n").is_err());
        assert!(decode("!doc\nname: x\n").is_err());
    }

    #[test]
    fn test_malformed_document() {
        assert!(decode("a: [1, 2\n").is_err());
    }
}
