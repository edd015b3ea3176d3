use crate::error::{Result, TestnetError};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;

/// JSON codec for genesis module sections
///
/// Encoding is compact and field order follows the Rust type, so decoding and
/// re-encoding an unchanged section gives back the same bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn marshal_json<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| TestnetError::Serialization(format!("Failed to encode JSON: {e}")))
    }

    /// Decode one module's section; failures name the module
    pub fn unmarshal_json<T: DeserializeOwned>(&self, module: &str, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| TestnetError::GenesisDecode {
            module: module.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn marshal_raw<T: Serialize>(&self, value: &T) -> Result<Box<RawValue>> {
        serde_json::value::to_raw_value(value)
            .map_err(|e| TestnetError::Serialization(format!("Failed to encode JSON: {e}")))
    }
}

/// A module section held as its top-level fields in document order, each
/// value kept as the exact JSON text it was read from
#[derive(Debug)]
pub struct RawSection {
    fields: Vec<(String, Box<RawValue>)>,
}

impl RawSection {
    pub fn decode(module: &str, bytes: &[u8]) -> Result<RawSection> {
        JsonCodec.unmarshal_json(module, bytes)
    }

    pub fn field(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_ref())
    }

    /// Append `items` to the array stored under `key`, creating it when
    /// absent. Elements already in the array keep their exact bytes.
    ///
    /// The existing value is checked to be an array even when `items` is
    /// empty. Returns whether the section changed.
    pub fn append_to_array(
        &mut self,
        module: &str,
        key: &str,
        items: Vec<Box<RawValue>>,
    ) -> Result<bool> {
        let position = self.fields.iter().position(|(name, _)| name == key);
        let mut array: Vec<Box<RawValue>> = match position {
            Some(index) => serde_json::from_str(self.fields[index].1.get()).map_err(|e| {
                TestnetError::GenesisDecode {
                    module: module.to_string(),
                    reason: format!("{key}: {e}"),
                }
            })?,
            None => Vec::new(),
        };
        if items.is_empty() {
            return Ok(false);
        }

        array.extend(items);
        let value = JsonCodec.marshal_raw(&array)?;
        match position {
            Some(index) => self.fields[index].1 = value,
            None => self.fields.push((key.to_string(), value)),
        }
        Ok(true)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        JsonCodec.marshal_json(self)
    }
}

impl Serialize for RawSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawSection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = RawSection;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RawSection, A::Error> {
                let mut fields = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Box<RawValue>>()? {
                    fields.push((key, value));
                }
                Ok(RawSection { fields })
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Section {
        items: Vec<u64>,
    }

    #[test]
    fn test_decode_error_names_module() {
        let codec = JsonCodec;
        let result: Result<Section> = codec.unmarshal_json("bank", b"{not json");
        match result {
            Err(TestnetError::GenesisDecode { module, .. }) => assert_eq!(module, "bank"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_raw_section_keeps_field_bytes() {
        let input = br#"{"zeta":{"b":1,"a":2},"items":[{"y":1, "x":2}],"big":123456789012345678901234567890}"#;
        let mut section = RawSection::decode("auth", input).unwrap();
        assert_eq!(section.field("big").unwrap().get(), "123456789012345678901234567890");

        assert!(!section.append_to_array("auth", "items", vec![]).unwrap());
        section
            .append_to_array("auth", "items", vec![JsonCodec.marshal_raw(&7u64).unwrap()])
            .unwrap();
        assert_eq!(
            section.encode().unwrap(),
            br#"{"zeta":{"b":1,"a":2},"items":[{"y":1, "x":2},7],"big":123456789012345678901234567890}"#
        );
    }

    #[test]
    fn test_raw_section_rejects_non_array() {
        let mut section = RawSection::decode("bank", br#"{"balances": 5}"#).unwrap();
        let result = section.append_to_array("bank", "balances", vec![]);
        assert!(matches!(result, Err(TestnetError::GenesisDecode { .. })));
        assert!(RawSection::decode("bank", b"[1]").is_err());
    }

    #[test]
    fn test_compact_output() {
        let bytes = JsonCodec.marshal_json(&Section { items: vec![1, 2] }).unwrap();
        assert_eq!(bytes, br#"{"items":[1,2]}"#);
    }
}
