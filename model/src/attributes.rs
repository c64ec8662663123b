use crate::error::{self, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use snafu::ResultExt;
use std::fmt::Debug;

/// The `Attributes` trait is for declarative documents that are persisted as a flat attribute
/// map, the way a state file records a resource:
///
/// ```json
/// {
///   "clustername": "c1",
///   "project": "defaultproject",
///   "sharing": { "all": false, "projects": [ { "name": "qa", "id": "k5wv9m" } ] }
/// }
/// ```
///
/// The traits aggregated by `Attributes` are typical of "plain old data" types. Converting to a
/// map is the `flatten` half of a document's serializer pair and converting from a map is the
/// `expand` half.
pub trait Attributes:
    Serialize + DeserializeOwned + Clone + Debug + Default + Send + Sync + Sized + 'static
{
    /// Convert the document to a serde `Map`.
    fn into_map(self) -> Result<Map<String, Value>> {
        match self.into_value()? {
            Value::Object(map) => Ok(map),
            _ => Err(error::AttributeWrongValueTypeSnafu {}.build().into()),
        }
    }

    /// Convert the document to a serde `Value`.
    fn into_value(self) -> Result<Value> {
        Ok(serde_json::to_value(self).context(error::AttributeSerializationSnafu)?)
    }

    /// Deserialize the document from a serde `Map`.
    fn from_map(map: Map<String, Value>) -> Result<Self> {
        Self::from_value(Value::Object(map))
    }

    /// Deserialize the document from a serde `Value`.
    fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value).context(error::AttributeDeserializationSnafu)?)
    }
}

#[cfg(test)]
mod test {
    use super::Attributes;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
    struct Doc {
        clustername: String,
        #[serde(default)]
        all: bool,
    }

    impl Attributes for Doc {}

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    struct NotAnObject(Vec<u8>);

    impl Attributes for NotAnObject {}

    #[test]
    fn map_keeps_attribute_names() {
        let map = Doc {
            clustername: "c1".into(),
            all: true,
        }
        .into_map()
        .unwrap();
        assert_eq!(map.get("clustername"), Some(&json!("c1")));
        assert_eq!(map.get("all"), Some(&json!(true)));
    }

    #[test]
    fn missing_optional_attribute_uses_default() {
        let doc = Doc::from_value(json!({ "clustername": "c1" })).unwrap();
        assert!(!doc.all);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(NotAnObject(vec![1]).into_map().is_err());
    }
}
