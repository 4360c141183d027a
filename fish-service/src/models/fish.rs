use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use service_core::error::AppError;

pub const ID_FIELD: &str = "_id";

/// A fish recipe as stored in the collection. The service never looks inside
/// beyond `_id`; every other field is passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Fish(Document);

impl Fish {
    pub fn id(&self) -> Option<ObjectId> {
        self.0.get_object_id(ID_FIELD).ok()
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }
}

impl From<Document> for Fish {
    fn from(doc: Document) -> Self {
        Self(doc)
    }
}

/// Top-level field order follows the stored document. ObjectIds become their
/// 24-char hex form; everything else uses relaxed Extended JSON.
impl Serialize for Fish {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, &project(value.clone()))?;
        }
        map.end()
    }
}

fn project(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => {
            Value::Object(doc.into_iter().map(|(k, v)| (k, project(v))).collect())
        }
        Bson::Array(items) => Value::Array(items.into_iter().map(project).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Parses the `{id}` path segment. Anything other than 24 hex characters is a
/// bad request.
pub fn parse_fish_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))
}
