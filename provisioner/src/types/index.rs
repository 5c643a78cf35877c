use mongodb::bson::{Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Direction (or special type) of a single index key.
///
/// Plan files accept `1` / `-1` as well as `asc` / `desc`. Any other string is kept
/// as-is so that special index types reported by the server (`hashed`, `text`, ...)
/// can still be compared and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDirection", into = "RawDirection")]
pub enum IndexDirection {
    Ascending,
    Descending,
    Special(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDirection {
    Numeric(i64),
    Named(String),
}

impl TryFrom<RawDirection> for IndexDirection {
    type Error = String;

    fn try_from(raw: RawDirection) -> Result<Self, Self::Error> {
        match raw {
            RawDirection::Numeric(1) => Ok(Self::Ascending),
            RawDirection::Numeric(-1) => Ok(Self::Descending),
            RawDirection::Numeric(other) => Err(format!("index direction must be 1 or -1, got {}", other)),
            RawDirection::Named(name) => match name.to_ascii_lowercase().as_str() {
                "asc" | "ascending" => Ok(Self::Ascending),
                "desc" | "descending" => Ok(Self::Descending),
                _ => Ok(Self::Special(name)),
            },
        }
    }
}

impl From<IndexDirection> for RawDirection {
    fn from(direction: IndexDirection) -> Self {
        match direction {
            IndexDirection::Ascending => RawDirection::Numeric(1),
            IndexDirection::Descending => RawDirection::Numeric(-1),
            IndexDirection::Special(name) => RawDirection::Named(name),
        }
    }
}

impl IndexDirection {
    fn to_bson(&self) -> Bson {
        match self {
            IndexDirection::Ascending => Bson::Int32(1),
            IndexDirection::Descending => Bson::Int32(-1),
            IndexDirection::Special(name) => Bson::String(name.clone()),
        }
    }

    /// The server hands key directions back as int32, int64 or double depending on
    /// who created the index.
    fn from_bson(value: &Bson) -> Option<Self> {
        let numeric = match value {
            Bson::Int32(v) => Some(*v as i64),
            Bson::Int64(v) => Some(*v),
            Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
            Bson::String(name) => return Some(Self::Special(name.clone())),
            _ => None,
        }?;
        match numeric {
            1 => Some(Self::Ascending),
            -1 => Some(Self::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for IndexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexDirection::Ascending => write!(f, "1"),
            IndexDirection::Descending => write!(f, "-1"),
            IndexDirection::Special(name) => write!(f, "\"{}\"", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
    pub field: String,
    pub direction: IndexDirection,
}

impl IndexKey {
    pub fn ascending(field: &str) -> Self {
        Self { field: field.to_string(), direction: IndexDirection::Ascending }
    }

    pub fn descending(field: &str) -> Self {
        Self { field: field.to_string(), direction: IndexDirection::Descending }
    }
}

/// Definition of a secondary index.
///
/// Two specs are equivalent when they have the same ordered keys and the same
/// options. The name is not part of equivalence because the server derives one
/// when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub keys: Vec<IndexKey>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after_secs: Option<u64>,
}

impl IndexSpec {
    pub fn new(keys: Vec<IndexKey>) -> Self {
        Self { name: None, keys, unique: false, expire_after_secs: None }
    }

    pub fn with_ttl(mut self, expire_after_secs: u64) -> Self {
        self.expire_after_secs = Some(expire_after_secs);
        self
    }

    pub fn same_keys(&self, other: &IndexSpec) -> bool {
        self.keys == other.keys
    }

    pub fn is_equivalent(&self, other: &IndexSpec) -> bool {
        self.same_keys(other) && self.unique == other.unique && self.expire_after_secs == other.expire_after_secs
    }

    /// Key pattern rendered the way the mongo shell prints it, e.g. `{ userId: 1, createdAt: -1 }`.
    pub fn key_signature(&self) -> String {
        let keys = self.keys.iter().map(|k| format!("{}: {}", k.field, k.direction)).collect::<Vec<_>>();
        format!("{{ {} }}", keys.join(", "))
    }

    pub fn describe_options(&self) -> String {
        let ttl = match self.expire_after_secs {
            Some(secs) => format!("expireAfterSeconds={}", secs),
            None => "no expiry".to_string(),
        };
        format!("unique={}, {}", self.unique, ttl)
    }

    pub fn key_document(&self) -> Document {
        let mut keys = Document::new();
        for key in &self.keys {
            keys.insert(key.field.clone(), key.direction.to_bson());
        }
        keys
    }

    pub fn to_index_model(&self) -> IndexModel {
        let options = IndexOptions::builder()
            .name(self.name.clone())
            .unique(self.unique.then_some(true))
            .expire_after(self.expire_after_secs.map(Duration::from_secs))
            .build();
        IndexModel::builder().keys(self.key_document()).options(options).build()
    }

    /// Builds a spec from an index reported by `listIndexes`.
    ///
    /// Returns `None` when a key direction cannot be represented.
    pub fn from_index_model(model: &IndexModel) -> Option<Self> {
        let mut keys = Vec::with_capacity(model.keys.len());
        for (field, value) in model.keys.iter() {
            keys.push(IndexKey { field: field.clone(), direction: IndexDirection::from_bson(value)? });
        }
        let options = model.options.as_ref();
        Some(Self {
            name: options.and_then(|o| o.name.clone()),
            keys,
            unique: options.and_then(|o| o.unique).unwrap_or(false),
            expire_after_secs: options.and_then(|o| o.expire_after).map(|d| d.as_secs()),
        })
    }
}
