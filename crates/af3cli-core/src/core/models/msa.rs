use super::projection::Projection;
use serde_json::{Map, Value};

/// Where an alignment comes from: embedded A3M text or a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsaSource {
    Inline(String),
    Path(String),
}

impl MsaSource {
    pub fn content(&self) -> &str {
        match self {
            MsaSource::Inline(s) | MsaSource::Path(s) => s,
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self, MsaSource::Path(_))
    }
}

/// Paired and unpaired alignment data attached to a sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Msa {
    pub paired: Option<MsaSource>,
    pub unpaired: Option<MsaSource>,
}

impl Msa {
    pub fn new(paired: Option<MsaSource>, unpaired: Option<MsaSource>) -> Self {
        Self { paired, unpaired }
    }

    pub fn is_empty(&self) -> bool {
        self.paired.is_none() && self.unpaired.is_none()
    }

    /// Inserts the alignment fields into an existing sequence object.
    pub(crate) fn merge_into(&self, map: &mut Map<String, Value>) {
        if let Some(paired) = &self.paired {
            let key = if paired.is_path() { "pairedMsaPath" } else { "pairedMsa" };
            map.insert(key.to_string(), Value::String(paired.content().to_string()));
        }
        if let Some(unpaired) = &self.unpaired {
            let key = if unpaired.is_path() {
                "unpairedMsaPath"
            } else {
                "unpairedMsa"
            };
            map.insert(key.to_string(), Value::String(unpaired.content().to_string()));
        }
    }
}

impl Projection for Msa {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        self.merge_into(&mut map);
        Value::Object(map)
    }
}
