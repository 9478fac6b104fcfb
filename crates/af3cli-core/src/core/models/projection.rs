use serde_json::Value;

/// Projects a model object into its JSON representation in the input dialect.
///
/// Objects are emitted with keys in insertion order.
pub trait Projection {
    fn to_value(&self) -> Value;
}
