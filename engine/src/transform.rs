//! Field transforms: server-computed values attached to a write.
//!
//! A transform names a field and an operation whose result the server
//! computes when it commits the write. Before the server responds, the
//! client needs something to show, so each operation can also produce a
//! local estimate. [`TransformOperation`] is a closed enum: adding a
//! variant is a compile error at every routing site, which is exactly the
//! enforcement wanted when new transform kinds (increments, array
//! union/remove) arrive.

use crate::{FieldPath, FieldValue, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Marker distinguishing server-timestamp estimates from ordinary values.
const TYPE_KEY: &str = "__type__";
const SERVER_TIMESTAMP_TYPE: &str = "serverTimestamp";

/// A per-field operation computed by the server at commit time.
///
/// Variants carry no state; two operations of the same kind are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformOperation {
    /// Replace the field with the server's commit timestamp.
    ServerTimestamp,
}

impl TransformOperation {
    /// Produce the local estimate of this transform's result, used on the
    /// optimistic path before the server has committed the write.
    ///
    /// For [`TransformOperation::ServerTimestamp`] the estimate is a
    /// tagged value carrying `local_write_time` and the field's previous
    /// value, so the host can render an approximate timestamp and later
    /// swap in the server's resolved one.
    pub fn local_estimate(
        &self,
        previous_value: Option<&FieldValue>,
        local_write_time: Timestamp,
    ) -> FieldValue {
        match self {
            TransformOperation::ServerTimestamp => {
                server_timestamp_estimate(local_write_time, previous_value)
            }
        }
    }
}

/// A field path paired with the transform to apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTransform {
    /// The field the transform targets
    pub field: FieldPath,
    /// The operation the server computes for that field
    pub transform: TransformOperation,
}

impl FieldTransform {
    /// Create a field transform.
    pub fn new(field: FieldPath, transform: TransformOperation) -> Self {
        Self { field, transform }
    }
}

/// Build the local stand-in for a server timestamp.
pub fn server_timestamp_estimate(
    local_write_time: Timestamp,
    previous_value: Option<&FieldValue>,
) -> FieldValue {
    let mut estimate = serde_json::Map::new();
    estimate.insert(TYPE_KEY.to_string(), json!(SERVER_TIMESTAMP_TYPE));
    estimate.insert("localWriteTime".to_string(), json!(local_write_time));
    estimate.insert(
        "previousValue".to_string(),
        previous_value.cloned().unwrap_or(Value::Null),
    );
    Value::Object(estimate)
}

/// Whether `value` is a local server-timestamp estimate.
pub fn is_server_timestamp_estimate(value: &FieldValue) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get(TYPE_KEY))
        .and_then(Value::as_str)
        == Some(SERVER_TIMESTAMP_TYPE)
}

/// The local write time recorded in a server-timestamp estimate.
pub fn estimate_local_write_time(value: &FieldValue) -> Option<Timestamp> {
    if !is_server_timestamp_estimate(value) {
        return None;
    }
    value
        .get("localWriteTime")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
}

/// The previous field value recorded in a server-timestamp estimate.
/// `None` if the field had no value before the transform.
pub fn estimate_previous_value(value: &FieldValue) -> Option<&FieldValue> {
    if !is_server_timestamp_estimate(value) {
        return None;
    }
    match value.get("previousValue") {
        Some(Value::Null) | None => None,
        Some(previous) => Some(previous),
    }
}
