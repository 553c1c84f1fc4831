use serde_json::Value;

use crate::error::{BoxError, Error, Result};

/// A protobuf message that can render itself in the canonical proto3 JSON
/// format.
///
/// Proto entries are always transmitted as JSON-rendered structures, never as
/// raw binary: the crate parses the rendered text back into a generic value
/// and sends it as the entry's `protoPayload`. Implement this for your
/// message types with whatever codec generates them (e.g. `pbjson` or
/// `prost-wkt` serializers).
pub trait ProtoMessage {
    /// Renders the message to its canonical JSON text form.
    fn to_canonical_json(&self) -> Result<String, BoxError>;
}

pub(crate) fn render_proto(message: &dyn ProtoMessage) -> Result<Value> {
    let text = message.to_canonical_json().map_err(Error::ProtoEncoding)?;
    Ok(serde_json::from_str(&text)?)
}
