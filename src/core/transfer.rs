//! Transfer payload carried from the diagram to a drop target, and the
//! native transfer channel it travels through.
//!
//! The payload is validated once, when it is decoded from raw transfer
//! data. Everything past that boundary works with [`TransferPayload`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::diagram::{Color, Entity, EntityId, Point};
use crate::core::error::{DropError, DropResult};

/// Discriminator written into every entity transfer
pub const ENTITY_TRANSFER_TAG: &str = "er-entity";

/// JSON-typed encoding, read first on drop
pub const FORMAT_JSON: &str = "application/json";

/// Plain-text encoding of the same JSON, read as a fallback
pub const FORMAT_TEXT: &str = "text/plain";

/// Formats written on drag start, in the order receivers should read them
pub const TRANSFER_FORMATS: [&str; 2] = [FORMAT_JSON, FORMAT_TEXT];

/// Entity data carried through a drag
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    pub entity_id: EntityId,
    pub name: String,
    pub fields: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Tagged wire form of every transfer the app understands
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransferData {
    #[serde(rename = "er-entity")]
    ErEntity(TransferPayload),
}

impl TransferPayload {
    /// Snapshot an entity; fields are copied verbatim.
    pub fn from_entity(entity: &Entity, now: DateTime<Utc>) -> Self {
        Self {
            entity_id: entity.id,
            name: entity.name.clone(),
            fields: entity.fields.clone(),
            timestamp: now,
        }
    }

    pub fn kind(&self) -> &'static str {
        ENTITY_TRANSFER_TAG
    }

    pub fn encode(&self) -> DropResult<String> {
        serde_json::to_string(&TransferData::ErEntity(self.clone()))
            .map_err(|e| DropError::MalformedPayload(e.to_string()))
    }

    /// Parse raw transfer text.
    pub fn decode(raw: &str) -> DropResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| DropError::MalformedPayload(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validate an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> DropResult<Self> {
        let Some(object) = value.as_object() else {
            return Err(DropError::MalformedPayload(
                "transfer data is not an object".to_string(),
            ));
        };

        match object.get("type").and_then(serde_json::Value::as_str) {
            Some(ENTITY_TRANSFER_TAG) => {}
            Some(other) => return Err(DropError::WrongPayloadKind(other.to_string())),
            None => return Err(DropError::WrongPayloadKind("<missing>".to_string())),
        }

        match serde_json::from_value::<TransferData>(value) {
            Ok(TransferData::ErEntity(payload)) => Ok(payload),
            Err(e) => Err(DropError::MalformedPayload(e.to_string())),
        }
    }
}

/// Drop effect advertised to the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
}

impl DropEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropEffect::Copy => "copy",
        }
    }
}

/// Custom image shown under the pointer during a native drag
#[derive(Clone, Debug, PartialEq)]
pub struct DragImage {
    pub label: String,
    pub color: Color,
    /// Pointer position inside the image
    pub offset: Point,
}

/// Read side of a native transfer channel
pub trait TransferSource {
    /// Data stored under `format`, if any.
    fn get_data(&self, format: &str) -> Option<String>;
}

/// Write side of a native transfer channel
pub trait TransferChannel: TransferSource {
    fn set_data(&mut self, format: &str, data: &str) -> DropResult<()>;

    fn set_effect_allowed(&mut self, effect: DropEffect);

    /// Optional; hosts without custom drag images keep the default.
    fn set_drag_image(&mut self, image: &DragImage) -> DropResult<()> {
        let _ = image;
        Err(DropError::UnsupportedCapability("setDragImage".to_string()))
    }
}

/// Decode a payload from a channel: JSON-typed data first, then plain text.
pub fn decode_transfer(source: &dyn TransferSource) -> DropResult<TransferPayload> {
    let raw = TRANSFER_FORMATS
        .iter()
        .find_map(|format| source.get_data(format).filter(|data| !data.is_empty()))
        .ok_or_else(|| DropError::MalformedPayload("no transfer data found".to_string()))?;

    TransferPayload::decode(&raw)
}

/// Write a payload under every supported format and declare a copy.
pub fn write_transfer(payload: &TransferPayload, channel: &mut dyn TransferChannel) -> DropResult<()> {
    let encoded = payload.encode()?;
    for format in TRANSFER_FORMATS {
        channel.set_data(format, &encoded)?;
    }
    channel.set_effect_allowed(DropEffect::Copy);
    Ok(())
}

/// In-process transfer channel
#[derive(Clone, Debug, Default)]
pub struct MemoryTransfer {
    data: HashMap<String, String>,
    effect_allowed: Option<DropEffect>,
    drag_image: Option<DragImage>,
    drag_image_unsupported: bool,
    read_only: bool,
}

impl MemoryTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, format: &str, data: impl Into<String>) -> Self {
        self.data.insert(format.to_string(), data.into());
        self
    }

    /// Behave like a host that cannot render custom drag images.
    pub fn without_drag_image(mut self) -> Self {
        self.drag_image_unsupported = true;
        self
    }

    /// Behave like a host whose channel rejects writes.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn effect_allowed(&self) -> Option<DropEffect> {
        self.effect_allowed
    }

    pub fn drag_image(&self) -> Option<&DragImage> {
        self.drag_image.as_ref()
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl TransferSource for MemoryTransfer {
    fn get_data(&self, format: &str) -> Option<String> {
        self.data.get(format).cloned()
    }
}

impl TransferChannel for MemoryTransfer {
    fn set_data(&mut self, format: &str, data: &str) -> DropResult<()> {
        if self.read_only {
            return Err(DropError::UnsupportedCapability(format!(
                "setData({format})"
            )));
        }
        self.data.insert(format.to_string(), data.to_string());
        Ok(())
    }

    fn set_effect_allowed(&mut self, effect: DropEffect) {
        self.effect_allowed = Some(effect);
    }

    fn set_drag_image(&mut self, image: &DragImage) -> DropResult<()> {
        if self.drag_image_unsupported {
            return Err(DropError::UnsupportedCapability("setDragImage".to_string()));
        }
        self.drag_image = Some(image.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> TransferPayload {
        TransferPayload {
            entity_id: EntityId(1),
            name: "Users".to_string(),
            fields: vec!["id (PK)".to_string(), "email".to_string()],
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn test_encode_wire_shape() {
        let encoded = payload().encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value["type"], "er-entity");
        assert_eq!(value["entityId"], 1);
        assert_eq!(value["name"], "Users");
        assert_eq!(value["fields"][1], "email");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_decode_browser_shape() {
        let raw = r#"{"entityId":2,"name":"Orders","fields":["id (PK)","total"],"type":"er-entity","timestamp":"2024-05-01T10:00:00.000Z"}"#;
        let decoded = TransferPayload::decode(raw).unwrap();

        assert_eq!(decoded.entity_id, EntityId(2));
        assert_eq!(decoded.name, "Orders");
        assert_eq!(decoded.fields, vec!["id (PK)", "total"]);
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let raw = r#"{"type":"file","name":"notes.txt"}"#;
        assert_eq!(
            TransferPayload::decode(raw),
            Err(DropError::WrongPayloadKind("file".to_string()))
        );

        let raw = r#"{"entityId":1,"name":"Users","fields":[]}"#;
        assert!(matches!(
            TransferPayload::decode(raw),
            Err(DropError::WrongPayloadKind(_))
        ));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            TransferPayload::decode("not json"),
            Err(DropError::MalformedPayload(_))
        ));
        assert!(matches!(
            TransferPayload::decode("[1, 2]"),
            Err(DropError::MalformedPayload(_))
        ));
        // Tag matches but fields are missing
        assert!(matches!(
            TransferPayload::decode(r#"{"type":"er-entity","name":"Users"}"#),
            Err(DropError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_write_transfer_sets_both_formats_and_copy() {
        let mut channel = MemoryTransfer::new();
        write_transfer(&payload(), &mut channel).unwrap();

        let json = channel.get_data(FORMAT_JSON).unwrap();
        let text = channel.get_data(FORMAT_TEXT).unwrap();
        assert_eq!(json, text);
        assert_eq!(channel.effect_allowed(), Some(DropEffect::Copy));
    }

    #[test]
    fn test_decode_transfer_prefers_json_format() {
        let other = TransferPayload {
            name: "Products".to_string(),
            ..payload()
        };
        let channel = MemoryTransfer::new()
            .with_data(FORMAT_TEXT, payload().encode().unwrap())
            .with_data(FORMAT_JSON, other.encode().unwrap());

        assert_eq!(decode_transfer(&channel).unwrap().name, "Products");
    }

    #[test]
    fn test_decode_transfer_falls_back_to_text() {
        let channel = MemoryTransfer::new()
            .with_data(FORMAT_JSON, "")
            .with_data(FORMAT_TEXT, payload().encode().unwrap());

        assert_eq!(decode_transfer(&channel).unwrap(), payload());
    }

    #[test]
    fn test_decode_transfer_empty_channel() {
        assert!(matches!(
            decode_transfer(&MemoryTransfer::new()),
            Err(DropError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_read_only_channel_fails_write() {
        let mut channel = MemoryTransfer::new().read_only();
        assert!(matches!(
            write_transfer(&payload(), &mut channel),
            Err(DropError::UnsupportedCapability(_))
        ));
        assert_eq!(channel.formats().count(), 0);
    }
}
