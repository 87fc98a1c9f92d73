//! Gateway frame decoding.

use serde::de::DeserializeOwned;
use serde_json::Value;

use accord_core::error::DecodeError;
use accord_core::event::{BulkDelete, Channel, Guild, Message, MessageRef, ReadyData, SelfProfile};
use accord_core::{Event, EventDecoder, GatewayFrame};

/// The default decoder for the standard gateway event vocabulary.
///
/// Dispatch frames with a known type tag decode into their typed payload.
/// Unknown tags decode into [`Event::Unknown`] rather than erroring, so new
/// server-side event types never break an existing session. Non-dispatch
/// frames and frames missing a type tag are decode failures; the session
/// logs and skips those.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardEventDecoder;

impl StandardEventDecoder {
    pub fn new() -> Self {
        Self
    }
}

fn payload<T: DeserializeOwned>(event_type: &str, data: &Value) -> Result<T, DecodeError> {
    serde_json::from_value(data.clone()).map_err(|e| DecodeError::Payload {
        event_type: event_type.to_string(),
        message: e.to_string(),
    })
}

impl EventDecoder for StandardEventDecoder {
    fn decode(&self, frame: &GatewayFrame) -> Result<Event, DecodeError> {
        if !frame.is_dispatch() {
            return Err(DecodeError::Frame {
                message: format!("unexpected opcode {}", frame.op),
            });
        }
        let event_type = frame.event_type.as_deref().ok_or(DecodeError::Frame {
            message: "dispatch frame missing event type tag".to_string(),
        })?;

        let event = match event_type {
            "READY" => Event::Ready(payload::<ReadyData>(event_type, &frame.data)?),
            "MESSAGE_CREATE" => Event::MessageCreate(payload::<Message>(event_type, &frame.data)?),
            "MESSAGE_UPDATE" => Event::MessageUpdate(payload::<Message>(event_type, &frame.data)?),
            "MESSAGE_DELETE" => {
                Event::MessageDelete(payload::<MessageRef>(event_type, &frame.data)?)
            }
            "MESSAGE_DELETE_BULK" => {
                Event::MessageBulkDelete(payload::<BulkDelete>(event_type, &frame.data)?)
            }
            "USER_UPDATE" => Event::UserUpdate(payload::<SelfProfile>(event_type, &frame.data)?),
            "GUILD_CREATE" => Event::GuildCreate(payload::<Guild>(event_type, &frame.data)?),
            "GUILD_DELETE" => Event::GuildDelete(payload::<Guild>(event_type, &frame.data)?),
            "CHANNEL_CREATE" => Event::ChannelCreate(payload::<Channel>(event_type, &frame.data)?),
            "CHANNEL_DELETE" => Event::ChannelDelete(payload::<Channel>(event_type, &frame.data)?),
            other => Event::Unknown {
                kind: other.to_string(),
            },
        };
        Ok(event)
    }
}
