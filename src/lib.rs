/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
A protocol engine for MQTT 3.1, 3.1.1, and 5, independent of any particular transport or
client implementation.

The crate provides:

* A data model for all fifteen MQTT packet types, shared across protocol versions
* Encoders that serialize packets subject to a connection's maximum packet size, shedding
  droppable optional properties when necessary
* Decoders that operate over fragmented, non-contiguous byte buffers as well as a streaming
  decoder for use directly against network reads
* Session-state primitives: a concurrent packet id allocator and an insertion-order-preserving
  table of in-flight publish operations
* Topic alias resolvers for both inbound and outbound aliasing on MQTT5 connections
*/

pub mod alias;
pub mod buffer;
pub mod decode;
pub mod encode;
pub mod error;
mod logging;
pub mod mqtt;
pub mod session;
pub mod validate;

/* Re-export the packet data model at the root level */
pub use mqtt::ProtocolVersion;
pub use mqtt::QualityOfService;
pub use mqtt::PayloadFormatIndicator;
pub use mqtt::RetainHandlingType;
pub use mqtt::ConnectReasonCode;
pub use mqtt::PubackReasonCode;
pub use mqtt::PubrecReasonCode;
pub use mqtt::PubrelReasonCode;
pub use mqtt::PubcompReasonCode;
pub use mqtt::DisconnectReasonCode;
pub use mqtt::SubackReasonCode;
pub use mqtt::UnsubackReasonCode;
pub use mqtt::AuthenticateReasonCode;
pub use mqtt::UserProperty;
pub use mqtt::Subscription;
pub use mqtt::PacketType;
pub use mqtt::MqttPacket;

pub use mqtt::AuthPacket;
pub use mqtt::ConnackPacket;
pub use mqtt::ConnectPacket;
pub use mqtt::DisconnectPacket;
pub use mqtt::PingreqPacket;
pub use mqtt::PingrespPacket;
pub use mqtt::PubackPacket;
pub use mqtt::PubcompPacket;
pub use mqtt::PublishPacket;
pub use mqtt::PubrecPacket;
pub use mqtt::PubrelPacket;
pub use mqtt::SubackPacket;
pub use mqtt::SubscribePacket;
pub use mqtt::UnsubackPacket;
pub use mqtt::UnsubscribePacket;

pub use error::{MqttError, MqttResult};
