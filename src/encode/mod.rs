/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing the crate's packet encoding entry point and shared encoding utilities.
 */

pub(crate) mod utils;

use crate::alias::OutboundAliasResolution;
use crate::error::MqttResult;
use crate::logging::log_packet;
use crate::mqtt::*;
use crate::mqtt::auth::write_auth_packet;
use crate::mqtt::connack::write_connack_packet;
use crate::mqtt::connect::write_connect_packet;
use crate::mqtt::disconnect::write_disconnect_packet;
use crate::mqtt::pingreq::write_pingreq_packet;
use crate::mqtt::pingresp::write_pingresp_packet;
use crate::mqtt::puback::write_puback_packet;
use crate::mqtt::pubcomp::write_pubcomp_packet;
use crate::mqtt::publish::write_publish_packet;
use crate::mqtt::pubrec::write_pubrec_packet;
use crate::mqtt::pubrel::write_pubrel_packet;
use crate::mqtt::suback::write_suback_packet;
use crate::mqtt::subscribe::write_subscribe_packet;
use crate::mqtt::unsuback::write_unsuback_packet;
use crate::mqtt::unsubscribe::write_unsubscribe_packet;

/// Contextual information the encoder needs beyond the packet itself
#[derive(Copy, Clone, Debug, Default)]
pub struct EncodingContext {

    /// MQTT protocol version to encode against
    pub protocol_version: ProtocolVersion,

    /// Maximum total packet size, in bytes, that the peer will accept.  Zero means
    /// unlimited.  Packets that exceed this limit shed droppable optional properties;
    /// if the packet still does not fit, nothing is written and the encode reports
    /// zero bytes written.
    pub maximum_packet_size: u32,

    /// Outbound topic alias decision for the next PUBLISH packet.  Ignored by every
    /// other packet type.
    pub outbound_alias_resolution: OutboundAliasResolution,
}

/// Encodes a single MQTT packet to the destination buffer.
///
/// Returns the number of bytes written.  A return value of zero means the packet's
/// mandatory fields alone exceed the context's maximum packet size; the destination
/// buffer is untouched in that case.
pub fn write_packet(packet: &MqttPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    log_packet("Encoding packet: ", packet);

    match packet {
        MqttPacket::Connect(connect) => { write_connect_packet(connect, context, dest) }
        MqttPacket::Connack(connack) => { write_connack_packet(connack, context, dest) }
        MqttPacket::Publish(publish) => { write_publish_packet(publish, context, dest) }
        MqttPacket::Puback(puback) => { write_puback_packet(puback, context, dest) }
        MqttPacket::Pubrec(pubrec) => { write_pubrec_packet(pubrec, context, dest) }
        MqttPacket::Pubrel(pubrel) => { write_pubrel_packet(pubrel, context, dest) }
        MqttPacket::Pubcomp(pubcomp) => { write_pubcomp_packet(pubcomp, context, dest) }
        MqttPacket::Subscribe(subscribe) => { write_subscribe_packet(subscribe, context, dest) }
        MqttPacket::Suback(suback) => { write_suback_packet(suback, context, dest) }
        MqttPacket::Unsubscribe(unsubscribe) => { write_unsubscribe_packet(unsubscribe, context, dest) }
        MqttPacket::Unsuback(unsuback) => { write_unsuback_packet(unsuback, context, dest) }
        MqttPacket::Pingreq(pingreq) => { write_pingreq_packet(pingreq, context, dest) }
        MqttPacket::Pingresp(pingresp) => { write_pingresp_packet(pingresp, context, dest) }
        MqttPacket::Disconnect(disconnect) => { write_disconnect_packet(disconnect, context, dest) }
        MqttPacket::Auth(auth) => { write_auth_packet(auth, context, dest) }
    }
}
