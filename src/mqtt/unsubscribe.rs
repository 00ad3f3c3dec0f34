/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::decode::utils::*;
use crate::encode::EncodingContext;
use crate::encode::utils::*;
use crate::error::{MqttError, MqttResult};
use crate::logging::*;
use crate::mqtt::*;
use crate::mqtt::utils::*;

use log::*;
use std::fmt;

/// Data model of an [MQTT5 UNSUBSCRIBE](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901179) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnsubscribePacket {

    /// Packet id associated with this UNSUBSCRIBE.  Must be non-zero.
    pub packet_id: u16,

    /// List of topic filters that the client wishes to unsubscribe from
    pub topic_filters: Vec<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,
}

fn compute_unsubscribe_packet_lengths(packet: &UnsubscribePacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    let mut total_remaining_length : usize = 2 + compute_variable_length_integer_encode_size(property_section_length)? + property_section_length;
    for topic_filter in &packet.topic_filters {
        total_remaining_length += 2 + topic_filter.len();
    }

    Ok((total_remaining_length as u32, property_section_length as u32))
}

pub(crate) fn write_unsubscribe_packet(packet: &UnsubscribePacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    if context.protocol_version != ProtocolVersion::Mqtt5 {
        let mut total_remaining_length : usize = 2;
        for topic_filter in &packet.topic_filters {
            total_remaining_length += 2 + topic_filter.len();
        }

        if !fits_within_maximum_packet_size(total_remaining_length as u32, context.maximum_packet_size)? {
            debug!("UnsubscribePacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(UNSUBSCRIBE_FIRST_BYTE);
        encode_vli(total_remaining_length as u32, dest)?;
        write_u16(dest, packet.packet_id);

        for topic_filter in &packet.topic_filters {
            write_length_prefixed_string(dest, topic_filter);
        }

        return Ok(dest.len() - start);
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_unsubscribe_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("UnsubscribePacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(UNSUBSCRIBE_FIRST_BYTE);
    encode_vli(total_remaining_length, dest)?;
    write_u16(dest, packet.packet_id);
    encode_vli(property_section_length, dest)?;

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    for topic_filter in &packet.topic_filters {
        write_length_prefixed_string(dest, topic_filter);
    }

    Ok(dest.len() - start)
}

fn decode_unsubscribe_properties(property_bytes: &[u8], packet : &mut UnsubscribePacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            _ => {
                error!("UnsubscribePacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for unsubscribe packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_unsubscribe_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if first_byte != UNSUBSCRIBE_FIRST_BYTE {
        error!("UnsubscribePacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for unsubscribe packet"));
    }

    let mut box_packet = Box::new(MqttPacket::Unsubscribe(UnsubscribePacket { ..Default::default() }));

    if let MqttPacket::Unsubscribe(packet) = box_packet.as_mut() {
        let mut mutable_body = packet_body;
        mutable_body = decode_u16(mutable_body, &mut packet.packet_id)?;

        if protocol_version == ProtocolVersion::Mqtt5 {
            let mut properties_length : usize = 0;
            mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
            if properties_length > mutable_body.len() {
                error!("UnsubscribePacket Decode - property length exceeds overall packet length");
                return Err(MqttError::new_decoding_failure("property length exceeds overall packet length for unsubscribe packet"));
            }

            let properties_bytes = &mutable_body[..properties_length];
            mutable_body = &mutable_body[properties_length..];

            decode_unsubscribe_properties(properties_bytes, packet)?;
        }

        while !mutable_body.is_empty() {
            let mut topic_filter = String::new();
            mutable_body = decode_length_prefixed_string(mutable_body, &mut topic_filter)?;
            packet.topic_filters.push(topic_filter);
        }

        return Ok(box_packet);
    }

    panic!("UnsubscribePacket Decode - Internal error");
}

impl fmt::Display for UnsubscribePacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UnsubscribePacket {{")?;
        log_primitive_value!(self.packet_id, f, "packet_id");
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " topic_filters: [")?;
        for (i, topic_filter) in self.topic_filters.iter().enumerate() {
            write!(f, " {}: \"{}\"", i, topic_filter)?;
        }
        write!(f, " ] }}")
    }
}
