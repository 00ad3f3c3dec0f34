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

/// Data model of an [MQTT5 UNSUBACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901187) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnsubackPacket {

    /// Id of the unsubscribe this packet is acknowledging
    pub packet_id: u16,

    /// Additional diagnostic information about the result of the UNSUBSCRIBE attempt.
    ///
    /// MQTT5 only.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,

    /// A list of reason codes indicating the result of unsubscribing from each individual topic filter entry in the
    /// associated UNSUBSCRIBE packet.
    ///
    /// Always empty on 3.x connections, whose UNSUBACK carries no result information at all.
    pub reason_codes: Vec<UnsubackReasonCode>,
}

fn compute_unsuback_packet_lengths(packet: &UnsubackPacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    if inclusion != PropertyInclusion::RequiredOnly {
        add_optional_string_property_length!(property_section_length, packet.reason_string);
    }

    let mut total_remaining_length : usize = 2 + compute_variable_length_integer_encode_size(property_section_length)? + property_section_length;
    total_remaining_length += packet.reason_codes.len();

    Ok((total_remaining_length as u32, property_section_length as u32))
}

pub(crate) fn write_unsuback_packet(packet: &UnsubackPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    // 3.x unsuback is just the packet id
    if context.protocol_version != ProtocolVersion::Mqtt5 {
        if !fits_within_maximum_packet_size(2, context.maximum_packet_size)? {
            debug!("UnsubackPacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(UNSUBACK_FIRST_BYTE);
        encode_vli(2, dest)?;
        write_u16(dest, packet.packet_id);

        return Ok(dest.len() - start);
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_unsuback_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("UnsubackPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(UNSUBACK_FIRST_BYTE);
    encode_vli(total_remaining_length, dest)?;
    write_u16(dest, packet.packet_id);
    encode_vli(property_section_length, dest)?;

    if inclusion != PropertyInclusion::RequiredOnly {
        encode_optional_string_property!(dest, PROPERTY_KEY_REASON_STRING, packet.reason_string);
    }

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    for reason_code in &packet.reason_codes {
        dest.push(*reason_code as u8);
    }

    Ok(dest.len() - start)
}

fn decode_unsuback_properties(property_bytes: &[u8], packet : &mut UnsubackPacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_REASON_STRING => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.reason_string)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            _ => {
                error!("UnsubackPacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for unsuback packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_unsuback_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if first_byte != UNSUBACK_FIRST_BYTE {
        error!("UnsubackPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for unsuback packet"));
    }

    let mut box_packet = Box::new(MqttPacket::Unsuback(UnsubackPacket { ..Default::default() }));

    if let MqttPacket::Unsuback(packet) = box_packet.as_mut() {
        let mut mutable_body = packet_body;
        mutable_body = decode_u16(mutable_body, &mut packet.packet_id)?;

        if protocol_version != ProtocolVersion::Mqtt5 {
            if !mutable_body.is_empty() {
                error!("UnsubackPacket Decode - nonzero remaining bytes after 3.x packet id");
                return Err(MqttError::new_decoding_failure("nonzero remaining bytes after 3.x unsuback packet id"));
            }

            return Ok(box_packet);
        }

        let mut properties_length : usize = 0;
        mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
        if properties_length > mutable_body.len() {
            error!("UnsubackPacket Decode - property length exceeds overall packet length");
            return Err(MqttError::new_decoding_failure("property length exceeds overall packet length for unsuback packet"));
        }

        let properties_bytes = &mutable_body[..properties_length];
        let payload_bytes = &mutable_body[properties_length..];

        decode_unsuback_properties(properties_bytes, packet)?;

        packet.reason_codes.reserve(payload_bytes.len());
        for reason_code_byte in payload_bytes {
            packet.reason_codes.push(convert_u8_to_unsuback_reason_code(*reason_code_byte)?);
        }

        return Ok(box_packet);
    }

    panic!("UnsubackPacket Decode - Internal error");
}

impl fmt::Display for UnsubackPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UnsubackPacket {{")?;
        log_primitive_value!(self.packet_id, f, "packet_id");
        log_optional_string!(self.reason_string, f, "reason_string", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " reason_codes: [")?;
        for (i, reason_code) in self.reason_codes.iter().enumerate() {
            write!(f, " {}: {}", i, unsuback_reason_code_to_str(*reason_code))?;
        }
        write!(f, " ] }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;

    #[test]
    fn unsuback_round_trip_encode_decode_required() {
        let packet = UnsubackPacket {
            packet_id: 42,
            reason_codes: vec!(
                UnsubackReasonCode::Success,
                UnsubackReasonCode::NoSubscriptionExisted,
            ),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Unsuback(packet)));
    }

    #[test]
    fn unsuback_round_trip_encode_decode_all_properties() {
        let packet = UnsubackPacket {
            packet_id: 42,
            reason_string: Some("Didn't feel like it".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "Times".to_string(), value: "TheyAreAChanging".to_string() },
            )),
            reason_codes: vec!(
                UnsubackReasonCode::ImplementationSpecificError,
                UnsubackReasonCode::Success,
                UnsubackReasonCode::TopicNameInvalid,
            ),
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Unsuback(packet)));
    }

    #[test]
    fn unsuback_round_trip_encode_decode_311() {
        let packet = UnsubackPacket {
            packet_id: 513,
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Unsuback(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn unsuback_decode_failure_bad_fixed_header() {
        let packet = UnsubackPacket {
            packet_id: 42,
            reason_codes: vec!(UnsubackReasonCode::Success),
            ..Default::default()
        };

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Unsuback(packet), 0x0c);
    }

    #[test]
    fn unsuback_decode_failure_reason_code_invalid() {
        let packet = UnsubackPacket {
            packet_id: 42,
            reason_codes: vec!(UnsubackReasonCode::Success),
            ..Default::default()
        };

        let corrupt_reason_code = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            *clone.last_mut().unwrap() = 200;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Unsuback(packet), corrupt_reason_code);
    }

    #[test]
    fn unsuback_decode_failure_311_extra_bytes() {
        // hand-rolled: a 3.x unsuback whose remaining length is 3
        let bytes = [0xb0u8, 0x03u8, 0x00u8, 0x05u8, 0x00u8];

        let context = crate::decode::DecodingContext {
            protocol_version: ProtocolVersion::Mqtt311,
            ..Default::default()
        };

        let mut decoder = crate::decode::Decoder::new();
        let mut decoded_packets = std::collections::VecDeque::new();
        assert!(decoder.decode_bytes(&bytes, &context, &mut decoded_packets).is_err());
    }

    #[test]
    fn unsuback_decode_failure_packet_size() {
        let packet = UnsubackPacket {
            packet_id: 42,
            reason_string: Some("Unsubscribe plz".to_string()),
            reason_codes: vec!(UnsubackReasonCode::NotAuthorized),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Unsuback(packet));
    }
}
