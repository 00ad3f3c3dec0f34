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

/// Data model of an [MQTT5 SUBACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901171) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubackPacket {

    /// Id of the subscribe this packet is acknowledging
    pub packet_id: u16,

    /// Additional diagnostic information about the result of the SUBSCRIBE attempt.
    ///
    /// MQTT5 only.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,

    /// A list of reason codes indicating the result of each individual subscription entry in the
    /// associated SUBSCRIBE packet.
    ///
    /// On 3.x connections only the granted-QoS codes and the generic failure code can appear.
    pub reason_codes: Vec<SubackReasonCode>,
}

// 3.x return code byte: granted qos or the 0x80 failure marker
fn convert_suback_reason_code_to_311_return_code(reason_code: SubackReasonCode) -> u8 {
    match reason_code {
        SubackReasonCode::GrantedQos0 => { 0 }
        SubackReasonCode::GrantedQos1 => { 1 }
        SubackReasonCode::GrantedQos2 => { 2 }
        _ => { 0x80 }
    }
}

fn convert_311_return_code_to_suback_reason_code(value: u8) -> MqttResult<SubackReasonCode> {
    match value {
        0 => { Ok(SubackReasonCode::GrantedQos0) }
        1 => { Ok(SubackReasonCode::GrantedQos1) }
        2 => { Ok(SubackReasonCode::GrantedQos2) }
        0x80 => { Ok(SubackReasonCode::UnspecifiedError) }
        _ => {
            error!("SubackPacket Decode - invalid 3.x return code value ({})", value);
            Err(MqttError::new_decoding_failure("invalid 3.x suback return code value"))
        }
    }
}

fn compute_suback_packet_lengths(packet: &SubackPacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
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

pub(crate) fn write_suback_packet(packet: &SubackPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    if context.protocol_version != ProtocolVersion::Mqtt5 {
        let total_remaining_length = 2 + packet.reason_codes.len();
        if !fits_within_maximum_packet_size(total_remaining_length as u32, context.maximum_packet_size)? {
            debug!("SubackPacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(SUBACK_FIRST_BYTE);
        encode_vli(total_remaining_length as u32, dest)?;
        write_u16(dest, packet.packet_id);

        for reason_code in &packet.reason_codes {
            dest.push(convert_suback_reason_code_to_311_return_code(*reason_code));
        }

        return Ok(dest.len() - start);
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_suback_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("SubackPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(SUBACK_FIRST_BYTE);
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

fn decode_suback_properties(property_bytes: &[u8], packet : &mut SubackPacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_REASON_STRING => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.reason_string)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            _ => {
                error!("SubackPacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for suback packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_suback_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if first_byte != SUBACK_FIRST_BYTE {
        error!("SubackPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for suback packet"));
    }

    let mut box_packet = Box::new(MqttPacket::Suback(SubackPacket { ..Default::default() }));

    if let MqttPacket::Suback(packet) = box_packet.as_mut() {
        let mut mutable_body = packet_body;
        mutable_body = decode_u16(mutable_body, &mut packet.packet_id)?;

        if protocol_version != ProtocolVersion::Mqtt5 {
            packet.reason_codes.reserve(mutable_body.len());
            for return_code_byte in mutable_body {
                packet.reason_codes.push(convert_311_return_code_to_suback_reason_code(*return_code_byte)?);
            }

            return Ok(box_packet);
        }

        let mut properties_length : usize = 0;
        mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
        if properties_length > mutable_body.len() {
            error!("SubackPacket Decode - property length exceeds overall packet length");
            return Err(MqttError::new_decoding_failure("property length exceeds overall packet length for suback packet"));
        }

        let properties_bytes = &mutable_body[..properties_length];
        let payload_bytes = &mutable_body[properties_length..];

        decode_suback_properties(properties_bytes, packet)?;

        packet.reason_codes.reserve(payload_bytes.len());
        for reason_code_byte in payload_bytes {
            packet.reason_codes.push(convert_u8_to_suback_reason_code(*reason_code_byte)?);
        }

        return Ok(box_packet);
    }

    panic!("SubackPacket Decode - Internal error");
}

impl fmt::Display for SubackPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SubackPacket {{")?;
        log_primitive_value!(self.packet_id, f, "packet_id");
        log_optional_string!(self.reason_string, f, "reason_string", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " reason_codes: [")?;
        for (i, reason_code) in self.reason_codes.iter().enumerate() {
            write!(f, " {}: {}", i, suback_reason_code_to_str(*reason_code))?;
        }
        write!(f, " ] }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;
    use crate::encode::write_packet;

    #[test]
    fn suback_round_trip_encode_decode_required() {
        let packet = SubackPacket {
            packet_id: 1023,
            reason_codes: vec!(
                SubackReasonCode::GrantedQos1,
                SubackReasonCode::QuotaExceeded,
                SubackReasonCode::SubscriptionIdentifiersNotSupported,
            ),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Suback(packet)));
    }

    #[test]
    fn suback_round_trip_encode_decode_all_properties() {
        let packet = SubackPacket {
            packet_id: 1023,
            reason_string: Some("Maybe tomorrow".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "This".to_string(), value: "Once".to_string() },
                UserProperty { name: "Fancy".to_string(), value: "Pants".to_string() },
            )),
            reason_codes: vec!(
                SubackReasonCode::GrantedQos2,
                SubackReasonCode::NotAuthorized,
            ),
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Suback(packet)));
    }

    #[test]
    fn suback_round_trip_encode_decode_311() {
        let packet = SubackPacket {
            packet_id: 2047,
            reason_codes: vec!(
                SubackReasonCode::GrantedQos0,
                SubackReasonCode::GrantedQos2,
                SubackReasonCode::UnspecifiedError,
            ),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Suback(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn suback_decode_failure_bad_fixed_header() {
        let packet = SubackPacket {
            packet_id: 1023,
            reason_codes: vec!(SubackReasonCode::GrantedQos0),
            ..Default::default()
        };

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Suback(packet), 0x05);
    }

    #[test]
    fn suback_decode_failure_reason_code_invalid() {
        let packet = SubackPacket {
            packet_id: 1023,
            reason_codes: vec!(SubackReasonCode::GrantedQos0),
            ..Default::default()
        };

        let corrupt_reason_code = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();

            // for this packet, the lone reason code is in the final position
            *clone.last_mut().unwrap() = 196;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Suback(packet), corrupt_reason_code);
    }

    #[test]
    fn suback_decode_failure_property_length_overflow() {
        let packet = SubackPacket {
            packet_id: 1023,
            reason_string: Some("derp".to_string()),
            reason_codes: vec!(SubackReasonCode::GrantedQos0),
            ..Default::default()
        };

        let corrupt_property_length = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            clone[4] = 255;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Suback(packet), corrupt_property_length);
    }

    #[test]
    fn suback_decode_failure_packet_size() {
        let packet = SubackPacket {
            packet_id: 1023,
            reason_string: Some("not today".to_string()),
            reason_codes: vec!(SubackReasonCode::GrantedQos1),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Suback(packet));
    }

    #[test]
    fn suback_encode_maximum_packet_size_drops_user_properties_first() {
        let packet = SubackPacket {
            packet_id: 10,
            reason_string: Some("ok".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "AVeryLongPropertyName".to_string(), value: "AnEvenLongerPropertyValue".to_string() },
            )),
            reason_codes: vec!(SubackReasonCode::GrantedQos1, SubackReasonCode::GrantedQos2),
        };

        // 12 bytes: room for the reason string but not the user properties
        let context = EncodingContext {
            maximum_packet_size: 12,
            ..Default::default()
        };

        let mut encoded = Vec::new();
        let bytes_written = write_packet(&MqttPacket::Suback(packet.clone()), &context, &mut encoded).unwrap();
        assert!(bytes_written > 0);
        assert!(bytes_written <= 12);

        let decoded = do_single_decode_test(&encoded, ProtocolVersion::Mqtt5, 1023);
        if let MqttPacket::Suback(decoded_suback) = *decoded {
            assert_eq!(packet.packet_id, decoded_suback.packet_id);
            assert_eq!(packet.reason_codes, decoded_suback.reason_codes);
            assert_eq!(packet.reason_string, decoded_suback.reason_string);
            assert_eq!(None, decoded_suback.user_properties);
        } else {
            panic!("expected a suback");
        }
    }

    #[test]
    fn suback_encode_maximum_packet_size_drops_reason_string_second() {
        let packet = SubackPacket {
            packet_id: 10,
            reason_string: Some("an explanation too verbose to keep".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "AVeryLongPropertyName".to_string(), value: "AnEvenLongerPropertyValue".to_string() },
            )),
            reason_codes: vec!(SubackReasonCode::GrantedQos1, SubackReasonCode::GrantedQos2),
        };

        // 10 bytes: only the required-only form fits
        let context = EncodingContext {
            maximum_packet_size: 10,
            ..Default::default()
        };

        let mut encoded = Vec::new();
        let bytes_written = write_packet(&MqttPacket::Suback(packet.clone()), &context, &mut encoded).unwrap();
        assert!(bytes_written > 0);
        assert!(bytes_written <= 10);

        let decoded = do_single_decode_test(&encoded, ProtocolVersion::Mqtt5, 1023);
        if let MqttPacket::Suback(decoded_suback) = *decoded {
            assert_eq!(packet.packet_id, decoded_suback.packet_id);
            assert_eq!(packet.reason_codes, decoded_suback.reason_codes);
            assert_eq!(None, decoded_suback.reason_string);
            assert_eq!(None, decoded_suback.user_properties);
        } else {
            panic!("expected a suback");
        }
    }
}
