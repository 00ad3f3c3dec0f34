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

/// Data model of an [MQTT5 DISCONNECT](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901205) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DisconnectPacket {

    /// The reason for the disconnect.
    ///
    /// Always NormalDisconnection on 3.x connections, which carry no reason on the wire.
    pub reason_code: DisconnectReasonCode,

    /// Overriding request, in seconds, of how long the server should keep the session alive
    /// after this disconnect.  Client-sent packets only.
    ///
    /// MQTT5 only.
    pub session_expiry_interval_seconds: Option<u32>,

    /// Additional diagnostic information about the reason for the disconnect.
    ///
    /// MQTT5 only.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,

    /// Name of an alternate server that the client may temporarily or permanently attempt to
    /// connect to instead of the configured endpoint.  Server-sent packets only.
    ///
    /// MQTT5 only.
    pub server_reference: Option<String>,
}

fn compute_disconnect_packet_lengths(packet: &DisconnectPacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    if inclusion != PropertyInclusion::RequiredOnly {
        add_optional_string_property_length!(property_section_length, packet.reason_string);
    }

    add_optional_u32_property_length!(property_section_length, packet.session_expiry_interval_seconds);
    add_optional_string_property_length!(property_section_length, packet.server_reference);

    if property_section_length == 0 {
        if packet.reason_code == DisconnectReasonCode::NormalDisconnection {
            return Ok((0, 0));
        }

        return Ok((1, 0));
    }

    let total_remaining_length : usize = 1 + compute_variable_length_integer_encode_size(property_section_length)? + property_section_length;

    Ok((total_remaining_length as u32, property_section_length as u32))
}

pub(crate) fn write_disconnect_packet(packet: &DisconnectPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    // a 3.x disconnect is just the fixed header and can express no reason
    if context.protocol_version != ProtocolVersion::Mqtt5 {
        if packet.reason_code != DisconnectReasonCode::NormalDisconnection {
            error!("DisconnectPacket Encode - 3.x disconnects cannot carry a reason code");
            return Err(MqttError::new_encoding_failure("3.x disconnects cannot carry a reason code"));
        }

        if !fits_within_maximum_packet_size(0, context.maximum_packet_size)? {
            debug!("DisconnectPacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(DISCONNECT_FIRST_BYTE);
        encode_vli(0, dest)?;

        return Ok(dest.len() - start);
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_disconnect_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("DisconnectPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(DISCONNECT_FIRST_BYTE);
    encode_vli(total_remaining_length, dest)?;

    if total_remaining_length == 0 {
        return Ok(dest.len() - start);
    }

    dest.push(packet.reason_code as u8);

    if total_remaining_length == 1 {
        return Ok(dest.len() - start);
    }

    encode_vli(property_section_length, dest)?;

    encode_optional_u32_property!(dest, PROPERTY_KEY_SESSION_EXPIRY_INTERVAL, packet.session_expiry_interval_seconds);

    if inclusion != PropertyInclusion::RequiredOnly {
        encode_optional_string_property!(dest, PROPERTY_KEY_REASON_STRING, packet.reason_string);
    }

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    encode_optional_string_property!(dest, PROPERTY_KEY_SERVER_REFERENCE, packet.server_reference);

    Ok(dest.len() - start)
}

fn decode_disconnect_properties(property_bytes: &[u8], packet : &mut DisconnectPacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_SESSION_EXPIRY_INTERVAL => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, &mut packet.session_expiry_interval_seconds)?; }
            PROPERTY_KEY_REASON_STRING => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.reason_string)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            PROPERTY_KEY_SERVER_REFERENCE => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.server_reference)?; }
            _ => {
                error!("DisconnectPacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for disconnect packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_disconnect_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if first_byte != DISCONNECT_FIRST_BYTE {
        error!("DisconnectPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for disconnect packet"));
    }

    let mut box_packet = Box::new(MqttPacket::Disconnect(DisconnectPacket { ..Default::default() }));

    if protocol_version != ProtocolVersion::Mqtt5 {
        if !packet_body.is_empty() {
            error!("DisconnectPacket Decode - nonzero remaining length for 3.x disconnect");
            return Err(MqttError::new_decoding_failure("nonzero remaining length for 3.x disconnect packet"));
        }

        return Ok(box_packet);
    }

    if packet_body.is_empty() {
        return Ok(box_packet);
    }

    if let MqttPacket::Disconnect(packet) = box_packet.as_mut() {
        let mut mutable_body = packet_body;
        mutable_body = decode_u8_as_enum(mutable_body, &mut packet.reason_code, convert_u8_to_disconnect_reason_code)?;

        if mutable_body.is_empty() {
            return Ok(box_packet);
        }

        let mut properties_length : usize = 0;
        mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
        if properties_length != mutable_body.len() {
            error!("DisconnectPacket Decode - property length does not match remaining packet length");
            return Err(MqttError::new_decoding_failure("property length does not match remaining packet length for disconnect packet"));
        }

        decode_disconnect_properties(mutable_body, packet)?;

        return Ok(box_packet);
    }

    panic!("DisconnectPacket Decode - Internal error");
}

impl fmt::Display for DisconnectPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DisconnectPacket {{")?;
        log_enum!(self.reason_code, f, "reason_code", disconnect_reason_code_to_str);
        log_optional_primitive_value!(self.session_expiry_interval_seconds, f, "session_expiry_interval_seconds", value);
        log_optional_string!(self.reason_string, f, "reason_string", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        log_optional_string!(self.server_reference, f, "server_reference", value);
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;

    #[test]
    fn disconnect_round_trip_encode_decode_default() {
        let packet = DisconnectPacket {
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Disconnect(packet)));
    }

    #[test]
    fn disconnect_round_trip_encode_decode_reason_code_only() {
        let packet = DisconnectPacket {
            reason_code: DisconnectReasonCode::KeepAliveTimeout,
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Disconnect(packet)));
    }

    #[test]
    fn disconnect_round_trip_encode_decode_all_properties() {
        let packet = DisconnectPacket {
            reason_code: DisconnectReasonCode::ServerMoved,
            session_expiry_interval_seconds: Some(120),
            reason_string: Some("We moved".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "Forwarding".to_string(), value: "Address".to_string() },
            )),
            server_reference: Some("over.there.com".to_string()),
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Disconnect(packet)));
    }

    #[test]
    fn disconnect_round_trip_encode_decode_311() {
        let packet = DisconnectPacket {
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Disconnect(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn disconnect_encode_failure_311_with_reason_code() {
        let packet = DisconnectPacket {
            reason_code: DisconnectReasonCode::NotAuthorized,
            ..Default::default()
        };

        let context = EncodingContext {
            protocol_version: ProtocolVersion::Mqtt311,
            ..Default::default()
        };

        let mut encoded = Vec::new();
        assert!(crate::encode::write_packet(&MqttPacket::Disconnect(packet), &context, &mut encoded).is_err());
    }

    #[test]
    fn disconnect_decode_failure_bad_fixed_header() {
        let packet = DisconnectPacket {
            reason_code: DisconnectReasonCode::NotAuthorized,
            ..Default::default()
        };

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Disconnect(packet), 0x05);
    }

    #[test]
    fn disconnect_decode_failure_invalid_reason_code() {
        let packet = DisconnectPacket {
            reason_code: DisconnectReasonCode::NotAuthorized,
            ..Default::default()
        };

        let corrupt_reason_code = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            clone[2] = 12;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Disconnect(packet), corrupt_reason_code);
    }

    #[test]
    fn disconnect_decode_failure_311_with_body() {
        // hand-rolled: a 3.x disconnect carrying a reason code byte
        let bytes = [0xe0u8, 0x01u8, 0x04u8];

        let context = crate::decode::DecodingContext {
            protocol_version: ProtocolVersion::Mqtt311,
            ..Default::default()
        };

        let mut decoder = crate::decode::Decoder::new();
        let mut decoded_packets = std::collections::VecDeque::new();
        assert!(decoder.decode_bytes(&bytes, &context, &mut decoded_packets).is_err());
    }

    #[test]
    fn disconnect_decode_failure_packet_size() {
        let packet = DisconnectPacket {
            reason_code: DisconnectReasonCode::ServerShuttingDown,
            reason_string: Some("Maintenance window".to_string()),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Disconnect(packet));
    }

    #[test]
    fn disconnect_encode_maximum_packet_size_drops_optional_properties() {
        let packet = DisconnectPacket {
            reason_code: DisconnectReasonCode::QuotaExceeded,
            reason_string: Some("Too much traffic for you".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "name1".to_string(), value: "value1".to_string() },
            )),
            ..Default::default()
        };

        // only the bare reason code fits
        let context = EncodingContext {
            maximum_packet_size: 3,
            ..Default::default()
        };

        let mut encoded = Vec::new();
        let bytes_written = crate::encode::write_packet(&MqttPacket::Disconnect(packet.clone()), &context, &mut encoded).unwrap();
        assert_eq!(3, bytes_written);

        let decoded = do_single_decode_test(&encoded, ProtocolVersion::Mqtt5, 1023);
        if let MqttPacket::Disconnect(decoded_disconnect) = *decoded {
            assert_eq!(packet.reason_code, decoded_disconnect.reason_code);
            assert_eq!(None, decoded_disconnect.reason_string);
            assert_eq!(None, decoded_disconnect.user_properties);
        } else {
            panic!("expected a disconnect");
        }
    }
}
