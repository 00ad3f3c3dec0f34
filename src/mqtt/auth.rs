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

/// Data model of an [MQTT5 AUTH](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901217) packet.
///
/// AUTH packets do not exist in the 3.x protocol family; encoding or decoding one on a 3.x
/// connection is an error.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthPacket {

    /// The origin and meaning of this packet within the authentication exchange.
    pub reason_code: AuthenticateReasonCode,

    /// Authentication method this exchange is using.  Must match the method established in the
    /// CONNECT packet.
    pub authentication_method: Option<String>,

    /// Authentication method specific binary data for this step of the exchange.
    pub authentication_data: Option<Vec<u8>>,

    /// Additional diagnostic information about this step of the exchange.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    pub user_properties: Option<Vec<UserProperty>>,
}

fn compute_auth_packet_lengths(packet: &AuthPacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    if inclusion != PropertyInclusion::RequiredOnly {
        add_optional_string_property_length!(property_section_length, packet.reason_string);
    }

    add_optional_string_property_length!(property_section_length, packet.authentication_method);
    add_optional_bytes_property_length!(property_section_length, packet.authentication_data);

    if property_section_length == 0 {
        if packet.reason_code == AuthenticateReasonCode::Success {
            return Ok((0, 0));
        }

        return Ok((1, 0));
    }

    let total_remaining_length : usize = 1 + compute_variable_length_integer_encode_size(property_section_length)? + property_section_length;

    Ok((total_remaining_length as u32, property_section_length as u32))
}

pub(crate) fn write_auth_packet(packet: &AuthPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    if context.protocol_version != ProtocolVersion::Mqtt5 {
        error!("AuthPacket Encode - auth packets do not exist in the 3.x protocol family");
        return Err(MqttError::new_encoding_failure("auth packets do not exist in the 3.x protocol family"));
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_auth_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("AuthPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(AUTH_FIRST_BYTE);
    encode_vli(total_remaining_length, dest)?;

    if total_remaining_length == 0 {
        return Ok(dest.len() - start);
    }

    dest.push(packet.reason_code as u8);

    if total_remaining_length == 1 {
        return Ok(dest.len() - start);
    }

    encode_vli(property_section_length, dest)?;

    encode_optional_string_property!(dest, PROPERTY_KEY_AUTHENTICATION_METHOD, packet.authentication_method);
    encode_optional_bytes_property!(dest, PROPERTY_KEY_AUTHENTICATION_DATA, packet.authentication_data);

    if inclusion != PropertyInclusion::RequiredOnly {
        encode_optional_string_property!(dest, PROPERTY_KEY_REASON_STRING, packet.reason_string);
    }

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    Ok(dest.len() - start)
}

fn decode_auth_properties(property_bytes: &[u8], packet : &mut AuthPacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_AUTHENTICATION_METHOD => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.authentication_method)?; }
            PROPERTY_KEY_AUTHENTICATION_DATA => { mutable_property_bytes = decode_optional_length_prefixed_bytes(mutable_property_bytes, &mut packet.authentication_data)?; }
            PROPERTY_KEY_REASON_STRING => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.reason_string)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            _ => {
                error!("AuthPacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for auth packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_auth_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if protocol_version != ProtocolVersion::Mqtt5 {
        error!("AuthPacket Decode - auth packets do not exist in the 3.x protocol family");
        return Err(MqttError::new_decoding_failure("auth packets do not exist in the 3.x protocol family"));
    }

    if first_byte != AUTH_FIRST_BYTE {
        error!("AuthPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for auth packet"));
    }

    let mut box_packet = Box::new(MqttPacket::Auth(AuthPacket { ..Default::default() }));

    if packet_body.is_empty() {
        return Ok(box_packet);
    }

    if let MqttPacket::Auth(packet) = box_packet.as_mut() {
        let mut mutable_body = packet_body;
        mutable_body = decode_u8_as_enum(mutable_body, &mut packet.reason_code, convert_u8_to_authenticate_reason_code)?;

        if mutable_body.is_empty() {
            return Ok(box_packet);
        }

        let mut properties_length : usize = 0;
        mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
        if properties_length != mutable_body.len() {
            error!("AuthPacket Decode - property length does not match remaining packet length");
            return Err(MqttError::new_decoding_failure("property length does not match remaining packet length for auth packet"));
        }

        decode_auth_properties(mutable_body, packet)?;

        return Ok(box_packet);
    }

    panic!("AuthPacket Decode - Internal error");
}

impl fmt::Display for AuthPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AuthPacket {{")?;
        log_enum!(self.reason_code, f, "reason_code", authenticate_reason_code_to_str);
        log_optional_string!(self.authentication_method, f, "authentication_method", value);
        log_optional_binary_data_sensitive!(self.authentication_data, f, "authentication_data");
        log_optional_string!(self.reason_string, f, "reason_string", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " }}")
    }
}
