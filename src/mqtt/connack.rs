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

/// Data model of an [MQTT5 CONNACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901074) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnackPacket {

    /// True if the client rejoined an existing session on the server, false otherwise.
    pub session_present: bool,

    /// Indicates either success or the reason for failure of the connection attempt.
    pub reason_code: ConnectReasonCode,

    /// A time interval, in seconds, that overrides the session expiry interval requested in the
    /// CONNECT this packet acknowledges.
    ///
    /// MQTT5 only.
    pub session_expiry_interval_seconds: Option<u32>,

    /// The maximum number of in-flight QoS 1 and 2 messages that the server is willing to handle.
    ///
    /// MQTT5 only.
    pub receive_maximum: Option<u16>,

    /// The maximum message delivery quality of service that the server will allow.
    ///
    /// MQTT5 only.
    pub maximum_qos: Option<QualityOfService>,

    /// Indicates whether the server supports retained messages.
    ///
    /// MQTT5 only.
    pub retain_available: Option<bool>,

    /// Maximum packet size, in bytes, that the server is willing to accept.
    ///
    /// MQTT5 only.
    pub maximum_packet_size_bytes: Option<u32>,

    /// A client identifier assigned to this connection by the server.  Only sent when the
    /// client did not specify one itself.
    ///
    /// MQTT5 only.
    pub assigned_client_identifier: Option<String>,

    /// Maximum number of outbound topic aliases the server supports on this connection.
    ///
    /// MQTT5 only.
    pub topic_alias_maximum: Option<u16>,

    /// Additional diagnostic information about the result of the connection attempt.
    ///
    /// MQTT5 only.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,

    /// Indicates whether the server supports wildcard subscriptions.
    ///
    /// MQTT5 only.
    pub wildcard_subscriptions_available: Option<bool>,

    /// Indicates whether the server supports subscription identifiers.
    ///
    /// MQTT5 only.
    pub subscription_identifiers_available: Option<bool>,

    /// Indicates whether the server supports shared subscriptions.
    ///
    /// MQTT5 only.
    pub shared_subscriptions_available: Option<bool>,

    /// Server-requested override of the keep alive interval, in seconds.
    ///
    /// MQTT5 only.
    pub server_keep_alive: Option<u16>,

    /// A value that can be used in the creation of a response topic associated with this
    /// connection.
    ///
    /// MQTT5 only.
    pub response_information: Option<String>,

    /// Name of an alternate server that the client may temporarily or permanently attempt to
    /// connect to instead of the configured endpoint.
    ///
    /// MQTT5 only.
    pub server_reference: Option<String>,

    /// Authentication method used in the authentication exchange that led to this packet.
    ///
    /// MQTT5 only.
    pub authentication_method: Option<String>,

    /// Authentication method specific binary data associated with the authentication exchange
    /// that led to this packet.
    ///
    /// MQTT5 only.
    pub authentication_data: Option<Vec<u8>>,
}

fn compute_connack_packet_lengths(packet: &ConnackPacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    if inclusion != PropertyInclusion::RequiredOnly {
        add_optional_string_property_length!(property_section_length, packet.reason_string);
    }

    add_optional_u32_property_length!(property_section_length, packet.session_expiry_interval_seconds);
    add_optional_u16_property_length!(property_section_length, packet.receive_maximum);
    add_optional_u8_property_length!(property_section_length, packet.maximum_qos);
    add_optional_u8_property_length!(property_section_length, packet.retain_available);
    add_optional_u32_property_length!(property_section_length, packet.maximum_packet_size_bytes);
    add_optional_string_property_length!(property_section_length, packet.assigned_client_identifier);
    add_optional_u16_property_length!(property_section_length, packet.topic_alias_maximum);
    add_optional_u8_property_length!(property_section_length, packet.wildcard_subscriptions_available);
    add_optional_u8_property_length!(property_section_length, packet.subscription_identifiers_available);
    add_optional_u8_property_length!(property_section_length, packet.shared_subscriptions_available);
    add_optional_u16_property_length!(property_section_length, packet.server_keep_alive);
    add_optional_string_property_length!(property_section_length, packet.response_information);
    add_optional_string_property_length!(property_section_length, packet.server_reference);
    add_optional_string_property_length!(property_section_length, packet.authentication_method);
    add_optional_bytes_property_length!(property_section_length, packet.authentication_data);

    let total_remaining_length : usize = 2 + compute_variable_length_integer_encode_size(property_section_length)? + property_section_length;

    Ok((total_remaining_length as u32, property_section_length as u32))
}

pub(crate) fn write_connack_packet(packet: &ConnackPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    if context.protocol_version != ProtocolVersion::Mqtt5 {
        let return_code = convert_connect_reason_code_to_311_return_code(packet.reason_code)?;

        if !fits_within_maximum_packet_size(2, context.maximum_packet_size)? {
            debug!("ConnackPacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(CONNACK_FIRST_BYTE);
        encode_vli(2, dest)?;
        dest.push(packet.session_present as u8);
        dest.push(return_code);

        return Ok(dest.len() - start);
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_connack_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("ConnackPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(CONNACK_FIRST_BYTE);
    encode_vli(total_remaining_length, dest)?;
    dest.push(packet.session_present as u8);
    dest.push(packet.reason_code as u8);
    encode_vli(property_section_length, dest)?;

    encode_optional_u32_property!(dest, PROPERTY_KEY_SESSION_EXPIRY_INTERVAL, packet.session_expiry_interval_seconds);
    encode_optional_u16_property!(dest, PROPERTY_KEY_RECEIVE_MAXIMUM, packet.receive_maximum);
    encode_optional_enum_property!(dest, PROPERTY_KEY_MAXIMUM_QOS, packet.maximum_qos);
    encode_optional_boolean_property!(dest, PROPERTY_KEY_RETAIN_AVAILABLE, packet.retain_available);
    encode_optional_u32_property!(dest, PROPERTY_KEY_MAXIMUM_PACKET_SIZE, packet.maximum_packet_size_bytes);
    encode_optional_string_property!(dest, PROPERTY_KEY_ASSIGNED_CLIENT_IDENTIFIER, packet.assigned_client_identifier);
    encode_optional_u16_property!(dest, PROPERTY_KEY_TOPIC_ALIAS_MAXIMUM, packet.topic_alias_maximum);

    if inclusion != PropertyInclusion::RequiredOnly {
        encode_optional_string_property!(dest, PROPERTY_KEY_REASON_STRING, packet.reason_string);
    }

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    encode_optional_boolean_property!(dest, PROPERTY_KEY_WILDCARD_SUBSCRIPTIONS_AVAILABLE, packet.wildcard_subscriptions_available);
    encode_optional_boolean_property!(dest, PROPERTY_KEY_SUBSCRIPTION_IDENTIFIERS_AVAILABLE, packet.subscription_identifiers_available);
    encode_optional_boolean_property!(dest, PROPERTY_KEY_SHARED_SUBSCRIPTIONS_AVAILABLE, packet.shared_subscriptions_available);
    encode_optional_u16_property!(dest, PROPERTY_KEY_SERVER_KEEP_ALIVE, packet.server_keep_alive);
    encode_optional_string_property!(dest, PROPERTY_KEY_RESPONSE_INFORMATION, packet.response_information);
    encode_optional_string_property!(dest, PROPERTY_KEY_SERVER_REFERENCE, packet.server_reference);
    encode_optional_string_property!(dest, PROPERTY_KEY_AUTHENTICATION_METHOD, packet.authentication_method);
    encode_optional_bytes_property!(dest, PROPERTY_KEY_AUTHENTICATION_DATA, packet.authentication_data);

    Ok(dest.len() - start)
}

fn decode_connack_properties(property_bytes: &[u8], packet : &mut ConnackPacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_SESSION_EXPIRY_INTERVAL => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, &mut packet.session_expiry_interval_seconds)?; }
            PROPERTY_KEY_RECEIVE_MAXIMUM => { mutable_property_bytes = decode_optional_u16(mutable_property_bytes, &mut packet.receive_maximum)?; }
            PROPERTY_KEY_MAXIMUM_QOS => { mutable_property_bytes = decode_optional_u8_as_enum(mutable_property_bytes, &mut packet.maximum_qos, convert_u8_to_quality_of_service)?; }
            PROPERTY_KEY_RETAIN_AVAILABLE => { mutable_property_bytes = decode_optional_u8_as_bool(mutable_property_bytes, &mut packet.retain_available)?; }
            PROPERTY_KEY_MAXIMUM_PACKET_SIZE => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, &mut packet.maximum_packet_size_bytes)?; }
            PROPERTY_KEY_ASSIGNED_CLIENT_IDENTIFIER => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.assigned_client_identifier)?; }
            PROPERTY_KEY_TOPIC_ALIAS_MAXIMUM => { mutable_property_bytes = decode_optional_u16(mutable_property_bytes, &mut packet.topic_alias_maximum)?; }
            PROPERTY_KEY_REASON_STRING => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.reason_string)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            PROPERTY_KEY_WILDCARD_SUBSCRIPTIONS_AVAILABLE => { mutable_property_bytes = decode_optional_u8_as_bool(mutable_property_bytes, &mut packet.wildcard_subscriptions_available)?; }
            PROPERTY_KEY_SUBSCRIPTION_IDENTIFIERS_AVAILABLE => { mutable_property_bytes = decode_optional_u8_as_bool(mutable_property_bytes, &mut packet.subscription_identifiers_available)?; }
            PROPERTY_KEY_SHARED_SUBSCRIPTIONS_AVAILABLE => { mutable_property_bytes = decode_optional_u8_as_bool(mutable_property_bytes, &mut packet.shared_subscriptions_available)?; }
            PROPERTY_KEY_SERVER_KEEP_ALIVE => { mutable_property_bytes = decode_optional_u16(mutable_property_bytes, &mut packet.server_keep_alive)?; }
            PROPERTY_KEY_RESPONSE_INFORMATION => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.response_information)?; }
            PROPERTY_KEY_SERVER_REFERENCE => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.server_reference)?; }
            PROPERTY_KEY_AUTHENTICATION_METHOD => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.authentication_method)?; }
            PROPERTY_KEY_AUTHENTICATION_DATA => { mutable_property_bytes = decode_optional_length_prefixed_bytes(mutable_property_bytes, &mut packet.authentication_data)?; }
            _ => {
                error!("ConnackPacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for connack packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_connack_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if first_byte != CONNACK_FIRST_BYTE {
        error!("ConnackPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for connack packet"));
    }

    let mut box_packet = Box::new(MqttPacket::Connack(ConnackPacket { ..Default::default() }));

    if let MqttPacket::Connack(packet) = box_packet.as_mut() {
        let mut mutable_body = packet_body;

        let mut flags : u8 = 0;
        mutable_body = decode_u8(mutable_body, &mut flags)?;

        if (flags & 0xFE) != 0 {
            error!("ConnackPacket Decode - invalid flags ({})", flags);
            return Err(MqttError::new_decoding_failure("invalid flags for connack packet"));
        }

        packet.session_present = flags == 1;

        if protocol_version != ProtocolVersion::Mqtt5 {
            let mut return_code : u8 = 0;
            mutable_body = decode_u8(mutable_body, &mut return_code)?;
            packet.reason_code = convert_311_return_code_to_connect_reason_code(return_code)?;

            if !mutable_body.is_empty() {
                error!("ConnackPacket Decode - nonzero remaining bytes after 3.x return code");
                return Err(MqttError::new_decoding_failure("nonzero remaining bytes after 3.x connack return code"));
            }

            return Ok(box_packet);
        }

        mutable_body = decode_u8_as_enum(mutable_body, &mut packet.reason_code, convert_u8_to_connect_reason_code)?;

        let mut properties_length : usize = 0;
        mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
        if properties_length != mutable_body.len() {
            error!("ConnackPacket Decode - property length does not match remaining packet length");
            return Err(MqttError::new_decoding_failure("property length does not match remaining packet length for connack packet"));
        }

        decode_connack_properties(mutable_body, packet)?;

        return Ok(box_packet);
    }

    panic!("ConnackPacket Decode - Internal error");
}

impl fmt::Display for ConnackPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConnackPacket {{")?;
        log_primitive_value!(self.session_present, f, "session_present");
        log_enum!(self.reason_code, f, "reason_code", connect_reason_code_to_str);
        log_optional_primitive_value!(self.session_expiry_interval_seconds, f, "session_expiry_interval_seconds", value);
        log_optional_primitive_value!(self.receive_maximum, f, "receive_maximum", value);
        log_optional_enum!(self.maximum_qos, f, "maximum_qos", value, quality_of_service_to_str);
        log_optional_primitive_value!(self.retain_available, f, "retain_available", value);
        log_optional_primitive_value!(self.maximum_packet_size_bytes, f, "maximum_packet_size_bytes", value);
        log_optional_string!(self.assigned_client_identifier, f, "assigned_client_identifier", value);
        log_optional_primitive_value!(self.topic_alias_maximum, f, "topic_alias_maximum", value);
        log_optional_string!(self.reason_string, f, "reason_string", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        log_optional_primitive_value!(self.wildcard_subscriptions_available, f, "wildcard_subscriptions_available", value);
        log_optional_primitive_value!(self.subscription_identifiers_available, f, "subscription_identifiers_available", value);
        log_optional_primitive_value!(self.shared_subscriptions_available, f, "shared_subscriptions_available", value);
        log_optional_primitive_value!(self.server_keep_alive, f, "server_keep_alive", value);
        log_optional_string!(self.response_information, f, "response_information", value);
        log_optional_string!(self.server_reference, f, "server_reference", value);
        log_optional_string!(self.authentication_method, f, "authentication_method", value);
        log_optional_binary_data_sensitive!(self.authentication_data, f, "authentication_data");
        write!(f, " }}")
    }
}
