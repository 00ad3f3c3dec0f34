/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::decode::{ReadOutcome, read_packet_header_slice};
use crate::decode::utils::*;
use crate::encode::EncodingContext;
use crate::encode::utils::*;
use crate::error::{MqttError, MqttResult};
use crate::logging::*;
use crate::mqtt::*;
use crate::mqtt::utils::*;

use log::*;
use std::fmt;

const MQTT31_PROTOCOL_PREAMBLE : [u8; 9] = [0u8, 6u8, 77u8, 81u8, 73u8, 115u8, 100u8, 112u8, 3u8];
const MQTT311_PROTOCOL_PREAMBLE : [u8; 7] = [0u8, 4u8, 77u8, 81u8, 84u8, 84u8, 4u8];
const MQTT5_PROTOCOL_PREAMBLE : [u8; 7] = [0u8, 4u8, 77u8, 81u8, 84u8, 84u8, 5u8];

fn protocol_version_to_preamble(protocol_version: ProtocolVersion) -> &'static [u8] {
    match protocol_version {
        ProtocolVersion::Mqtt31 => { &MQTT31_PROTOCOL_PREAMBLE }
        ProtocolVersion::Mqtt311 => { &MQTT311_PROTOCOL_PREAMBLE }
        ProtocolVersion::Mqtt5 => { &MQTT5_PROTOCOL_PREAMBLE }
    }
}

/// Data model of an [MQTT5 CONNECT](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901033) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectPacket {

    /// The maximum time interval, in seconds, that is permitted to elapse between the point at which the client
    /// finishes transmitting one MQTT packet and the point it starts sending the next.
    pub keep_alive_interval_seconds: u16,

    /// Clean start setting.  If true, requests that the server abandon any existing session state.
    pub clean_start: bool,

    /// A unique string identifying the client to the server.  None encodes as a zero-length
    /// client id, asking the server to assign one.
    pub client_id: Option<String>,

    /// A string value that the server may use for client authentication and authorization.
    pub username: Option<String>,

    /// Opaque binary data that the server may use for client authentication and authorization.
    pub password: Option<Vec<u8>>,

    /// A time interval, in seconds, that the server should wait before ending a disconnected
    /// session.
    ///
    /// MQTT5 only.
    pub session_expiry_interval_seconds: Option<u32>,

    /// If set to true, requests that the server send response information in the subsequent CONNACK.
    ///
    /// MQTT5 only.
    pub request_response_information: Option<bool>,

    /// If set to true, requests that the server send additional diagnostic information in its
    /// responses to failed operations.
    ///
    /// MQTT5 only.
    pub request_problem_information: Option<bool>,

    /// Maximum number of in-flight QoS 1 and 2 messages the client is willing to handle.
    ///
    /// MQTT5 only.
    pub receive_maximum: Option<u16>,

    /// Maximum number of inbound topic aliases the client supports on this connection.
    ///
    /// MQTT5 only.
    pub topic_alias_maximum: Option<u16>,

    /// Maximum packet size, in bytes, that the client is willing to accept.
    ///
    /// MQTT5 only.
    pub maximum_packet_size_bytes: Option<u32>,

    /// A time interval, in seconds, that the server should wait before publishing the will
    /// message associated with this connection.
    ///
    /// MQTT5 only.
    pub will_delay_interval_seconds: Option<u32>,

    /// Definition of a message to be published when the connection's session is destroyed by
    /// the server or when the will delay interval has elapsed, whichever comes first.
    pub will: Option<PublishPacket>,

    /// Authentication method this connection should use.
    ///
    /// MQTT5 only.
    pub authentication_method: Option<String>,

    /// Initial authentication data for the exchange named by the authentication method.
    ///
    /// MQTT5 only.
    pub authentication_data: Option<Vec<u8>>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,
}

fn compute_connect_flags(packet: &ConnectPacket) -> u8 {
    let mut flags : u8 = 0;

    if packet.clean_start {
        flags |= CONNECT_PACKET_CLEAN_START_FLAG_MASK;
    }

    if let Some(will) = &packet.will {
        flags |= CONNECT_PACKET_HAS_WILL_FLAG_MASK;
        flags |= (will.qos as u8) << CONNECT_PACKET_WILL_QOS_FLAG_SHIFT;

        if will.retain {
            flags |= CONNECT_PACKET_WILL_RETAIN_FLAG_MASK;
        }
    }

    if packet.username.is_some() {
        flags |= CONNECT_PACKET_HAS_USERNAME_FLAG_MASK;
    }

    if packet.password.is_some() {
        flags |= CONNECT_PACKET_HAS_PASSWORD_FLAG_MASK;
    }

    flags
}

fn compute_connect_payload_minimum_length(packet: &ConnectPacket) -> usize {
    let mut payload_length : usize = 2;
    if let Some(client_id) = &packet.client_id {
        payload_length += client_id.len();
    }

    if let Some(will) = &packet.will {
        payload_length += 2 + will.topic.len();
        payload_length += 2;
        if let Some(will_payload) = &will.payload {
            payload_length += will_payload.len();
        }
    }

    if let Some(username) = &packet.username {
        payload_length += 2 + username.len();
    }

    if let Some(password) = &packet.password {
        payload_length += 2 + password.len();
    }

    payload_length
}

fn compute_connect_packet_lengths(packet: &ConnectPacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    add_optional_u32_property_length!(property_section_length, packet.session_expiry_interval_seconds);
    add_optional_u16_property_length!(property_section_length, packet.receive_maximum);
    add_optional_u32_property_length!(property_section_length, packet.maximum_packet_size_bytes);
    add_optional_u16_property_length!(property_section_length, packet.topic_alias_maximum);
    add_optional_u8_property_length!(property_section_length, packet.request_response_information);
    add_optional_u8_property_length!(property_section_length, packet.request_problem_information);
    add_optional_string_property_length!(property_section_length, packet.authentication_method);
    add_optional_bytes_property_length!(property_section_length, packet.authentication_data);

    let mut total_remaining_length : usize = MQTT5_PROTOCOL_PREAMBLE.len() + 3;
    total_remaining_length += compute_variable_length_integer_encode_size(property_section_length)?;
    total_remaining_length += property_section_length;
    total_remaining_length += compute_connect_payload_minimum_length(packet);

    if let Some(will) = &packet.will {
        let mut will_property_section_length = compute_user_properties_length(&will.user_properties);

        add_optional_u32_property_length!(will_property_section_length, packet.will_delay_interval_seconds);
        add_optional_u8_property_length!(will_property_section_length, will.payload_format);
        add_optional_u32_property_length!(will_property_section_length, will.message_expiry_interval_seconds);
        add_optional_string_property_length!(will_property_section_length, will.content_type);
        add_optional_string_property_length!(will_property_section_length, will.response_topic);
        add_optional_bytes_property_length!(will_property_section_length, will.correlation_data);

        total_remaining_length += compute_variable_length_integer_encode_size(will_property_section_length)?;
        total_remaining_length += will_property_section_length;
    }

    Ok((total_remaining_length as u32, property_section_length as u32))
}

fn write_connect_packet_payload(packet: &ConnectPacket, dest: &mut Vec<u8>) {
    write_length_prefixed_optional_string(dest, &packet.client_id);

    if let Some(will) = &packet.will {
        write_length_prefixed_string(dest, &will.topic);
        match &will.payload {
            Some(will_payload) => { write_length_prefixed_bytes(dest, will_payload); }
            None => { write_u16(dest, 0); }
        }
    }

    if let Some(username) = &packet.username {
        write_length_prefixed_string(dest, username);
    }

    if let Some(password) = &packet.password {
        write_length_prefixed_bytes(dest, password);
    }
}

pub(crate) fn write_connect_packet(packet: &ConnectPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();
    let preamble = protocol_version_to_preamble(context.protocol_version);

    if context.protocol_version != ProtocolVersion::Mqtt5 {
        let total_remaining_length = preamble.len() + 3 + compute_connect_payload_minimum_length(packet);

        if !fits_within_maximum_packet_size(total_remaining_length as u32, context.maximum_packet_size)? {
            debug!("ConnectPacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(CONNECT_FIRST_BYTE);
        encode_vli(total_remaining_length as u32, dest)?;
        dest.extend_from_slice(preamble);
        dest.push(compute_connect_flags(packet));
        write_u16(dest, packet.keep_alive_interval_seconds);
        write_connect_packet_payload(packet, dest);

        return Ok(dest.len() - start);
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_connect_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("ConnectPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(CONNECT_FIRST_BYTE);
    encode_vli(total_remaining_length, dest)?;
    dest.extend_from_slice(preamble);
    dest.push(compute_connect_flags(packet));
    write_u16(dest, packet.keep_alive_interval_seconds);
    encode_vli(property_section_length, dest)?;

    encode_optional_u32_property!(dest, PROPERTY_KEY_SESSION_EXPIRY_INTERVAL, packet.session_expiry_interval_seconds);
    encode_optional_u16_property!(dest, PROPERTY_KEY_RECEIVE_MAXIMUM, packet.receive_maximum);
    encode_optional_u32_property!(dest, PROPERTY_KEY_MAXIMUM_PACKET_SIZE, packet.maximum_packet_size_bytes);
    encode_optional_u16_property!(dest, PROPERTY_KEY_TOPIC_ALIAS_MAXIMUM, packet.topic_alias_maximum);
    encode_optional_boolean_property!(dest, PROPERTY_KEY_REQUEST_RESPONSE_INFORMATION, packet.request_response_information);
    encode_optional_boolean_property!(dest, PROPERTY_KEY_REQUEST_PROBLEM_INFORMATION, packet.request_problem_information);
    encode_optional_string_property!(dest, PROPERTY_KEY_AUTHENTICATION_METHOD, packet.authentication_method);
    encode_optional_bytes_property!(dest, PROPERTY_KEY_AUTHENTICATION_DATA, packet.authentication_data);

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    write_length_prefixed_optional_string(dest, &packet.client_id);

    if let Some(will) = &packet.will {
        let mut will_property_section_length = compute_user_properties_length(&will.user_properties);

        add_optional_u32_property_length!(will_property_section_length, packet.will_delay_interval_seconds);
        add_optional_u8_property_length!(will_property_section_length, will.payload_format);
        add_optional_u32_property_length!(will_property_section_length, will.message_expiry_interval_seconds);
        add_optional_string_property_length!(will_property_section_length, will.content_type);
        add_optional_string_property_length!(will_property_section_length, will.response_topic);
        add_optional_bytes_property_length!(will_property_section_length, will.correlation_data);

        encode_vli(will_property_section_length as u32, dest)?;

        encode_optional_u32_property!(dest, PROPERTY_KEY_WILL_DELAY_INTERVAL, packet.will_delay_interval_seconds);
        encode_optional_enum_property!(dest, PROPERTY_KEY_PAYLOAD_FORMAT_INDICATOR, will.payload_format);
        encode_optional_u32_property!(dest, PROPERTY_KEY_MESSAGE_EXPIRY_INTERVAL, will.message_expiry_interval_seconds);
        encode_optional_string_property!(dest, PROPERTY_KEY_CONTENT_TYPE, will.content_type);
        encode_optional_string_property!(dest, PROPERTY_KEY_RESPONSE_TOPIC, will.response_topic);
        encode_optional_bytes_property!(dest, PROPERTY_KEY_CORRELATION_DATA, will.correlation_data);
        write_user_properties(dest, &will.user_properties);

        write_length_prefixed_string(dest, &will.topic);
        match &will.payload {
            Some(will_payload) => { write_length_prefixed_bytes(dest, will_payload); }
            None => { write_u16(dest, 0); }
        }
    }

    if let Some(username) = &packet.username {
        write_length_prefixed_string(dest, username);
    }

    if let Some(password) = &packet.password {
        write_length_prefixed_bytes(dest, password);
    }

    Ok(dest.len() - start)
}

fn decode_connect_properties(property_bytes: &[u8], packet : &mut ConnectPacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_SESSION_EXPIRY_INTERVAL => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, &mut packet.session_expiry_interval_seconds)?; }
            PROPERTY_KEY_RECEIVE_MAXIMUM => { mutable_property_bytes = decode_optional_u16(mutable_property_bytes, &mut packet.receive_maximum)?; }
            PROPERTY_KEY_MAXIMUM_PACKET_SIZE => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, &mut packet.maximum_packet_size_bytes)?; }
            PROPERTY_KEY_TOPIC_ALIAS_MAXIMUM => { mutable_property_bytes = decode_optional_u16(mutable_property_bytes, &mut packet.topic_alias_maximum)?; }
            PROPERTY_KEY_REQUEST_RESPONSE_INFORMATION => { mutable_property_bytes = decode_optional_u8_as_bool(mutable_property_bytes, &mut packet.request_response_information)?; }
            PROPERTY_KEY_REQUEST_PROBLEM_INFORMATION => { mutable_property_bytes = decode_optional_u8_as_bool(mutable_property_bytes, &mut packet.request_problem_information)?; }
            PROPERTY_KEY_AUTHENTICATION_METHOD => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.authentication_method)?; }
            PROPERTY_KEY_AUTHENTICATION_DATA => { mutable_property_bytes = decode_optional_length_prefixed_bytes(mutable_property_bytes, &mut packet.authentication_data)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            _ => {
                error!("ConnectPacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for connect packet"));
            }
        }
    }

    Ok(())
}

fn decode_will_properties(property_bytes: &[u8], will: &mut PublishPacket, packet_will_delay: &mut Option<u32>) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_WILL_DELAY_INTERVAL => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, packet_will_delay)?; }
            PROPERTY_KEY_PAYLOAD_FORMAT_INDICATOR => { mutable_property_bytes = decode_optional_u8_as_enum(mutable_property_bytes, &mut will.payload_format, convert_u8_to_payload_format_indicator)?; }
            PROPERTY_KEY_MESSAGE_EXPIRY_INTERVAL => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, &mut will.message_expiry_interval_seconds)?; }
            PROPERTY_KEY_CONTENT_TYPE => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut will.content_type)?; }
            PROPERTY_KEY_RESPONSE_TOPIC => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut will.response_topic)?; }
            PROPERTY_KEY_CORRELATION_DATA => { mutable_property_bytes = decode_optional_length_prefixed_bytes(mutable_property_bytes, &mut will.correlation_data)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut will.user_properties)?; }
            _ => {
                error!("ConnectPacket Decode - invalid will property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid will property type for connect packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_connect_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if first_byte != CONNECT_FIRST_BYTE {
        error!("ConnectPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for connect packet"));
    }

    let preamble = protocol_version_to_preamble(protocol_version);
    if packet_body.len() < preamble.len() || &packet_body[..preamble.len()] != preamble {
        error!("ConnectPacket Decode - protocol preamble does not match the connection's protocol version");
        return Err(MqttError::new_decoding_failure("connect packet protocol preamble does not match the connection's protocol version"));
    }

    let mut box_packet = Box::new(MqttPacket::Connect(ConnectPacket { ..Default::default() }));

    if let MqttPacket::Connect(packet) = box_packet.as_mut() {
        let mut mutable_body = &packet_body[preamble.len()..];

        let mut flags : u8 = 0;
        mutable_body = decode_u8(mutable_body, &mut flags)?;

        if (flags & 0x01) != 0 {
            error!("ConnectPacket Decode - reserved flag bit is set");
            return Err(MqttError::new_decoding_failure("reserved flag bit is set in connect packet"));
        }

        packet.clean_start = (flags & CONNECT_PACKET_CLEAN_START_FLAG_MASK) != 0;

        let has_will = (flags & CONNECT_PACKET_HAS_WILL_FLAG_MASK) != 0;
        let will_qos = (flags >> CONNECT_PACKET_WILL_QOS_FLAG_SHIFT) & QOS_MASK;
        let will_retain = (flags & CONNECT_PACKET_WILL_RETAIN_FLAG_MASK) != 0;

        if !has_will && (will_qos != 0 || will_retain) {
            error!("ConnectPacket Decode - will flags set without a will");
            return Err(MqttError::new_decoding_failure("will flags set without a will in connect packet"));
        }

        mutable_body = decode_u16(mutable_body, &mut packet.keep_alive_interval_seconds)?;

        if protocol_version == ProtocolVersion::Mqtt5 {
            let mut properties_length : usize = 0;
            mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
            if properties_length > mutable_body.len() {
                error!("ConnectPacket Decode - property length exceeds overall packet length");
                return Err(MqttError::new_decoding_failure("property length exceeds overall packet length for connect packet"));
            }

            let properties_bytes = &mutable_body[..properties_length];
            mutable_body = &mutable_body[properties_length..];

            decode_connect_properties(properties_bytes, packet)?;
        }

        mutable_body = decode_length_prefixed_optional_string(mutable_body, &mut packet.client_id)?;

        if has_will {
            let mut will = PublishPacket {
                qos: convert_u8_to_quality_of_service(will_qos)?,
                retain: will_retain,
                ..Default::default()
            };

            if protocol_version == ProtocolVersion::Mqtt5 {
                let mut will_properties_length : usize = 0;
                mutable_body = decode_vli_into_mutable(mutable_body, &mut will_properties_length)?;
                if will_properties_length > mutable_body.len() {
                    error!("ConnectPacket Decode - will property length exceeds overall packet length");
                    return Err(MqttError::new_decoding_failure("will property length exceeds overall packet length for connect packet"));
                }

                let will_properties_bytes = &mutable_body[..will_properties_length];
                mutable_body = &mutable_body[will_properties_length..];

                decode_will_properties(will_properties_bytes, &mut will, &mut packet.will_delay_interval_seconds)?;
            }

            mutable_body = decode_length_prefixed_string(mutable_body, &mut will.topic)?;

            let mut will_payload_length : u16 = 0;
            mutable_body = decode_u16(mutable_body, &mut will_payload_length)?;
            if (will_payload_length as usize) > mutable_body.len() {
                error!("ConnectPacket Decode - will payload length exceeds overall packet length");
                return Err(MqttError::new_decoding_failure("will payload length exceeds overall packet length for connect packet"));
            }

            if will_payload_length > 0 {
                will.payload = Some(mutable_body[..(will_payload_length as usize)].to_vec());
            }
            mutable_body = &mutable_body[(will_payload_length as usize)..];

            packet.will = Some(will);
        }

        if (flags & CONNECT_PACKET_HAS_USERNAME_FLAG_MASK) != 0 {
            mutable_body = decode_optional_length_prefixed_string(mutable_body, &mut packet.username)?;
        }

        if (flags & CONNECT_PACKET_HAS_PASSWORD_FLAG_MASK) != 0 {
            mutable_body = decode_optional_length_prefixed_bytes(mutable_body, &mut packet.password)?;
        }

        if !mutable_body.is_empty() {
            error!("ConnectPacket Decode - nonzero remaining bytes after payload");
            return Err(MqttError::new_decoding_failure("nonzero remaining bytes after connect packet payload"));
        }

        return Ok(box_packet);
    }

    panic!("ConnectPacket Decode - Internal error");
}

/// Inspects the leading bytes of a new connection's inbound data stream and determines which
/// protocol version the peer's CONNECT packet was encoded with.
///
/// Consumes nothing; returns [`ReadOutcome::InsufficientData`] when the preamble has not fully
/// arrived yet, and an error when the bytes cannot be the start of a CONNECT packet.
pub fn peek_connect_protocol_version(bytes: &[u8]) -> MqttResult<ReadOutcome<ProtocolVersion>> {
    let (header, body) = match read_packet_header_slice(bytes)? {
        ReadOutcome::InsufficientData => { return Ok(ReadOutcome::InsufficientData); }
        ReadOutcome::Value(header_and_body) => { header_and_body }
    };

    if header.first_byte != CONNECT_FIRST_BYTE {
        error!("Connect Peek - leading packet is not a connect packet");
        return Err(MqttError::new_decoding_failure("leading packet of a new connection is not a connect packet"));
    }

    if body.len() < 2 {
        if (header.remaining_length as usize) < 2 {
            return Err(MqttError::new_decoding_failure("connect packet is too short to contain a protocol preamble"));
        }
        return Ok(ReadOutcome::InsufficientData);
    }

    let protocol_name_length = u16::from_be_bytes([body[0], body[1]]) as usize;
    let preamble_length = 2 + protocol_name_length + 1;

    if (header.remaining_length as usize) < preamble_length {
        return Err(MqttError::new_decoding_failure("connect packet is too short to contain a protocol preamble"));
    }

    if body.len() < preamble_length {
        return Ok(ReadOutcome::InsufficientData);
    }

    let preamble = &body[..preamble_length];
    if preamble == MQTT5_PROTOCOL_PREAMBLE {
        Ok(ReadOutcome::Value(ProtocolVersion::Mqtt5))
    } else if preamble == MQTT311_PROTOCOL_PREAMBLE {
        Ok(ReadOutcome::Value(ProtocolVersion::Mqtt311))
    } else if preamble == MQTT31_PROTOCOL_PREAMBLE {
        Ok(ReadOutcome::Value(ProtocolVersion::Mqtt31))
    } else {
        error!("Connect Peek - unrecognized protocol preamble");
        Err(MqttError::new_decoding_failure("unrecognized protocol preamble in connect packet"))
    }
}

impl fmt::Display for ConnectPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConnectPacket {{")?;
        log_primitive_value!(self.keep_alive_interval_seconds, f, "keep_alive_interval_seconds");
        log_primitive_value!(self.clean_start, f, "clean_start");
        log_optional_string!(self.client_id, f, "client_id", value);
        log_optional_string_sensitive!(self.username, f, "username");
        log_optional_binary_data_sensitive!(self.password, f, "password");
        log_optional_primitive_value!(self.session_expiry_interval_seconds, f, "session_expiry_interval_seconds", value);
        log_optional_primitive_value!(self.request_response_information, f, "request_response_information", value);
        log_optional_primitive_value!(self.request_problem_information, f, "request_problem_information", value);
        log_optional_primitive_value!(self.receive_maximum, f, "receive_maximum", value);
        log_optional_primitive_value!(self.topic_alias_maximum, f, "topic_alias_maximum", value);
        log_optional_primitive_value!(self.maximum_packet_size_bytes, f, "maximum_packet_size_bytes", value);
        log_optional_primitive_value!(self.will_delay_interval_seconds, f, "will_delay_interval_seconds", value);
        log_optional_string!(self.authentication_method, f, "authentication_method", value);
        log_optional_binary_data_sensitive!(self.authentication_data, f, "authentication_data");
        log_user_properties!(self.user_properties, f, "user_properties", value);
        if let Some(will) = &self.will {
            write!(f, " will: {}", will)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;
    use assert_matches::assert_matches;

    #[test]
    fn connect_round_trip_encode_decode_minimal() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Connect(packet)));
    }

    #[test]
    fn connect_round_trip_encode_decode_all_properties() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 60,
            clean_start: true,
            client_id: Some("NotAHackerDefinitely".to_string()),
            username: Some("SpaceDebris".to_string()),
            password: Some("TopSecret".as_bytes().to_vec()),
            session_expiry_interval_seconds: Some(3600),
            request_response_information: Some(true),
            request_problem_information: Some(false),
            receive_maximum: Some(50),
            topic_alias_maximum: Some(16),
            maximum_packet_size_bytes: Some(128 * 1024),
            will_delay_interval_seconds: Some(30),
            will: Some(PublishPacket {
                topic: "final/words".to_string(),
                qos: QualityOfService::AtLeastOnce,
                retain: true,
                payload: Some("farewell".as_bytes().to_vec()),
                payload_format: Some(PayloadFormatIndicator::Utf8),
                message_expiry_interval_seconds: Some(7200),
                response_topic: Some("final/words/response".to_string()),
                correlation_data: Some(vec!(1u8, 2u8, 5u8)),
                content_type: Some("text/plain".to_string()),
                user_properties: Some(vec!(
                    UserProperty { name: "willProp".to_string(), value: "willValue".to_string() },
                )),
                ..Default::default()
            }),
            authentication_method: Some("GSSAPI".to_string()),
            authentication_data: Some("token".as_bytes().to_vec()),
            user_properties: Some(vec!(
                UserProperty { name: "connectProp".to_string(), value: "connectValue".to_string() },
            )),
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Connect(packet)));
    }

    #[test]
    fn connect_round_trip_encode_decode_311_with_will() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 300,
            clean_start: true,
            client_id: Some("VeryOldClient".to_string()),
            username: Some("user".to_string()),
            password: Some("pass".as_bytes().to_vec()),
            will: Some(PublishPacket {
                topic: "last/will".to_string(),
                qos: QualityOfService::ExactlyOnce,
                payload: Some("goodbye".as_bytes().to_vec()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Connect(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn connect_round_trip_encode_decode_31_minimal() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 30,
            client_id: Some("EvenOlderClient".to_string()),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Connect(packet), ProtocolVersion::Mqtt31));
    }

    #[test]
    fn connect_decode_failure_bad_fixed_header() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            ..Default::default()
        };

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Connect(packet), 0x04);
    }

    #[test]
    fn connect_decode_failure_bad_protocol_version_byte() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            ..Default::default()
        };

        let corrupt_version = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();

            // version byte follows the fixed header and the 6-byte protocol name
            clone[8] = 7;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Connect(packet), corrupt_version);
    }

    #[test]
    fn connect_decode_failure_reserved_flag_bit() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            ..Default::default()
        };

        let set_reserved_flag = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            clone[9] |= 0x01;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Connect(packet), set_reserved_flag);
    }

    #[test]
    fn connect_decode_failure_will_flags_without_will() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            ..Default::default()
        };

        let set_will_retain_flag = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            clone[9] |= CONNECT_PACKET_WILL_RETAIN_FLAG_MASK;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Connect(packet), set_will_retain_flag);
    }

    #[test]
    fn connect_decode_failure_version_mismatch() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            ..Default::default()
        };

        let encoded = encode_packet_for_test(&MqttPacket::Connect(packet), ProtocolVersion::Mqtt5);

        let context = crate::decode::DecodingContext {
            protocol_version: ProtocolVersion::Mqtt311,
            ..Default::default()
        };

        let mut decoder = crate::decode::Decoder::new();
        let mut decoded_packets = std::collections::VecDeque::new();
        assert!(decoder.decode_bytes(&encoded, &context, &mut decoded_packets).is_err());
    }

    #[test]
    fn connect_decode_failure_packet_size() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            client_id: Some("ImportantClient".to_string()),
            session_expiry_interval_seconds: Some(60),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Connect(packet));
    }

    #[test]
    fn connect_encode_maximum_packet_size_drops_user_properties() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            client_id: Some("c".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "ALongUserPropertyName".to_string(), value: "AnEvenLongerUserPropertyValue".to_string() },
            )),
            ..Default::default()
        };

        let context = crate::encode::EncodingContext {
            maximum_packet_size: 20,
            ..Default::default()
        };

        let mut encoded = Vec::new();
        let bytes_written = crate::encode::write_packet(&MqttPacket::Connect(packet.clone()), &context, &mut encoded).unwrap();
        assert!(bytes_written > 0);
        assert!(bytes_written <= 20);

        let decoded = do_single_decode_test(&encoded, ProtocolVersion::Mqtt5, 1023);
        if let MqttPacket::Connect(decoded_connect) = *decoded {
            assert_eq!(packet.client_id, decoded_connect.client_id);
            assert_eq!(None, decoded_connect.user_properties);
        } else {
            panic!("expected a connect");
        }
    }

    #[test]
    fn connect_peek_protocol_version_success() {
        for protocol_version in [ProtocolVersion::Mqtt31, ProtocolVersion::Mqtt311, ProtocolVersion::Mqtt5] {
            let packet = ConnectPacket {
                keep_alive_interval_seconds: 1200,
                client_id: Some("PeekMe".to_string()),
                ..Default::default()
            };

            let encoded = encode_packet_for_test(&MqttPacket::Connect(packet), protocol_version);

            assert_matches!(peek_connect_protocol_version(&encoded), Ok(ReadOutcome::Value(peeked)) if peeked == protocol_version);
        }
    }

    #[test]
    fn connect_peek_protocol_version_insufficient_data() {
        let packet = ConnectPacket {
            keep_alive_interval_seconds: 1200,
            ..Default::default()
        };

        let encoded = encode_packet_for_test(&MqttPacket::Connect(packet), ProtocolVersion::Mqtt5);

        // every prefix shorter than the fixed header plus preamble is inconclusive
        for prefix_length in 0..9 {
            assert_matches!(peek_connect_protocol_version(&encoded[..prefix_length]), Ok(ReadOutcome::InsufficientData));
        }

        assert_matches!(peek_connect_protocol_version(&encoded[..9]), Ok(ReadOutcome::Value(ProtocolVersion::Mqtt5)));
    }

    #[test]
    fn connect_peek_protocol_version_failure_not_connect() {
        let bytes = [0xe0u8, 0x00u8];

        assert!(peek_connect_protocol_version(&bytes).is_err());
    }

    #[test]
    fn connect_peek_protocol_version_failure_unknown_preamble() {
        let bytes = [0x10u8, 0x10u8, 0x00u8, 0x04u8, b'H', b'T', b'T', b'P', 0x05u8];

        assert!(peek_connect_protocol_version(&bytes).is_err());
    }
}
