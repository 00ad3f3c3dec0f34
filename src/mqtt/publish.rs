/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::alias::OutboundAliasResolution;
use crate::decode::utils::*;
use crate::encode::EncodingContext;
use crate::encode::utils::*;
use crate::error::{MqttError, MqttResult};
use crate::logging::*;
use crate::mqtt::*;
use crate::mqtt::utils::*;

use log::*;
use std::fmt;

/// Data model of an [MQTT5 PUBLISH](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901100) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PublishPacket {

    /// Packet id of the publish.  Zero if and only if the QoS is AtMostOnce.
    pub packet_id: u16,

    /// Sent publishes - the topic this message should be published to.
    ///
    /// Received publishes - the topic this message was published to.  May be empty when the peer
    /// used a previously-established topic alias.
    pub topic: String,

    /// Sent publishes - QoS level this message should be delivered with.
    pub qos: QualityOfService,

    /// True if this is a resend of a QoS1+ publish that the peer never acknowledged
    pub duplicate: bool,

    /// True if this is a retained message
    pub retain: bool,

    /// The payload of the publish message
    pub payload: Option<Vec<u8>>,

    /// Property specifying the format of the payload data.
    ///
    /// MQTT5 only.
    pub payload_format: Option<PayloadFormatIndicator>,

    /// Maximum amount of time, in seconds, that the message should be cached by the broker before
    /// it is discarded as undeliverable.
    ///
    /// MQTT5 only.
    pub message_expiry_interval_seconds: Option<u32>,

    /// Topic alias the peer used on a received publish.  Outbound aliasing is driven by the
    /// encoding context's alias resolution, not by this field.
    ///
    /// MQTT5 only.
    pub topic_alias: Option<u16>,

    /// Opaque topic string intended to assist with request/response implementations.
    ///
    /// MQTT5 only.
    pub response_topic: Option<String>,

    /// Opaque binary data used to correlate between publish messages, as a potential method for
    /// request-response implementation.
    ///
    /// MQTT5 only.
    pub correlation_data: Option<Vec<u8>>,

    /// Subscription identifiers of all the subscriptions this message matched.  Only valid on
    /// received publishes; never sent by a client.
    ///
    /// MQTT5 only.
    pub subscription_identifiers: Option<Vec<u32>>,

    /// Property specifying the content type of the payload.
    ///
    /// MQTT5 only.
    pub content_type: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.  Dropped when the packet must shrink to fit the connection's maximum
    /// packet size.
    pub user_properties: Option<Vec<UserProperty>>,
}

fn compute_publish_first_byte(packet: &PublishPacket) -> u8 {
    let mut first_byte = PACKET_TYPE_PUBLISH << 4;

    if packet.duplicate {
        first_byte |= PUBLISH_PACKET_FIXED_HEADER_DUPLICATE_FLAG;
    }

    first_byte |= (packet.qos as u8) << 1;

    if packet.retain {
        first_byte |= PUBLISH_PACKET_FIXED_HEADER_RETAIN_FLAG;
    }

    first_byte
}

fn compute_publish_packet_lengths(packet: &PublishPacket, inclusion: PropertyInclusion, resolution: &OutboundAliasResolution) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    add_optional_u8_property_length!(property_section_length, packet.payload_format);
    add_optional_u32_property_length!(property_section_length, packet.message_expiry_interval_seconds);
    add_optional_u16_property_length!(property_section_length, resolution.alias);
    add_optional_string_property_length!(property_section_length, packet.response_topic);
    add_optional_bytes_property_length!(property_section_length, packet.correlation_data);
    add_optional_string_property_length!(property_section_length, packet.content_type);

    if let Some(subscription_identifiers) = &packet.subscription_identifiers {
        for subscription_identifier in subscription_identifiers {
            property_section_length += 1 + compute_variable_length_integer_encode_size(*subscription_identifier as usize)?;
        }
    }

    let mut total_remaining_length : usize = 2 + compute_variable_length_integer_encode_size(property_section_length)? + property_section_length;

    if !resolution.skip_topic {
        total_remaining_length += packet.topic.len();
    }

    if packet.qos != QualityOfService::AtMostOnce {
        total_remaining_length += 2;
    }

    if let Some(payload) = &packet.payload {
        total_remaining_length += payload.len();
    }

    Ok((total_remaining_length as u32, property_section_length as u32))
}

pub(crate) fn write_publish_packet(packet: &PublishPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    if context.protocol_version != ProtocolVersion::Mqtt5 {
        let mut total_remaining_length : usize = 2 + packet.topic.len();

        if packet.qos != QualityOfService::AtMostOnce {
            total_remaining_length += 2;
        }

        if let Some(payload) = &packet.payload {
            total_remaining_length += payload.len();
        }

        if !fits_within_maximum_packet_size(total_remaining_length as u32, context.maximum_packet_size)? {
            debug!("PublishPacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(compute_publish_first_byte(packet));
        encode_vli(total_remaining_length as u32, dest)?;
        write_length_prefixed_string(dest, &packet.topic);

        if packet.qos != QualityOfService::AtMostOnce {
            write_u16(dest, packet.packet_id);
        }

        if let Some(payload) = &packet.payload {
            dest.extend_from_slice(payload);
        }

        return Ok(dest.len() - start);
    }

    let resolution = &context.outbound_alias_resolution;

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_publish_packet_lengths(packet, inclusion, resolution) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("PublishPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(compute_publish_first_byte(packet));
    encode_vli(total_remaining_length, dest)?;

    if resolution.skip_topic {
        // topic fully replaced by an established alias
        write_u16(dest, 0);
    } else {
        write_length_prefixed_string(dest, &packet.topic);
    }

    if packet.qos != QualityOfService::AtMostOnce {
        write_u16(dest, packet.packet_id);
    }

    encode_vli(property_section_length, dest)?;

    encode_optional_enum_property!(dest, PROPERTY_KEY_PAYLOAD_FORMAT_INDICATOR, packet.payload_format);
    encode_optional_u32_property!(dest, PROPERTY_KEY_MESSAGE_EXPIRY_INTERVAL, packet.message_expiry_interval_seconds);
    encode_optional_u16_property!(dest, PROPERTY_KEY_TOPIC_ALIAS, resolution.alias);
    encode_optional_string_property!(dest, PROPERTY_KEY_RESPONSE_TOPIC, packet.response_topic);
    encode_optional_bytes_property!(dest, PROPERTY_KEY_CORRELATION_DATA, packet.correlation_data);

    if let Some(subscription_identifiers) = &packet.subscription_identifiers {
        for subscription_identifier in subscription_identifiers {
            dest.push(PROPERTY_KEY_SUBSCRIPTION_IDENTIFIER);
            encode_vli(*subscription_identifier, dest)?;
        }
    }

    encode_optional_string_property!(dest, PROPERTY_KEY_CONTENT_TYPE, packet.content_type);

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    if let Some(payload) = &packet.payload {
        dest.extend_from_slice(payload);
    }

    Ok(dest.len() - start)
}

fn decode_publish_properties(property_bytes: &[u8], packet : &mut PublishPacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_PAYLOAD_FORMAT_INDICATOR => { mutable_property_bytes = decode_optional_u8_as_enum(mutable_property_bytes, &mut packet.payload_format, convert_u8_to_payload_format_indicator)?; }
            PROPERTY_KEY_MESSAGE_EXPIRY_INTERVAL => { mutable_property_bytes = decode_optional_u32(mutable_property_bytes, &mut packet.message_expiry_interval_seconds)?; }
            PROPERTY_KEY_TOPIC_ALIAS => { mutable_property_bytes = decode_optional_u16(mutable_property_bytes, &mut packet.topic_alias)?; }
            PROPERTY_KEY_RESPONSE_TOPIC => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.response_topic)?; }
            PROPERTY_KEY_CORRELATION_DATA => { mutable_property_bytes = decode_optional_length_prefixed_bytes(mutable_property_bytes, &mut packet.correlation_data)?; }
            PROPERTY_KEY_SUBSCRIPTION_IDENTIFIER => {
                let mut subscription_identifier : usize = 0;
                mutable_property_bytes = decode_vli_into_mutable(mutable_property_bytes, &mut subscription_identifier)?;

                if packet.subscription_identifiers.is_none() {
                    packet.subscription_identifiers = Some(Vec::new());
                }

                if let Some(subscription_identifiers) = &mut packet.subscription_identifiers {
                    subscription_identifiers.push(subscription_identifier as u32);
                }
            }
            PROPERTY_KEY_CONTENT_TYPE => { mutable_property_bytes = decode_optional_length_prefixed_string(mutable_property_bytes, &mut packet.content_type)?; }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            _ => {
                error!("PublishPacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for publish packet"));
            }
        }
    }

    Ok(())
}

pub(crate) fn decode_publish_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    let mut box_packet = Box::new(MqttPacket::Publish(PublishPacket { ..Default::default() }));

    if let MqttPacket::Publish(packet) = box_packet.as_mut() {
        packet.duplicate = (first_byte & PUBLISH_PACKET_FIXED_HEADER_DUPLICATE_FLAG) != 0;
        packet.retain = (first_byte & PUBLISH_PACKET_FIXED_HEADER_RETAIN_FLAG) != 0;
        packet.qos = convert_u8_to_quality_of_service((first_byte >> 1) & QOS_MASK)?;

        if packet.qos == QualityOfService::AtMostOnce && packet.duplicate {
            error!("PublishPacket Decode - duplicate flag set on a QoS 0 publish");
            return Err(MqttError::new_decoding_failure("duplicate flag set on a QoS 0 publish"));
        }

        let mut mutable_body = packet_body;
        mutable_body = decode_length_prefixed_string(mutable_body, &mut packet.topic)?;

        if packet.qos != QualityOfService::AtMostOnce {
            mutable_body = decode_u16(mutable_body, &mut packet.packet_id)?;
        }

        if protocol_version == ProtocolVersion::Mqtt5 {
            let mut properties_length : usize = 0;
            mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
            if properties_length > mutable_body.len() {
                error!("PublishPacket Decode - property length exceeds overall packet length");
                return Err(MqttError::new_decoding_failure("property length exceeds overall packet length for publish packet"));
            }

            let properties_bytes = &mutable_body[..properties_length];
            mutable_body = &mutable_body[properties_length..];

            decode_publish_properties(properties_bytes, packet)?;
        }

        if !mutable_body.is_empty() {
            packet.payload = Some(mutable_body.to_vec());
        }

        return Ok(box_packet);
    }

    panic!("PublishPacket Decode - Internal error");
}

impl fmt::Display for PublishPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublishPacket {{")?;
        log_primitive_value!(self.packet_id, f, "packet_id");
        log_string!(self.topic, f, "topic");
        log_enum!(self.qos, f, "qos", quality_of_service_to_str);
        log_primitive_value!(self.duplicate, f, "duplicate");
        log_primitive_value!(self.retain, f, "retain");
        log_optional_binary_data!(self.payload, f, "payload", value);
        log_optional_enum!(self.payload_format, f, "payload_format", value, payload_format_indicator_to_str);
        log_optional_primitive_value!(self.message_expiry_interval_seconds, f, "message_expiry_interval_seconds", value);
        log_optional_primitive_value!(self.topic_alias, f, "topic_alias", value);
        log_optional_string!(self.response_topic, f, "response_topic", value);
        log_optional_binary_data!(self.correlation_data, f, "correlation_data", value);
        if let Some(subscription_identifiers) = &self.subscription_identifiers {
            write!(f, " subscription_identifiers: [")?;
            for (i, subscription_identifier) in subscription_identifiers.iter().enumerate() {
                write!(f, " {}: {}", i, subscription_identifier)?;
            }
            write!(f, " ]")?;
        }
        log_optional_string!(self.content_type, f, "content_type", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;
    use crate::encode::write_packet;

    #[test]
    fn publish_round_trip_encode_decode_qos0_minimal() {
        let packet = PublishPacket {
            topic: "hello/world".to_string(),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Publish(packet)));
    }

    #[test]
    fn publish_round_trip_encode_decode_qos1_with_payload() {
        let packet = PublishPacket {
            packet_id: 47,
            topic: "hello/world".to_string(),
            qos: QualityOfService::AtLeastOnce,
            duplicate: true,
            payload: Some("a transient message".as_bytes().to_vec()),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Publish(packet)));
    }

    #[test]
    fn publish_round_trip_encode_decode_qos2_all_properties() {
        let packet = PublishPacket {
            packet_id: 1023,
            topic: "pub/sub/is/fun".to_string(),
            qos: QualityOfService::ExactlyOnce,
            retain: true,
            payload: Some(vec!(0u8, 1u8, 2u8, 3u8, 4u8, 5u8, 6u8, 7u8)),
            payload_format: Some(PayloadFormatIndicator::Bytes),
            message_expiry_interval_seconds: Some(3600),
            response_topic: Some("response/topic".to_string()),
            correlation_data: Some("correlated".as_bytes().to_vec()),
            subscription_identifiers: Some(vec!(1, 127, 16384)),
            content_type: Some("application/octet-stream".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "name1".to_string(), value: "value1".to_string() },
                UserProperty { name: "name2".to_string(), value: "value2".to_string() },
            )),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Publish(packet)));
    }

    #[test]
    fn publish_round_trip_encode_decode_311() {
        let packet = PublishPacket {
            packet_id: 77,
            topic: "old/school".to_string(),
            qos: QualityOfService::AtLeastOnce,
            retain: true,
            payload: Some("still works".as_bytes().to_vec()),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Publish(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn publish_round_trip_encode_decode_31_qos0() {
        let packet = PublishPacket {
            topic: "older/school".to_string(),
            payload: Some(vec!(1u8, 2u8, 3u8)),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Publish(packet), ProtocolVersion::Mqtt31));
    }

    #[test]
    fn publish_encode_applies_outbound_topic_alias() {
        let packet = PublishPacket {
            topic: "aliased/topic".to_string(),
            ..Default::default()
        };

        let context = EncodingContext {
            outbound_alias_resolution: OutboundAliasResolution {
                skip_topic: false,
                alias: Some(5),
            },
            ..Default::default()
        };

        let mut encoded = Vec::new();
        assert!(write_packet(&MqttPacket::Publish(packet.clone()), &context, &mut encoded).unwrap() > 0);

        let decoded = do_single_decode_test(&encoded, ProtocolVersion::Mqtt5, 1023);
        if let MqttPacket::Publish(decoded_publish) = *decoded {
            assert_eq!("aliased/topic", decoded_publish.topic);
            assert_eq!(Some(5), decoded_publish.topic_alias);
        } else {
            panic!("expected a publish");
        }
    }

    #[test]
    fn publish_encode_skips_topic_for_established_alias() {
        let packet = PublishPacket {
            topic: "aliased/topic".to_string(),
            ..Default::default()
        };

        let context = EncodingContext {
            outbound_alias_resolution: OutboundAliasResolution {
                skip_topic: true,
                alias: Some(5),
            },
            ..Default::default()
        };

        let mut encoded = Vec::new();
        let bytes_written = write_packet(&MqttPacket::Publish(packet.clone()), &context, &mut encoded).unwrap();
        assert!(bytes_written > 0);

        // skipping the topic must save exactly the topic's byte length
        let mut unaliased = Vec::new();
        let full_context = EncodingContext {
            outbound_alias_resolution: OutboundAliasResolution {
                skip_topic: false,
                alias: Some(5),
            },
            ..Default::default()
        };
        let unaliased_bytes_written = write_packet(&MqttPacket::Publish(packet.clone()), &full_context, &mut unaliased).unwrap();
        assert_eq!(unaliased_bytes_written, bytes_written + packet.topic.len());

        let decoded = do_single_decode_test(&encoded, ProtocolVersion::Mqtt5, 1023);
        if let MqttPacket::Publish(decoded_publish) = *decoded {
            assert_eq!("", decoded_publish.topic);
            assert_eq!(Some(5), decoded_publish.topic_alias);
        } else {
            panic!("expected a publish");
        }
    }

    #[test]
    fn publish_decode_failure_invalid_qos() {
        let packet = PublishPacket {
            topic: "hello/world".to_string(),
            ..Default::default()
        };

        // qos bits = 3
        do_fixed_header_flag_decode_failure_test(&MqttPacket::Publish(packet), 0x06);
    }

    #[test]
    fn publish_decode_failure_qos0_duplicate() {
        let packet = PublishPacket {
            topic: "hello/world".to_string(),
            ..Default::default()
        };

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Publish(packet), PUBLISH_PACKET_FIXED_HEADER_DUPLICATE_FLAG);
    }

    #[test]
    fn publish_decode_failure_duplicate_property() {
        let packet = PublishPacket {
            topic: "hello/world".to_string(),
            message_expiry_interval_seconds: Some(1),
            content_type: Some("json".to_string()),
            ..Default::default()
        };

        let duplicate_message_expiry = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();

            // splice a second message expiry property into the property section
            let property_section_start = 1 + 1 + 2 + "hello/world".len();
            clone[1] += 5;
            clone[property_section_start] += 5;
            let insert_at = property_section_start + 1;
            for (offset, byte) in [PROPERTY_KEY_MESSAGE_EXPIRY_INTERVAL, 0, 0, 0, 2].iter().enumerate() {
                clone.insert(insert_at + offset, *byte);
            }
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Publish(packet), duplicate_message_expiry);
    }

    #[test]
    fn publish_decode_failure_packet_size() {
        let packet = PublishPacket {
            topic: "hello/world".to_string(),
            payload: Some(vec!(0u8; 128)),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Publish(packet));
    }

    #[test]
    fn publish_encode_maximum_packet_size_drops_user_properties() {
        let packet = PublishPacket {
            topic: "t".to_string(),
            payload: Some(vec!(1u8, 2u8, 3u8)),
            user_properties: Some(vec!(
                UserProperty { name: "ALongUserPropertyName".to_string(), value: "AnEvenLongerUserPropertyValue".to_string() },
            )),
            ..Default::default()
        };

        let context = EncodingContext {
            maximum_packet_size: 10,
            ..Default::default()
        };

        let mut encoded = Vec::new();
        let bytes_written = write_packet(&MqttPacket::Publish(packet.clone()), &context, &mut encoded).unwrap();
        assert!(bytes_written > 0);
        assert!(bytes_written <= 10);

        let decoded = do_single_decode_test(&encoded, ProtocolVersion::Mqtt5, 1023);
        if let MqttPacket::Publish(decoded_publish) = *decoded {
            assert_eq!(packet.topic, decoded_publish.topic);
            assert_eq!(packet.payload, decoded_publish.payload);
            assert_eq!(None, decoded_publish.user_properties);
        } else {
            panic!("expected a publish");
        }
    }
}
