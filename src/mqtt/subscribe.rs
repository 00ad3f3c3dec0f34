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

/// Data model of an [MQTT5 SUBSCRIBE](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901161) packet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubscribePacket {

    /// Packet id associated with this SUBSCRIBE.  Must be non-zero.
    pub packet_id: u16,

    /// List of topic filter subscriptions that the client wishes to listen to
    pub subscriptions: Vec<Subscription>,

    /// A positive integer to associate with all subscriptions in this request.  Publish packets that
    /// match a subscription in this request should include this identifier in the resulting message.
    ///
    /// MQTT5 only.
    pub subscription_identifier: Option<u32>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,
}

fn compute_subscription_options_byte(subscription: &Subscription) -> u8 {
    let mut options = subscription.qos as u8;

    if subscription.no_local {
        options |= SUBSCRIPTION_OPTIONS_NO_LOCAL_MASK;
    }

    if subscription.retain_as_published {
        options |= SUBSCRIPTION_OPTIONS_RETAIN_AS_PUBLISHED_MASK;
    }

    options |= (subscription.retain_handling_type as u8) << SUBSCRIPTION_OPTIONS_RETAIN_HANDLING_SHIFT;

    options
}

fn compute_subscribe_packet_lengths(packet: &SubscribePacket, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
    let mut property_section_length = 0;

    if inclusion == PropertyInclusion::All {
        property_section_length += compute_user_properties_length(&packet.user_properties);
    }

    // the subscription identifier is semantically load-bearing and is never dropped
    if let Some(subscription_identifier) = packet.subscription_identifier {
        property_section_length += 1 + compute_variable_length_integer_encode_size(subscription_identifier as usize)?;
    }

    let mut total_remaining_length : usize = 2 + compute_variable_length_integer_encode_size(property_section_length)? + property_section_length;
    for subscription in &packet.subscriptions {
        total_remaining_length += 3 + subscription.topic_filter.len();
    }

    Ok((total_remaining_length as u32, property_section_length as u32))
}

pub(crate) fn write_subscribe_packet(packet: &SubscribePacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    let start = dest.len();

    if context.protocol_version != ProtocolVersion::Mqtt5 {
        let mut total_remaining_length : usize = 2;
        for subscription in &packet.subscriptions {
            total_remaining_length += 3 + subscription.topic_filter.len();
        }

        if !fits_within_maximum_packet_size(total_remaining_length as u32, context.maximum_packet_size)? {
            debug!("SubscribePacket Encode - packet does not fit within the maximum packet size");
            return Ok(0);
        }

        dest.push(SUBSCRIBE_FIRST_BYTE);
        encode_vli(total_remaining_length as u32, dest)?;
        write_u16(dest, packet.packet_id);

        // 3.x subscription options are just the requested qos
        for subscription in &packet.subscriptions {
            write_length_prefixed_string(dest, &subscription.topic_filter);
            dest.push(subscription.qos as u8);
        }

        return Ok(dest.len() - start);
    }

    let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { compute_subscribe_packet_lengths(packet, inclusion) })?;
    let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
        debug!("SubscribePacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    };

    dest.push(SUBSCRIBE_FIRST_BYTE);
    encode_vli(total_remaining_length, dest)?;
    write_u16(dest, packet.packet_id);
    encode_vli(property_section_length, dest)?;

    if let Some(subscription_identifier) = packet.subscription_identifier {
        dest.push(PROPERTY_KEY_SUBSCRIPTION_IDENTIFIER);
        encode_vli(subscription_identifier, dest)?;
    }

    if inclusion == PropertyInclusion::All {
        write_user_properties(dest, &packet.user_properties);
    }

    for subscription in &packet.subscriptions {
        write_length_prefixed_string(dest, &subscription.topic_filter);
        dest.push(compute_subscription_options_byte(subscription));
    }

    Ok(dest.len() - start)
}

fn decode_subscribe_properties(property_bytes: &[u8], packet : &mut SubscribePacket) -> MqttResult<()> {
    let mut mutable_property_bytes = property_bytes;

    while !mutable_property_bytes.is_empty() {
        let property_key = mutable_property_bytes[0];
        mutable_property_bytes = &mutable_property_bytes[1..];

        match property_key {
            PROPERTY_KEY_SUBSCRIPTION_IDENTIFIER => {
                if packet.subscription_identifier.is_some() {
                    error!("SubscribePacket Decode - duplicate subscription identifier");
                    return Err(MqttError::new_decoding_failure("duplicate subscription identifier for subscribe packet"));
                }

                let mut subscription_identifier : usize = 0;
                mutable_property_bytes = decode_vli_into_mutable(mutable_property_bytes, &mut subscription_identifier)?;
                packet.subscription_identifier = Some(subscription_identifier as u32);
            }
            PROPERTY_KEY_USER_PROPERTY => { mutable_property_bytes = decode_user_property(mutable_property_bytes, &mut packet.user_properties)?; }
            _ => {
                error!("SubscribePacket Decode - invalid property type ({})", property_key);
                return Err(MqttError::new_decoding_failure("invalid property type for subscribe packet"));
            }
        }
    }

    Ok(())
}

fn decode_subscription_options(options: u8, subscription: &mut Subscription) -> MqttResult<()> {
    // bits 6-7 are reserved
    if (options & 0xC0) != 0 {
        error!("SubscribePacket Decode - reserved subscription option bits set");
        return Err(MqttError::new_decoding_failure("reserved subscription option bits set"));
    }

    subscription.qos = convert_u8_to_quality_of_service(options & QOS_MASK)?;
    subscription.no_local = (options & SUBSCRIPTION_OPTIONS_NO_LOCAL_MASK) != 0;
    subscription.retain_as_published = (options & SUBSCRIPTION_OPTIONS_RETAIN_AS_PUBLISHED_MASK) != 0;
    subscription.retain_handling_type = convert_u8_to_retain_handling_type((options >> SUBSCRIPTION_OPTIONS_RETAIN_HANDLING_SHIFT) & 0x03)?;

    Ok(())
}

pub(crate) fn decode_subscribe_packet(first_byte: u8, packet_body: &[u8], protocol_version: ProtocolVersion) -> MqttResult<Box<MqttPacket>> {
    if first_byte != SUBSCRIBE_FIRST_BYTE {
        error!("SubscribePacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for subscribe packet"));
    }

    let mut box_packet = Box::new(MqttPacket::Subscribe(SubscribePacket { ..Default::default() }));

    if let MqttPacket::Subscribe(packet) = box_packet.as_mut() {
        let mut mutable_body = packet_body;
        mutable_body = decode_u16(mutable_body, &mut packet.packet_id)?;

        if protocol_version == ProtocolVersion::Mqtt5 {
            let mut properties_length : usize = 0;
            mutable_body = decode_vli_into_mutable(mutable_body, &mut properties_length)?;
            if properties_length > mutable_body.len() {
                error!("SubscribePacket Decode - property length exceeds overall packet length");
                return Err(MqttError::new_decoding_failure("property length exceeds overall packet length for subscribe packet"));
            }

            let properties_bytes = &mutable_body[..properties_length];
            mutable_body = &mutable_body[properties_length..];

            decode_subscribe_properties(properties_bytes, packet)?;
        }

        while !mutable_body.is_empty() {
            let mut subscription = Subscription {
                ..Default::default()
            };

            mutable_body = decode_length_prefixed_string(mutable_body, &mut subscription.topic_filter)?;

            let mut options : u8 = 0;
            mutable_body = decode_u8(mutable_body, &mut options)?;

            if protocol_version == ProtocolVersion::Mqtt5 {
                decode_subscription_options(options, &mut subscription)?;
            } else {
                // 3.x reserves everything above the qos bits
                if (options & !QOS_MASK) != 0 {
                    error!("SubscribePacket Decode - reserved 3.x subscription option bits set");
                    return Err(MqttError::new_decoding_failure("reserved 3.x subscription option bits set"));
                }

                subscription.qos = convert_u8_to_quality_of_service(options)?;
            }

            packet.subscriptions.push(subscription);
        }

        return Ok(box_packet);
    }

    panic!("SubscribePacket Decode - Internal error");
}

impl fmt::Display for SubscribePacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SubscribePacket {{")?;
        log_primitive_value!(self.packet_id, f, "packet_id");
        log_optional_primitive_value!(self.subscription_identifier, f, "subscription_identifier", value);
        log_user_properties!(self.user_properties, f, "user_properties", value);
        write!(f, " subscriptions: [")?;
        for (i, subscription) in self.subscriptions.iter().enumerate() {
            write!(f, " {}: {{ topic_filter:\"{}\" qos:{} no_local:{} retain_as_published:{} retain_handling_type:{} }}",
                i,
                subscription.topic_filter,
                quality_of_service_to_str(subscription.qos),
                subscription.no_local,
                subscription.retain_as_published,
                retain_handling_type_to_str(subscription.retain_handling_type))?;
        }
        write!(f, " ] }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;

    #[test]
    fn subscribe_round_trip_encode_decode_basic() {
        let packet = SubscribePacket {
            packet_id: 123,
            subscriptions: vec!(
                Subscription { topic_filter: "hello/world".to_string(), qos: QualityOfService::AtLeastOnce, ..Default::default() },
            ),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Subscribe(packet)));
    }

    #[test]
    fn subscribe_round_trip_encode_decode_all_fields() {
        let packet = SubscribePacket {
            packet_id: 123,
            subscriptions: vec!(
                Subscription {
                    topic_filter: "a/b/+/#".to_string(),
                    qos: QualityOfService::ExactlyOnce,
                    no_local: true,
                    retain_as_published: true,
                    retain_handling_type: RetainHandlingType::DontSend,
                },
                Subscription {
                    topic_filter: "c/d".to_string(),
                    qos: QualityOfService::AtMostOnce,
                    retain_handling_type: RetainHandlingType::SendOnSubscribeIfNew,
                    ..Default::default()
                },
            ),
            subscription_identifier: Some(262144),
            user_properties: Some(vec!(
                UserProperty { name: "Worms".to_string(), value: "inmyhead".to_string() },
            )),
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Subscribe(packet)));
    }

    #[test]
    fn subscribe_round_trip_encode_decode_311() {
        let packet = SubscribePacket {
            packet_id: 123,
            subscriptions: vec!(
                Subscription { topic_filter: "hello/world".to_string(), qos: QualityOfService::AtLeastOnce, ..Default::default() },
                Subscription { topic_filter: "dogs/+/cats".to_string(), qos: QualityOfService::ExactlyOnce, ..Default::default() },
            ),
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Subscribe(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn subscribe_decode_failure_bad_fixed_header() {
        let packet = SubscribePacket {
            packet_id: 123,
            subscriptions: vec!(
                Subscription { topic_filter: "hello/world".to_string(), ..Default::default() },
            ),
            ..Default::default()
        };

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Subscribe(packet), 0x01);
    }

    #[test]
    fn subscribe_decode_failure_invalid_qos() {
        let packet = SubscribePacket {
            packet_id: 123,
            subscriptions: vec!(
                Subscription { topic_filter: "hello/world".to_string(), ..Default::default() },
            ),
            ..Default::default()
        };

        let corrupt_subscription_qos = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();

            // the subscription options byte is last
            *clone.last_mut().unwrap() = 0x03;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Subscribe(packet), corrupt_subscription_qos);
    }

    #[test]
    fn subscribe_decode_failure_reserved_option_bits() {
        let packet = SubscribePacket {
            packet_id: 123,
            subscriptions: vec!(
                Subscription { topic_filter: "hello/world".to_string(), ..Default::default() },
            ),
            ..Default::default()
        };

        let corrupt_subscription_options = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            *clone.last_mut().unwrap() |= 0x80;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Subscribe(packet), corrupt_subscription_options);
    }

    #[test]
    fn subscribe_decode_failure_311_reserved_option_bits() {
        // packet id 1, filter "a", options byte with the no-local bit set
        let bytes = [0x82u8, 0x06u8, 0x00u8, 0x01u8, 0x00u8, 0x01u8, b'a', 0x04u8];

        let context = crate::decode::DecodingContext {
            protocol_version: ProtocolVersion::Mqtt311,
            ..Default::default()
        };

        let mut decoder = crate::decode::Decoder::new();
        let mut decoded_packets = std::collections::VecDeque::new();
        assert!(decoder.decode_bytes(&bytes, &context, &mut decoded_packets).is_err());
    }

    #[test]
    fn subscribe_decode_failure_packet_size() {
        let packet = SubscribePacket {
            packet_id: 123,
            subscriptions: vec!(
                Subscription { topic_filter: "hello/world".to_string(), qos: QualityOfService::AtLeastOnce, ..Default::default() },
            ),
            subscription_identifier: Some(1),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Subscribe(packet));
    }
}
