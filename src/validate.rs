/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Semantic validation of packets prior to encoding.
//!
//! The codecs in this crate will faithfully write whatever they are given; validation is the
//! layer that rejects packets whose field values violate protocol requirements that are not
//! structurally enforced by the data model itself.

use crate::error::{MqttError, MqttResult};
use crate::mqtt::*;

use log::*;

const MAXIMUM_STRING_PROPERTY_LENGTH : usize = 65535;
const MAXIMUM_BINARY_PROPERTY_LENGTH : usize = 65535;

fn validate_string_length(value: &str, packet_type: PacketType, field_name: &str) -> MqttResult<()> {
    if value.len() > MAXIMUM_STRING_PROPERTY_LENGTH {
        error!("{} Validation - {} is too long", packet_type, field_name);
        return Err(MqttError::new_packet_validation(packet_type, "string field exceeds the maximum encodable length"));
    }

    Ok(())
}

fn validate_optional_string_length(value: &Option<String>, packet_type: PacketType, field_name: &str) -> MqttResult<()> {
    if let Some(value) = value {
        return validate_string_length(value, packet_type, field_name);
    }

    Ok(())
}

fn validate_optional_binary_length(value: &Option<Vec<u8>>, packet_type: PacketType, field_name: &str) -> MqttResult<()> {
    if let Some(value) = value {
        if value.len() > MAXIMUM_BINARY_PROPERTY_LENGTH {
            error!("{} Validation - {} is too long", packet_type, field_name);
            return Err(MqttError::new_packet_validation(packet_type, "binary field exceeds the maximum encodable length"));
        }
    }

    Ok(())
}

fn validate_user_properties(properties: &Option<Vec<UserProperty>>, packet_type: PacketType) -> MqttResult<()> {
    if let Some(properties) = properties {
        for property in properties {
            validate_string_length(&property.name, packet_type, "user property name")?;
            validate_string_length(&property.value, packet_type, "user property value")?;
        }
    }

    Ok(())
}

fn validate_nonzero_packet_id(packet_id: u16, packet_type: PacketType) -> MqttResult<()> {
    if packet_id == 0 {
        error!("{} Validation - packet id may not be zero", packet_type);
        return Err(MqttError::new_packet_validation(packet_type, "packet id may not be zero"));
    }

    Ok(())
}

fn validate_connect_packet(packet: &ConnectPacket) -> MqttResult<()> {
    let packet_type = PacketType::Connect;

    validate_optional_string_length(&packet.client_id, packet_type, "client_id")?;
    validate_optional_string_length(&packet.username, packet_type, "username")?;
    validate_optional_binary_length(&packet.password, packet_type, "password")?;
    validate_optional_string_length(&packet.authentication_method, packet_type, "authentication_method")?;
    validate_optional_binary_length(&packet.authentication_data, packet_type, "authentication_data")?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    if packet.receive_maximum == Some(0) {
        error!("ConnectPacket Validation - receive_maximum may not be zero");
        return Err(MqttError::new_packet_validation(packet_type, "receive_maximum may not be zero"));
    }

    if packet.maximum_packet_size_bytes == Some(0) {
        error!("ConnectPacket Validation - maximum_packet_size_bytes may not be zero");
        return Err(MqttError::new_packet_validation(packet_type, "maximum_packet_size_bytes may not be zero"));
    }

    if packet.authentication_data.is_some() && packet.authentication_method.is_none() {
        error!("ConnectPacket Validation - authentication_data requires authentication_method");
        return Err(MqttError::new_packet_validation(packet_type, "authentication_data requires authentication_method"));
    }

    if let Some(will) = &packet.will {
        if will.topic.is_empty() {
            error!("ConnectPacket Validation - will topic may not be empty");
            return Err(MqttError::new_packet_validation(packet_type, "will topic may not be empty"));
        }

        validate_string_length(&will.topic, packet_type, "will topic")?;
        validate_optional_string_length(&will.response_topic, packet_type, "will response_topic")?;
        validate_optional_string_length(&will.content_type, packet_type, "will content_type")?;
        validate_optional_binary_length(&will.correlation_data, packet_type, "will correlation_data")?;
        validate_user_properties(&will.user_properties, packet_type)?;
    }

    Ok(())
}

fn validate_connack_packet(packet: &ConnackPacket) -> MqttResult<()> {
    let packet_type = PacketType::Connack;

    validate_optional_string_length(&packet.assigned_client_identifier, packet_type, "assigned_client_identifier")?;
    validate_optional_string_length(&packet.reason_string, packet_type, "reason_string")?;
    validate_optional_string_length(&packet.response_information, packet_type, "response_information")?;
    validate_optional_string_length(&packet.server_reference, packet_type, "server_reference")?;
    validate_optional_string_length(&packet.authentication_method, packet_type, "authentication_method")?;
    validate_optional_binary_length(&packet.authentication_data, packet_type, "authentication_data")?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    if packet.receive_maximum == Some(0) {
        error!("ConnackPacket Validation - receive_maximum may not be zero");
        return Err(MqttError::new_packet_validation(packet_type, "receive_maximum may not be zero"));
    }

    if packet.maximum_packet_size_bytes == Some(0) {
        error!("ConnackPacket Validation - maximum_packet_size_bytes may not be zero");
        return Err(MqttError::new_packet_validation(packet_type, "maximum_packet_size_bytes may not be zero"));
    }

    Ok(())
}

fn validate_publish_packet(packet: &PublishPacket) -> MqttResult<()> {
    let packet_type = PacketType::Publish;

    if packet.qos == QualityOfService::AtMostOnce {
        if packet.packet_id != 0 {
            error!("PublishPacket Validation - QoS 0 publishes may not carry a packet id");
            return Err(MqttError::new_packet_validation(packet_type, "QoS 0 publishes may not carry a packet id"));
        }
    } else {
        validate_nonzero_packet_id(packet.packet_id, packet_type)?;
    }

    validate_string_length(&packet.topic, packet_type, "topic")?;
    validate_optional_string_length(&packet.response_topic, packet_type, "response_topic")?;
    validate_optional_string_length(&packet.content_type, packet_type, "content_type")?;
    validate_optional_binary_length(&packet.correlation_data, packet_type, "correlation_data")?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    if let Some(response_topic) = &packet.response_topic {
        if response_topic.contains(['#', '+']) {
            error!("PublishPacket Validation - response_topic may not contain wildcards");
            return Err(MqttError::new_packet_validation(packet_type, "response_topic may not contain wildcards"));
        }
    }

    Ok(())
}

fn validate_subscribe_packet(packet: &SubscribePacket) -> MqttResult<()> {
    let packet_type = PacketType::Subscribe;

    validate_nonzero_packet_id(packet.packet_id, packet_type)?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    if packet.subscriptions.is_empty() {
        error!("SubscribePacket Validation - subscription list may not be empty");
        return Err(MqttError::new_packet_validation(packet_type, "subscription list may not be empty"));
    }

    if packet.subscription_identifier == Some(0) {
        error!("SubscribePacket Validation - subscription_identifier may not be zero");
        return Err(MqttError::new_packet_validation(packet_type, "subscription_identifier may not be zero"));
    }

    for subscription in &packet.subscriptions {
        if subscription.topic_filter.is_empty() {
            error!("SubscribePacket Validation - topic filter may not be empty");
            return Err(MqttError::new_packet_validation(packet_type, "topic filter may not be empty"));
        }

        validate_string_length(&subscription.topic_filter, packet_type, "topic_filter")?;
    }

    Ok(())
}

fn validate_unsubscribe_packet(packet: &UnsubscribePacket) -> MqttResult<()> {
    let packet_type = PacketType::Unsubscribe;

    validate_nonzero_packet_id(packet.packet_id, packet_type)?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    if packet.topic_filters.is_empty() {
        error!("UnsubscribePacket Validation - topic filter list may not be empty");
        return Err(MqttError::new_packet_validation(packet_type, "topic filter list may not be empty"));
    }

    for topic_filter in &packet.topic_filters {
        if topic_filter.is_empty() {
            error!("UnsubscribePacket Validation - topic filter may not be empty");
            return Err(MqttError::new_packet_validation(packet_type, "topic filter may not be empty"));
        }

        validate_string_length(topic_filter, packet_type, "topic_filter")?;
    }

    Ok(())
}

fn validate_suback_packet(packet: &SubackPacket) -> MqttResult<()> {
    let packet_type = PacketType::Suback;

    validate_nonzero_packet_id(packet.packet_id, packet_type)?;
    validate_optional_string_length(&packet.reason_string, packet_type, "reason_string")?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    if packet.reason_codes.is_empty() {
        error!("SubackPacket Validation - reason code list may not be empty");
        return Err(MqttError::new_packet_validation(packet_type, "reason code list may not be empty"));
    }

    Ok(())
}

fn validate_unsuback_packet(packet: &UnsubackPacket) -> MqttResult<()> {
    let packet_type = PacketType::Unsuback;

    validate_nonzero_packet_id(packet.packet_id, packet_type)?;
    validate_optional_string_length(&packet.reason_string, packet_type, "reason_string")?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    if packet.reason_codes.is_empty() {
        error!("UnsubackPacket Validation - reason code list may not be empty");
        return Err(MqttError::new_packet_validation(packet_type, "reason code list may not be empty"));
    }

    Ok(())
}

fn validate_disconnect_packet(packet: &DisconnectPacket) -> MqttResult<()> {
    let packet_type = PacketType::Disconnect;

    validate_optional_string_length(&packet.reason_string, packet_type, "reason_string")?;
    validate_optional_string_length(&packet.server_reference, packet_type, "server_reference")?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    Ok(())
}

fn validate_auth_packet(packet: &AuthPacket) -> MqttResult<()> {
    let packet_type = PacketType::Auth;

    validate_optional_string_length(&packet.authentication_method, packet_type, "authentication_method")?;
    validate_optional_binary_length(&packet.authentication_data, packet_type, "authentication_data")?;
    validate_optional_string_length(&packet.reason_string, packet_type, "reason_string")?;
    validate_user_properties(&packet.user_properties, packet_type)?;

    Ok(())
}

/// Checks a packet's field values against protocol requirements that are independent of any
/// particular connection's negotiated settings.
pub fn validate_packet(packet: &MqttPacket) -> MqttResult<()> {
    match packet {
        MqttPacket::Connect(connect) => { validate_connect_packet(connect) }
        MqttPacket::Connack(connack) => { validate_connack_packet(connack) }
        MqttPacket::Publish(publish) => { validate_publish_packet(publish) }
        MqttPacket::Puback(puback) => {
            validate_nonzero_packet_id(puback.packet_id, PacketType::Puback)?;
            validate_optional_string_length(&puback.reason_string, PacketType::Puback, "reason_string")?;
            validate_user_properties(&puback.user_properties, PacketType::Puback)
        }
        MqttPacket::Pubrec(pubrec) => {
            validate_nonzero_packet_id(pubrec.packet_id, PacketType::Pubrec)?;
            validate_optional_string_length(&pubrec.reason_string, PacketType::Pubrec, "reason_string")?;
            validate_user_properties(&pubrec.user_properties, PacketType::Pubrec)
        }
        MqttPacket::Pubrel(pubrel) => {
            validate_nonzero_packet_id(pubrel.packet_id, PacketType::Pubrel)?;
            validate_optional_string_length(&pubrel.reason_string, PacketType::Pubrel, "reason_string")?;
            validate_user_properties(&pubrel.user_properties, PacketType::Pubrel)
        }
        MqttPacket::Pubcomp(pubcomp) => {
            validate_nonzero_packet_id(pubcomp.packet_id, PacketType::Pubcomp)?;
            validate_optional_string_length(&pubcomp.reason_string, PacketType::Pubcomp, "reason_string")?;
            validate_user_properties(&pubcomp.user_properties, PacketType::Pubcomp)
        }
        MqttPacket::Subscribe(subscribe) => { validate_subscribe_packet(subscribe) }
        MqttPacket::Suback(suback) => { validate_suback_packet(suback) }
        MqttPacket::Unsubscribe(unsubscribe) => { validate_unsubscribe_packet(unsubscribe) }
        MqttPacket::Unsuback(unsuback) => { validate_unsuback_packet(unsuback) }
        MqttPacket::Pingreq(_) | MqttPacket::Pingresp(_) => { Ok(()) }
        MqttPacket::Disconnect(disconnect) => { validate_disconnect_packet(disconnect) }
        MqttPacket::Auth(auth) => { validate_auth_packet(auth) }
    }
}
