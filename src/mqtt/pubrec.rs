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

/// Data model of an [MQTT5 PUBREC](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901131) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PubrecPacket {

    /// Id of the QoS 2 publish this packet corresponds to
    pub packet_id: u16,

    /// Success indicator or failure reason for the initial step of the QoS 2 PUBLISH delivery process.
    ///
    /// Always Success on 3.x connections, which have no way to express a failure.
    pub reason_code: PubrecReasonCode,

    /// Additional diagnostic information about the result of the PUBLISH attempt.
    ///
    /// MQTT5 only.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,
}

define_ack_packet_lengths_function!(compute_pubrec_packet_lengths, PubrecPacket, PubrecReasonCode::Success);
define_ack_packet_encoding_function!(write_pubrec_packet, PubrecPacket, "Pubrec", compute_pubrec_packet_lengths, PUBREC_FIRST_BYTE);

define_ack_packet_decode_properties_function!(decode_pubrec_properties, PubrecPacket, "Pubrec");
define_ack_packet_decode_function!(decode_pubrec_packet, Pubrec, PubrecPacket, "Pubrec", PUBREC_FIRST_BYTE, convert_u8_to_pubrec_reason_code, decode_pubrec_properties);

define_ack_packet_display_trait!(PubrecPacket, "PubrecPacket", pubrec_reason_code_to_str);
