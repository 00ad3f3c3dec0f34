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

/// Data model of an [MQTT5 PUBACK](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901121) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PubackPacket {

    /// Id of the QoS 1 publish this packet is acknowledging
    pub packet_id: u16,

    /// Success indicator or failure reason for the associated PUBLISH packet.
    ///
    /// Always Success on 3.x connections, which have no way to express a failure.
    pub reason_code: PubackReasonCode,

    /// Additional diagnostic information about the result of the PUBLISH attempt.
    ///
    /// MQTT5 only.  Dropped first (after user properties) when the packet must shrink to
    /// fit the connection's maximum packet size.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.  Dropped first when the packet must shrink to fit the connection's
    /// maximum packet size.
    pub user_properties: Option<Vec<UserProperty>>,
}

define_ack_packet_lengths_function!(compute_puback_packet_lengths, PubackPacket, PubackReasonCode::Success);
define_ack_packet_encoding_function!(write_puback_packet, PubackPacket, "Puback", compute_puback_packet_lengths, PUBACK_FIRST_BYTE);

define_ack_packet_decode_properties_function!(decode_puback_properties, PubackPacket, "Puback");
define_ack_packet_decode_function!(decode_puback_packet, Puback, PubackPacket, "Puback", PUBACK_FIRST_BYTE, convert_u8_to_puback_reason_code, decode_puback_properties);

define_ack_packet_display_trait!(PubackPacket, "PubackPacket", puback_reason_code_to_str);
