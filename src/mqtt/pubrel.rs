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

/// Data model of an [MQTT5 PUBREL](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901141) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PubrelPacket {

    /// Id of the QoS 2 publish this packet corresponds to
    pub packet_id: u16,

    /// Success indicator or failure reason for the middle step of the QoS 2 PUBLISH delivery process.
    ///
    /// Always Success on 3.x connections, which have no way to express a failure.
    pub reason_code: PubrelReasonCode,

    /// Additional diagnostic information about the ongoing QoS 2 PUBLISH delivery process.
    ///
    /// MQTT5 only.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,
}

define_ack_packet_lengths_function!(compute_pubrel_packet_lengths, PubrelPacket, PubrelReasonCode::Success);
define_ack_packet_encoding_function!(write_pubrel_packet, PubrelPacket, "Pubrel", compute_pubrel_packet_lengths, PUBREL_FIRST_BYTE);

define_ack_packet_decode_properties_function!(decode_pubrel_properties, PubrelPacket, "Pubrel");
define_ack_packet_decode_function!(decode_pubrel_packet, Pubrel, PubrelPacket, "Pubrel", PUBREL_FIRST_BYTE, convert_u8_to_pubrel_reason_code, decode_pubrel_properties);

define_ack_packet_display_trait!(PubrelPacket, "PubrelPacket", pubrel_reason_code_to_str);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;

    #[test]
    fn pubrel_round_trip_encode_decode_default() {
        let packet = PubrelPacket {
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pubrel(packet)));
    }

    #[test]
    fn pubrel_round_trip_encode_decode_required() {
        let packet = PubrelPacket {
            packet_id: 12,
            reason_code: PubrelReasonCode::PacketIdentifierNotFound,
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pubrel(packet)));
    }

    #[test]
    fn pubrel_round_trip_encode_decode_all_properties() {
        let packet = PubrelPacket {
            packet_id: 32768,
            reason_code: PubrelReasonCode::PacketIdentifierNotFound,
            reason_string: Some("Looked everywhere, nothing".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "g".to_string(), value: "h".to_string() },
                UserProperty { name: "ij".to_string(), value: "kl".to_string() },
            )),
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pubrel(packet)));
    }

    #[test]
    fn pubrel_round_trip_encode_decode_311() {
        let packet = PubrelPacket {
            packet_id: 4242,
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Pubrel(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn pubrel_decode_failure_bad_fixed_header() {
        let packet = PubrelPacket {
            packet_id: 12,
            ..Default::default()
        };

        // pubrel requires the 0x02 flag bits; flip them off via an additional set bit check
        do_fixed_header_flag_decode_failure_test(&MqttPacket::Pubrel(packet), 0x01);
    }

    #[test]
    fn pubrel_decode_failure_reason_code_invalid() {
        let packet = PubrelPacket {
            packet_id: 12,
            reason_code: PubrelReasonCode::PacketIdentifierNotFound,
            ..Default::default()
        };

        let corrupt_reason_code = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            clone[4] = 16;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Pubrel(packet), corrupt_reason_code);
    }

    #[test]
    fn pubrel_decode_failure_packet_size() {
        let packet = PubrelPacket {
            packet_id: 12,
            reason_code: PubrelReasonCode::PacketIdentifierNotFound,
            reason_string: Some("Lost in the mail".to_string()),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Pubrel(packet));
    }
}
