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

/// Data model of an [MQTT5 PUBCOMP](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901151) packet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PubcompPacket {

    /// Id of the QoS 2 publish this packet corresponds to
    pub packet_id: u16,

    /// Success indicator or failure reason for the final step of a QoS 2 PUBLISH delivery process.
    ///
    /// Always Success on 3.x connections, which have no way to express a failure.
    pub reason_code: PubcompReasonCode,

    /// Additional diagnostic information about the final step of a QoS 2 PUBLISH delivery process.
    ///
    /// MQTT5 only.
    pub reason_string: Option<String>,

    /// Set of MQTT5 user properties included with the packet.
    ///
    /// MQTT5 only.
    pub user_properties: Option<Vec<UserProperty>>,
}

define_ack_packet_lengths_function!(compute_pubcomp_packet_lengths, PubcompPacket, PubcompReasonCode::Success);
define_ack_packet_encoding_function!(write_pubcomp_packet, PubcompPacket, "Pubcomp", compute_pubcomp_packet_lengths, PUBCOMP_FIRST_BYTE);

define_ack_packet_decode_properties_function!(decode_pubcomp_properties, PubcompPacket, "Pubcomp");
define_ack_packet_decode_function!(decode_pubcomp_packet, Pubcomp, PubcompPacket, "Pubcomp", PUBCOMP_FIRST_BYTE, convert_u8_to_pubcomp_reason_code, decode_pubcomp_properties);

define_ack_packet_display_trait!(PubcompPacket, "PubcompPacket", pubcomp_reason_code_to_str);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;

    #[test]
    fn pubcomp_round_trip_encode_decode_default() {
        let packet = PubcompPacket {
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pubcomp(packet)));
    }

    #[test]
    fn pubcomp_round_trip_encode_decode_required() {
        let packet = PubcompPacket {
            packet_id: 65535,
            reason_code: PubcompReasonCode::PacketIdentifierNotFound,
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pubcomp(packet)));
    }

    #[test]
    fn pubcomp_round_trip_encode_decode_all_properties() {
        let packet = PubcompPacket {
            packet_id: 65535,
            reason_code: PubcompReasonCode::PacketIdentifierNotFound,
            reason_string: Some("I tried so hard, and got so far".to_string()),
            user_properties: Some(vec!(
                UserProperty { name: "Valuable".to_string(), value: "Property".to_string() },
            )),
        };

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pubcomp(packet)));
    }

    #[test]
    fn pubcomp_round_trip_encode_decode_31() {
        let packet = PubcompPacket {
            packet_id: 33,
            ..Default::default()
        };

        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Pubcomp(packet), ProtocolVersion::Mqtt31));
    }

    #[test]
    fn pubcomp_decode_failure_bad_fixed_header() {
        let packet = PubcompPacket {
            packet_id: 65535,
            ..Default::default()
        };

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Pubcomp(packet), 0x06);
    }

    #[test]
    fn pubcomp_decode_failure_property_length_mismatch() {
        let packet = PubcompPacket {
            packet_id: 65535,
            reason_code: PubcompReasonCode::PacketIdentifierNotFound,
            reason_string: Some("derp".to_string()),
            ..Default::default()
        };

        let corrupt_property_length = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();

            // property section length byte no longer matches the actual section size
            clone[5] += 1;
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Pubcomp(packet), corrupt_property_length);
    }

    #[test]
    fn pubcomp_decode_failure_packet_size() {
        let packet = PubcompPacket {
            packet_id: 65535,
            reason_code: PubcompReasonCode::PacketIdentifierNotFound,
            reason_string: Some("Nobody home".to_string()),
            ..Default::default()
        };

        do_inbound_size_decode_failure_test(&MqttPacket::Pubcomp(packet));
    }
}
