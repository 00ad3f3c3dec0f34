/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::encode::EncodingContext;
use crate::encode::utils::*;
use crate::error::{MqttError, MqttResult};
use crate::mqtt::*;
use crate::mqtt::utils::*;

use log::*;
use std::fmt;

/// Data model of an [MQTT5 PINGREQ](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901195) packet.
///
/// Identical across all protocol versions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PingreqPacket {}

pub(crate) fn write_pingreq_packet(_: &PingreqPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    if !fits_within_maximum_packet_size(0, context.maximum_packet_size)? {
        debug!("PingreqPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    }

    dest.push(PINGREQ_FIRST_BYTE);
    encode_vli(0, dest)?;

    Ok(2)
}

pub(crate) fn decode_pingreq_packet(first_byte: u8, packet_body: &[u8]) -> MqttResult<Box<MqttPacket>> {
    if first_byte != PINGREQ_FIRST_BYTE {
        error!("PingreqPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for pingreq packet"));
    }

    if !packet_body.is_empty() {
        error!("PingreqPacket Decode - nonzero remaining length");
        return Err(MqttError::new_decoding_failure("nonzero remaining length for pingreq packet"));
    }

    Ok(Box::new(MqttPacket::Pingreq(PingreqPacket{})))
}

impl fmt::Display for PingreqPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PingreqPacket {{ }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::testing::*;

    #[test]
    fn pingreq_round_trip_encode_decode() {
        let packet = PingreqPacket {};

        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pingreq(packet.clone())));
        assert!(do_round_trip_encode_decode_test_versioned(&MqttPacket::Pingreq(packet), ProtocolVersion::Mqtt311));
    }

    #[test]
    fn pingreq_decode_failure_bad_fixed_header() {
        let packet = PingreqPacket {};

        do_fixed_header_flag_decode_failure_test(&MqttPacket::Pingreq(packet), 0x01);
    }

    #[test]
    fn pingreq_decode_failure_nonzero_remaining_length() {
        let packet = PingreqPacket {};

        let extend_length = | bytes: &[u8] | -> Vec<u8> {
            let mut clone = bytes.to_vec();
            clone[1] = 1;
            clone.push(0);
            clone
        };

        do_mutated_decode_failure_test(&MqttPacket::Pingreq(packet), extend_length);
    }
}
