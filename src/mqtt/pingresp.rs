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

/// Data model of an [MQTT5 PINGRESP](https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901200) packet.
///
/// Identical across all protocol versions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PingrespPacket {}

pub(crate) fn write_pingresp_packet(_: &PingrespPacket, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
    if !fits_within_maximum_packet_size(0, context.maximum_packet_size)? {
        debug!("PingrespPacket Encode - packet does not fit within the maximum packet size");
        return Ok(0);
    }

    dest.push(PINGRESP_FIRST_BYTE);
    encode_vli(0, dest)?;

    Ok(2)
}

pub(crate) fn decode_pingresp_packet(first_byte: u8, packet_body: &[u8]) -> MqttResult<Box<MqttPacket>> {
    if first_byte != PINGRESP_FIRST_BYTE {
        error!("PingrespPacket Decode - invalid first byte");
        return Err(MqttError::new_decoding_failure("invalid first byte for pingresp packet"));
    }

    if !packet_body.is_empty() {
        error!("PingrespPacket Decode - nonzero remaining length");
        return Err(MqttError::new_decoding_failure("nonzero remaining length for pingresp packet"));
    }

    Ok(Box::new(MqttPacket::Pingresp(PingrespPacket{})))
}

impl fmt::Display for PingrespPacket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PingrespPacket {{ }}")
    }
}
