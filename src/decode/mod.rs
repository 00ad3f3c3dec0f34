/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
Module containing the crate's packet decoding entry points: fixed-header readers usable
on partial data, whole-packet reads over fragmented buffer sequences, and a streaming
decoder that incrementally consumes a connection's inbound byte stream.
 */

pub(crate) mod utils;

use crate::buffer::SequenceCursor;
use crate::error::{MqttError, MqttResult};
use crate::logging::log_packet;
use crate::mqtt::*;
use crate::mqtt::auth::decode_auth_packet;
use crate::mqtt::connack::decode_connack_packet;
use crate::mqtt::connect::decode_connect_packet;
use crate::mqtt::disconnect::decode_disconnect_packet;
use crate::mqtt::pingreq::decode_pingreq_packet;
use crate::mqtt::pingresp::decode_pingresp_packet;
use crate::mqtt::puback::decode_puback_packet;
use crate::mqtt::pubcomp::decode_pubcomp_packet;
use crate::mqtt::publish::decode_publish_packet;
use crate::mqtt::pubrec::decode_pubrec_packet;
use crate::mqtt::pubrel::decode_pubrel_packet;
use crate::mqtt::suback::decode_suback_packet;
use crate::mqtt::subscribe::decode_subscribe_packet;
use crate::mqtt::unsuback::decode_unsuback_packet;
use crate::mqtt::unsubscribe::decode_unsubscribe_packet;
use crate::mqtt::utils::*;

use self::utils::*;

use log::*;

use std::collections::VecDeque;

/// Outcome of a read operation against data that may still be arriving.
///
/// Running out of bytes mid-value is an expected condition, not an error; a read that
/// reports `InsufficientData` consumes nothing and may be retried verbatim once more
/// data is available.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadOutcome<T> {

    /// Not enough bytes are available yet to complete the read
    InsufficientData,

    /// The read completed; the wrapped value was fully consumed from the input
    Value(T),
}

/// An MQTT packet's fixed header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PacketHeader {

    /// First byte of the packet: packet type in the upper nibble, flags in the lower
    pub first_byte: u8,

    /// Length, in bytes, of everything after the fixed header
    pub remaining_length: u32,

    /// Length, in bytes, of the fixed header itself
    pub header_length: usize,
}

impl PacketHeader {

    /// Total length, in bytes, of the packet this header describes
    pub fn total_length(&self) -> usize {
        self.header_length + self.remaining_length as usize
    }
}

/// Contextual information the decoder needs beyond the bytes themselves
#[derive(Copy, Clone, Debug, Default)]
pub struct DecodingContext {

    /// MQTT protocol version to decode against
    pub protocol_version: ProtocolVersion,

    /// Maximum total packet size, in bytes, this endpoint is willing to accept.  Zero
    /// means unlimited.  Oversized inbound packets fail decoding as soon as the fixed
    /// header reveals their size.
    pub maximum_packet_size: u32,
}

/// Reads a variable length integer from the cursor.  On insufficient data the cursor is
/// restored to its starting position.
pub fn read_variable_length_integer(cursor: &mut SequenceCursor) -> MqttResult<ReadOutcome<u32>> {
    let snapshot = cursor.position();

    let mut value: u32 = 0;
    let mut shift: u32 = 0;

    for _ in 0..4 {
        let Some(byte) = cursor.try_read_u8() else {
            cursor.seek(snapshot);
            return Ok(ReadOutcome::InsufficientData);
        };

        value |= ((byte & 0x7F) as u32) << shift;
        shift += 7;

        if (byte & 0x80) == 0 {
            return Ok(ReadOutcome::Value(value));
        }
    }

    cursor.seek(snapshot);
    error!("Packet Decode - invalid variable length integer (fifth byte needed)");
    Err(MqttError::new_decoding_failure("invalid variable length integer"))
}

/// Reads a packet's fixed header from the cursor.  On insufficient data the cursor is
/// restored to its starting position.
pub fn read_packet_header(cursor: &mut SequenceCursor) -> MqttResult<ReadOutcome<PacketHeader>> {
    let snapshot = cursor.position();
    let start_consumed = cursor.consumed();

    let Some(first_byte) = cursor.try_read_u8() else {
        return Ok(ReadOutcome::InsufficientData);
    };

    match read_variable_length_integer(cursor) {
        Ok(ReadOutcome::Value(remaining_length)) => {
            Ok(ReadOutcome::Value(PacketHeader {
                first_byte,
                remaining_length,
                header_length: cursor.consumed() - start_consumed,
            }))
        }
        Ok(ReadOutcome::InsufficientData) => {
            cursor.seek(snapshot);
            Ok(ReadOutcome::InsufficientData)
        }
        Err(error) => {
            cursor.seek(snapshot);
            Err(error)
        }
    }
}

/// Reads a big-endian u16-length-prefixed utf-8 string from the cursor.  On insufficient
/// data the cursor is restored to its starting position.
pub fn read_length_prefixed_string(cursor: &mut SequenceCursor) -> MqttResult<ReadOutcome<String>> {
    let snapshot = cursor.position();

    let Some(value_length) = cursor.try_read_u16() else {
        return Ok(ReadOutcome::InsufficientData);
    };

    let mut scratch = Vec::with_capacity(value_length as usize);
    if !cursor.try_copy_to(value_length as usize, &mut scratch) {
        cursor.seek(snapshot);
        return Ok(ReadOutcome::InsufficientData);
    }

    match String::from_utf8(scratch) {
        Ok(value) => { Ok(ReadOutcome::Value(value)) }
        Err(error) => {
            cursor.seek(snapshot);
            error!("Packet Decode - length-prefixed string is not valid utf-8");
            Err(MqttError::new_decoding_failure(error))
        }
    }
}

/// Reads a big-endian u16-length-prefixed binary value from the cursor.  On insufficient
/// data the cursor is restored to its starting position.
pub fn read_length_prefixed_binary(cursor: &mut SequenceCursor) -> MqttResult<ReadOutcome<Vec<u8>>> {
    let snapshot = cursor.position();

    let Some(value_length) = cursor.try_read_u16() else {
        return Ok(ReadOutcome::InsufficientData);
    };

    let mut value = Vec::with_capacity(value_length as usize);
    if !cursor.try_copy_to(value_length as usize, &mut value) {
        cursor.seek(snapshot);
        return Ok(ReadOutcome::InsufficientData);
    }

    Ok(ReadOutcome::Value(value))
}

/// Reads a packet's fixed header from a fragmented buffer sequence without consuming
/// anything.
pub fn peek_packet_header(segments: &[&[u8]]) -> MqttResult<ReadOutcome<PacketHeader>> {
    let mut cursor = SequenceCursor::new(segments);
    read_packet_header(&mut cursor)
}

// Slice-based header read used where packet bytes are already contiguous
pub(crate) fn read_packet_header_slice(bytes: &[u8]) -> MqttResult<ReadOutcome<(PacketHeader, &[u8])>> {
    if bytes.is_empty() {
        return Ok(ReadOutcome::InsufficientData);
    }

    let first_byte = bytes[0];
    match decode_vli(&bytes[1..])? {
        DecodeVliResult::InsufficientData => { Ok(ReadOutcome::InsufficientData) }
        DecodeVliResult::Value(remaining_length, body) => {
            let header = PacketHeader {
                first_byte,
                remaining_length,
                header_length: bytes.len() - body.len(),
            };
            Ok(ReadOutcome::Value((header, body)))
        }
    }
}

pub(crate) fn decode_packet(first_byte: u8, packet_body: &[u8], context: &DecodingContext) -> MqttResult<Box<MqttPacket>> {
    let packet_type = first_byte >> 4;
    let packet = (match packet_type {
        PACKET_TYPE_CONNECT => { decode_connect_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_CONNACK => { decode_connack_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_PUBLISH => { decode_publish_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_PUBACK => { decode_puback_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_PUBREC => { decode_pubrec_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_PUBREL => { decode_pubrel_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_PUBCOMP => { decode_pubcomp_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_SUBSCRIBE => { decode_subscribe_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_SUBACK => { decode_suback_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_UNSUBSCRIBE => { decode_unsubscribe_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_UNSUBACK => { decode_unsuback_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_PINGREQ => { decode_pingreq_packet(first_byte, packet_body) }
        PACKET_TYPE_PINGRESP => { decode_pingresp_packet(first_byte, packet_body) }
        PACKET_TYPE_DISCONNECT => { decode_disconnect_packet(first_byte, packet_body, context.protocol_version) }
        PACKET_TYPE_AUTH => { decode_auth_packet(first_byte, packet_body, context.protocol_version) }
        _ => {
            error!("Packet Decode - invalid packet type value ({})", packet_type);
            Err(MqttError::new_decoding_failure("invalid packet type value"))
        }
    })?;

    log_packet("Decoding packet: ", &packet);

    Ok(packet)
}

/// Reads one whole MQTT packet from a fragmented buffer sequence.
///
/// When the packet's body is contiguous within a single fragment it is decoded in place;
/// otherwise the body is gathered into a scratch buffer first.  On insufficient data the
/// cursor is restored to its starting position so the caller can retry after more data
/// arrives.
pub fn read_packet(cursor: &mut SequenceCursor, context: &DecodingContext) -> MqttResult<ReadOutcome<Box<MqttPacket>>> {
    let snapshot = cursor.position();

    let header = match read_packet_header(cursor)? {
        ReadOutcome::InsufficientData => { return Ok(ReadOutcome::InsufficientData); }
        ReadOutcome::Value(header) => { header }
    };

    if context.maximum_packet_size > 0 && header.total_length() > context.maximum_packet_size as usize {
        cursor.seek(snapshot);
        error!("Packet Decode - packet size ({}) exceeds the maximum allowed ({})", header.total_length(), context.maximum_packet_size);
        return Err(MqttError::new_decoding_failure("packet size exceeds the maximum allowed"));
    }

    let body_length = header.remaining_length as usize;
    if cursor.remaining() < body_length {
        cursor.seek(snapshot);
        return Ok(ReadOutcome::InsufficientData);
    }

    let decode_result =
        if let Some(borrowed_body) = cursor.try_borrow(body_length) {
            decode_packet(header.first_byte, borrowed_body, context)
        } else {
            let mut scratch : Vec<u8> = Vec::with_capacity(body_length);
            if !cursor.try_copy_to(body_length, &mut scratch) {
                cursor.seek(snapshot);
                return Err(MqttError::new_internal_state_error("packet body copy failed despite sufficient remaining data"));
            }

            decode_packet(header.first_byte, &scratch, context)
        };

    match decode_result {
        Ok(packet) => { Ok(ReadOutcome::Value(packet)) }
        Err(error) => {
            cursor.seek(snapshot);
            Err(error)
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum DecoderState {
    ReadPacketType,
    ReadTotalRemainingLength,
    ReadPacketBody,
    TerminalError,
}

enum DecoderDirective<'a> {
    OutOfData,
    Continue(&'a[u8]),
    TerminalError(MqttError),
}

/// A streaming MQTT packet decoder.
///
/// Bytes are fed in as they arrive off the wire, in arbitrary-sized chunks; completed
/// packets accumulate into a caller-supplied queue.  Any decoding failure is terminal:
/// the decoder refuses all further input until reset, matching the protocol's
/// requirement that a connection be torn down after a violation.
pub struct Decoder {
    state: DecoderState,
    scratch: Vec<u8>,
    first_byte: Option<u8>,
    remaining_length: Option<usize>,
}

impl Decoder {

    /// Creates a new decoder ready to read the first packet of a connection's byte stream
    pub fn new() -> Self {
        Decoder {
            state: DecoderState::ReadPacketType,
            scratch: Vec::new(),
            first_byte: None,
            remaining_length: None,
        }
    }

    /// Resets the decoder for use on a new connection, clearing any terminal error state
    pub fn reset_for_new_connection(&mut self) {
        self.reset_for_new_packet();
        self.state = DecoderState::ReadPacketType;
    }

    fn reset_for_new_packet(&mut self) {
        if self.state != DecoderState::TerminalError {
            self.state = DecoderState::ReadPacketType;
        }

        self.scratch.clear();
        self.first_byte = None;
        self.remaining_length = None;
    }

    fn process_read_packet_type<'a>(&mut self, bytes: &'a[u8]) -> DecoderDirective<'a> {
        if bytes.is_empty() {
            return DecoderDirective::OutOfData;
        }

        self.first_byte = Some(bytes[0]);
        self.state = DecoderState::ReadTotalRemainingLength;

        DecoderDirective::Continue(&bytes[1..])
    }

    fn process_read_total_remaining_length<'a>(&mut self, bytes: &'a[u8], context: &DecodingContext) -> DecoderDirective<'a> {
        if bytes.is_empty() {
            return DecoderDirective::OutOfData;
        }

        self.scratch.push(bytes[0]);
        let remaining_bytes = &bytes[1..];

        let decode_result = decode_vli(&self.scratch);
        match decode_result {
            Ok(DecodeVliResult::InsufficientData) => { DecoderDirective::Continue(remaining_bytes) }
            Ok(DecodeVliResult::Value(remaining_length, _)) => {
                let total_packet_size = 1 + self.scratch.len() + remaining_length as usize;
                if context.maximum_packet_size > 0 && total_packet_size > context.maximum_packet_size as usize {
                    error!("Decoder - packet size ({}) exceeds the maximum allowed ({})", total_packet_size, context.maximum_packet_size);
                    return DecoderDirective::TerminalError(MqttError::new_decoding_failure("packet size exceeds the maximum allowed"));
                }

                self.remaining_length = Some(remaining_length as usize);
                self.state = DecoderState::ReadPacketBody;
                self.scratch.clear();

                DecoderDirective::Continue(remaining_bytes)
            }
            Err(error) => { DecoderDirective::TerminalError(error) }
        }
    }

    fn process_read_packet_body<'a>(&mut self, bytes: &'a[u8], context: &DecodingContext, decoded_packets: &mut VecDeque<Box<MqttPacket>>) -> DecoderDirective<'a> {
        let Some(remaining_length) = self.remaining_length else {
            return DecoderDirective::TerminalError(MqttError::new_internal_state_error("decoder reading packet body with no remaining length set"));
        };

        let Some(first_byte) = self.first_byte else {
            return DecoderDirective::TerminalError(MqttError::new_internal_state_error("decoder reading packet body with no first byte set"));
        };

        let read_so_far = self.scratch.len();
        let bytes_needed = remaining_length - read_so_far;
        if bytes_needed > bytes.len() {
            self.scratch.extend_from_slice(bytes);
            return DecoderDirective::OutOfData;
        }

        let packet_slice : &[u8] =
            if !self.scratch.is_empty() {
                self.scratch.extend_from_slice(&bytes[..bytes_needed]);
                &self.scratch
            } else {
                &bytes[..bytes_needed]
            };

        match decode_packet(first_byte, packet_slice, context) {
            Ok(packet) => {
                decoded_packets.push_back(packet);

                self.reset_for_new_packet();
                DecoderDirective::Continue(&bytes[bytes_needed..])
            }
            Err(error) => { DecoderDirective::TerminalError(error) }
        }
    }

    /// Consumes the next chunk of a connection's inbound byte stream, appending every
    /// packet completed by this chunk to `decoded_packets`.
    ///
    /// A returned error is terminal; the decoder must be reset before further use.
    pub fn decode_bytes(&mut self, bytes: &[u8], context: &DecodingContext, decoded_packets: &mut VecDeque<Box<MqttPacket>>) -> MqttResult<()> {
        let mut current_slice = bytes;

        loop {
            let directive =
                match self.state {
                    DecoderState::ReadPacketType => { self.process_read_packet_type(current_slice) }
                    DecoderState::ReadTotalRemainingLength => { self.process_read_total_remaining_length(current_slice, context) }
                    DecoderState::ReadPacketBody => { self.process_read_packet_body(current_slice, context, decoded_packets) }
                    DecoderState::TerminalError => { DecoderDirective::TerminalError(MqttError::new_decoding_failure("decoder already in terminal failure state")) }
                };

            match directive {
                DecoderDirective::OutOfData => { return Ok(()); }
                DecoderDirective::Continue(remaining_slice) => { current_slice = remaining_slice; }
                DecoderDirective::TerminalError(error) => {
                    self.state = DecoderState::TerminalError;
                    return Err(error);
                }
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::encode::*;

    pub(crate) const DECODE_FRAGMENT_SIZES : [usize; 12] = [1, 2, 3, 5, 7, 11, 17, 31, 47, 71, 131, 1023];

    pub(crate) fn encode_packet_for_test(packet: &MqttPacket, protocol_version: ProtocolVersion) -> Vec<u8> {
        let context = EncodingContext {
            protocol_version,
            ..Default::default()
        };

        let mut encoded = Vec::with_capacity(128);
        let bytes_written = write_packet(packet, &context, &mut encoded).unwrap();
        assert_eq!(bytes_written, encoded.len());
        assert!(bytes_written > 0);

        encoded
    }

    pub(crate) fn do_single_decode_test(encoded: &[u8], protocol_version: ProtocolVersion, fragment_size: usize) -> Box<MqttPacket> {
        let context = DecodingContext {
            protocol_version,
            ..Default::default()
        };

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();

        for fragment in encoded.chunks(fragment_size) {
            decoder.decode_bytes(fragment, &context, &mut decoded_packets).unwrap();
        }

        assert_eq!(1, decoded_packets.len());
        decoded_packets.pop_front().unwrap()
    }

    fn do_cursor_read_packet_test(encoded: &[u8], expected_packet: &MqttPacket, protocol_version: ProtocolVersion, fragment_size: usize) {
        let context = DecodingContext {
            protocol_version,
            ..Default::default()
        };

        let fragments : Vec<&[u8]> = encoded.chunks(fragment_size).collect();
        let mut cursor = SequenceCursor::new(&fragments);

        let outcome = read_packet(&mut cursor, &context).unwrap();
        match outcome {
            ReadOutcome::Value(packet) => {
                assert_eq!(*expected_packet, *packet);
                assert_eq!(0, cursor.remaining());
            }
            _ => { panic!("expected a complete packet"); }
        }

        // a truncated sequence must report insufficient data and consume nothing
        let truncated : Vec<&[u8]> = vec!(&encoded[..(encoded.len() - 1)]);
        let mut truncated_cursor = SequenceCursor::new(&truncated);
        assert_eq!(ReadOutcome::InsufficientData, read_packet(&mut truncated_cursor, &context).unwrap());
        assert_eq!(0, truncated_cursor.consumed());
    }

    pub(crate) fn do_round_trip_encode_decode_test_versioned(packet: &MqttPacket, protocol_version: ProtocolVersion) -> bool {
        let encoded = encode_packet_for_test(packet, protocol_version);

        for fragment_size in DECODE_FRAGMENT_SIZES {
            let decoded = do_single_decode_test(&encoded, protocol_version, fragment_size);
            assert_eq!(*packet, *decoded);

            do_cursor_read_packet_test(&encoded, packet, protocol_version, fragment_size);
        }

        true
    }

    pub(crate) fn do_round_trip_encode_decode_test(packet: &MqttPacket) -> bool {
        do_round_trip_encode_decode_test_versioned(packet, ProtocolVersion::Mqtt5)
    }

    pub(crate) fn do_mutated_decode_failure_test(packet: &MqttPacket, mutator: fn(&[u8]) -> Vec<u8>) {
        let encoded = encode_packet_for_test(packet, ProtocolVersion::Mqtt5);
        let mutated = mutator(&encoded);

        let context = DecodingContext {
            ..Default::default()
        };

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();

        let result = decoder.decode_bytes(&mutated, &context, &mut decoded_packets);
        assert!(result.is_err());
    }

    pub(crate) fn do_fixed_header_flag_decode_failure_test(packet: &MqttPacket, flags: u8) {
        let mut encoded = encode_packet_for_test(packet, ProtocolVersion::Mqtt5);
        encoded[0] |= flags;

        let context = DecodingContext {
            ..Default::default()
        };

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();

        let result = decoder.decode_bytes(&encoded, &context, &mut decoded_packets);
        assert!(result.is_err());
    }

    pub(crate) fn do_inbound_size_decode_failure_test(packet: &MqttPacket) {
        let encoded = encode_packet_for_test(packet, ProtocolVersion::Mqtt5);

        let exact_fit_context = DecodingContext {
            maximum_packet_size: encoded.len() as u32,
            ..Default::default()
        };

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();
        decoder.decode_bytes(&encoded, &exact_fit_context, &mut decoded_packets).unwrap();
        assert_eq!(1, decoded_packets.len());

        let undersized_context = DecodingContext {
            maximum_packet_size: (encoded.len() - 1) as u32,
            ..Default::default()
        };

        let mut failing_decoder = Decoder::new();
        let mut failed_packets = VecDeque::new();
        let result = failing_decoder.decode_bytes(&encoded, &undersized_context, &mut failed_packets);
        assert!(result.is_err());
        assert_eq!(0, failed_packets.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::*;
    use assert_matches::assert_matches;

    #[test]
    fn decoder_rejects_invalid_packet_types() {
        let context = DecodingContext {
            ..Default::default()
        };

        // packet type 0 is never valid
        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();
        let result = decoder.decode_bytes(&[0x00u8, 0x00u8], &context, &mut decoded_packets);
        assert_matches!(result, Err(MqttError::DecodingFailure(_)));
    }

    #[test]
    fn decoder_terminal_error_is_sticky_until_reset() {
        let context = DecodingContext {
            ..Default::default()
        };

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();
        assert!(decoder.decode_bytes(&[0x00u8, 0x00u8], &context, &mut decoded_packets).is_err());

        // a pingresp is valid data, but the decoder is latched in failure
        let pingresp_bytes = [0xd0u8, 0x00u8];
        assert!(decoder.decode_bytes(&pingresp_bytes, &context, &mut decoded_packets).is_err());

        decoder.reset_for_new_connection();
        decoder.decode_bytes(&pingresp_bytes, &context, &mut decoded_packets).unwrap();
        assert_eq!(1, decoded_packets.len());
    }

    #[test]
    fn decoder_multiple_packets_in_one_chunk() {
        let context = DecodingContext {
            ..Default::default()
        };

        // pingreq followed by pingresp
        let bytes = [0xc0u8, 0x00u8, 0xd0u8, 0x00u8];

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();
        decoder.decode_bytes(&bytes, &context, &mut decoded_packets).unwrap();

        assert_eq!(2, decoded_packets.len());
        assert_matches!(*decoded_packets[0], MqttPacket::Pingreq(_));
        assert_matches!(*decoded_packets[1], MqttPacket::Pingresp(_));
    }

    #[test]
    fn decoder_vli_fifth_byte_is_terminal() {
        let context = DecodingContext {
            ..Default::default()
        };

        let bytes = [0x30u8, 0x80u8, 0x80u8, 0x80u8, 0x80u8, 0x01u8];

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();
        let result = decoder.decode_bytes(&bytes, &context, &mut decoded_packets);
        assert_matches!(result, Err(MqttError::DecodingFailure(_)));
    }

    #[test]
    fn decoder_oversized_packet_detected_from_header() {
        let context = DecodingContext {
            maximum_packet_size: 5,
            ..Default::default()
        };

        // remaining length of 100 makes a 102-byte packet; only the header needs to arrive
        let bytes = [0x30u8, 0x64u8];

        let mut decoder = Decoder::new();
        let mut decoded_packets = VecDeque::new();
        let result = decoder.decode_bytes(&bytes, &context, &mut decoded_packets);
        assert_matches!(result, Err(MqttError::DecodingFailure(_)));
    }

    #[test]
    fn peek_packet_header_across_fragments() {
        let segments : Vec<&[u8]> = vec!(&[0x30u8], &[0xffu8], &[0x7fu8, 0x01u8]);
        let outcome = peek_packet_header(&segments).unwrap();
        assert_eq!(ReadOutcome::Value(PacketHeader { first_byte: 0x30, remaining_length: 16383, header_length: 3 }), outcome);

        let partial : Vec<&[u8]> = vec!(&[0x30u8], &[0xffu8]);
        assert_eq!(ReadOutcome::InsufficientData, peek_packet_header(&partial).unwrap());
    }

    #[test]
    fn read_string_and_binary_over_fragments() {
        let segments : Vec<&[u8]> = vec!(&[0x00u8], &[0x05u8, b'h', b'e'], &[b'l', b'l', b'o']);
        let mut cursor = SequenceCursor::new(&segments);
        assert_eq!(ReadOutcome::Value("hello".to_string()), read_length_prefixed_string(&mut cursor).unwrap());
        assert_eq!(0, cursor.remaining());

        let binary_segments : Vec<&[u8]> = vec!(&[0x00u8, 0x03u8], &[1u8], &[2u8, 3u8]);
        let mut binary_cursor = SequenceCursor::new(&binary_segments);
        assert_eq!(ReadOutcome::Value(vec!(1u8, 2u8, 3u8)), read_length_prefixed_binary(&mut binary_cursor).unwrap());

        let short_segments : Vec<&[u8]> = vec!(&[0x00u8, 0x05u8, b'h', b'i']);
        let mut short_cursor = SequenceCursor::new(&short_segments);
        assert_eq!(ReadOutcome::InsufficientData, read_length_prefixed_string(&mut short_cursor).unwrap());
        assert_eq!(0, short_cursor.consumed());
    }

    #[test]
    fn read_string_multibyte_utf8_over_fragments() {
        let value = "привет/мир";
        assert!(value.len() > value.chars().count());

        let mut encoded = Vec::new();
        crate::encode::utils::write_length_prefixed_string(&mut encoded, value);
        assert_eq!(2 + value.len(), encoded.len());

        // split the byte sequence mid-codepoint
        for split in 1..encoded.len() {
            let segments : Vec<&[u8]> = vec!(&encoded[..split], &encoded[split..]);
            let mut cursor = SequenceCursor::new(&segments);
            assert_eq!(ReadOutcome::Value(value.to_string()), read_length_prefixed_string(&mut cursor).unwrap());
            assert_eq!(2 + value.len(), cursor.consumed());
            assert_eq!(0, cursor.remaining());
        }
    }

    #[test]
    fn read_string_invalid_utf8_restores_cursor() {
        // 0xd0 starts a two-byte sequence that never completes
        let segments : Vec<&[u8]> = vec!(&[0x00u8, 0x02u8, 0xd0u8, 0xd0u8]);
        let mut cursor = SequenceCursor::new(&segments);
        assert_matches!(read_length_prefixed_string(&mut cursor), Err(MqttError::DecodingFailure(_)));
        assert_eq!(0, cursor.consumed());
    }

    #[test]
    fn round_trip_smoke_pingreq() {
        assert!(do_round_trip_encode_decode_test(&MqttPacket::Pingreq(PingreqPacket {})));
    }
}
