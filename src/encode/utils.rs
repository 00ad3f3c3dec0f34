/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::error::{MqttError, MqttResult};
use crate::mqtt::UserProperty;

use log::*;

pub(crate) const MAXIMUM_VARIABLE_LENGTH_INTEGER : usize = (1usize << 28) - 1;

pub(crate) fn compute_variable_length_integer_encode_size(value: usize) -> MqttResult<usize> {
    if value < 1usize << 7 {
        Ok(1)
    } else if value < 1usize << 14 {
        Ok(2)
    } else if value < 1usize << 21 {
        Ok(3)
    } else if value < 1usize << 28 {
        Ok(4)
    } else {
        error!("Packet Encode - value exceeds maximum variable length integer");
        Err(MqttError::new_encoding_failure("value exceeds maximum variable length integer"))
    }
}

pub(crate) fn encode_vli(value: u32, dest: &mut Vec<u8>) -> MqttResult<()> {
    if value as usize > MAXIMUM_VARIABLE_LENGTH_INTEGER {
        error!("Packet Encode - value exceeds maximum variable length integer");
        return Err(MqttError::new_encoding_failure("value exceeds maximum variable length integer"));
    }

    let mut remaining = value;
    loop {
        let mut byte = (remaining & 0x7F) as u8;
        remaining >>= 7;
        if remaining > 0 {
            byte |= 0x80;
        }

        dest.push(byte);

        if remaining == 0 {
            return Ok(());
        }
    }
}

pub(crate) fn write_u16(dest: &mut Vec<u8>, value: u16) {
    dest.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_u32(dest: &mut Vec<u8>, value: u32) {
    dest.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_length_prefixed_string(dest: &mut Vec<u8>, value: &str) {
    write_u16(dest, value.len() as u16);
    dest.extend_from_slice(value.as_bytes());
}

// None is written as a zero-length value
pub(crate) fn write_length_prefixed_optional_string(dest: &mut Vec<u8>, value: &Option<String>) {
    match value {
        Some(string_value) => { write_length_prefixed_string(dest, string_value); }
        None => { write_u16(dest, 0); }
    }
}

pub(crate) fn write_length_prefixed_bytes(dest: &mut Vec<u8>, value: &[u8]) {
    write_u16(dest, value.len() as u16);
    dest.extend_from_slice(value);
}

pub(crate) fn write_user_properties(dest: &mut Vec<u8>, properties: &Option<Vec<UserProperty>>) {
    if let Some(property_list) = properties {
        for property in property_list {
            dest.push(crate::mqtt::utils::PROPERTY_KEY_USER_PROPERTY);
            write_length_prefixed_string(dest, &property.name);
            write_length_prefixed_string(dest, &property.value);
        }
    }
}

/*
 * Property section length-computation helpers.  Lengths include the property key byte.
 */

macro_rules! add_optional_u8_property_length {
    ($target: ident, $optional_value: expr) => {
        if $optional_value.is_some() {
            $target += 2;
        }
    };
}

pub(crate) use add_optional_u8_property_length;

macro_rules! add_optional_u16_property_length {
    ($target: ident, $optional_value: expr) => {
        if $optional_value.is_some() {
            $target += 3;
        }
    };
}

pub(crate) use add_optional_u16_property_length;

macro_rules! add_optional_u32_property_length {
    ($target: ident, $optional_value: expr) => {
        if $optional_value.is_some() {
            $target += 5;
        }
    };
}

pub(crate) use add_optional_u32_property_length;

macro_rules! add_optional_string_property_length {
    ($target: ident, $optional_value: expr) => {
        if let Some(value) = &$optional_value {
            $target += 3 + value.len();
        }
    };
}

pub(crate) use add_optional_string_property_length;

macro_rules! add_optional_bytes_property_length {
    ($target: ident, $optional_value: expr) => {
        if let Some(value) = &$optional_value {
            $target += 3 + value.len();
        }
    };
}

pub(crate) use add_optional_bytes_property_length;

pub(crate) fn compute_user_properties_length(properties: &Option<Vec<UserProperty>>) -> usize {
    let mut total = 0;
    if let Some(property_list) = properties {
        // 1 byte key + 2 * 2 byte length prefixes per property
        total = property_list.iter().fold(0, |acc, property| acc + 5 + property.name.len() + property.value.len());
    }

    total
}

/*
 * Property-encoding helpers.  The optional variants write nothing when the value is None.
 */

macro_rules! encode_optional_u8_property {
    ($dest: expr, $key: expr, $optional_value: expr) => {
        if let Some(value) = $optional_value {
            $dest.push($key);
            $dest.push(value);
        }
    };
}

pub(crate) use encode_optional_u8_property;

macro_rules! encode_optional_u16_property {
    ($dest: expr, $key: expr, $optional_value: expr) => {
        if let Some(value) = $optional_value {
            $dest.push($key);
            write_u16($dest, value);
        }
    };
}

pub(crate) use encode_optional_u16_property;

macro_rules! encode_optional_u32_property {
    ($dest: expr, $key: expr, $optional_value: expr) => {
        if let Some(value) = $optional_value {
            $dest.push($key);
            write_u32($dest, value);
        }
    };
}

pub(crate) use encode_optional_u32_property;

macro_rules! encode_optional_enum_property {
    ($dest: expr, $key: expr, $optional_value: expr) => {
        if let Some(value) = $optional_value {
            $dest.push($key);
            $dest.push(value as u8);
        }
    };
}

pub(crate) use encode_optional_enum_property;

macro_rules! encode_optional_boolean_property {
    ($dest: expr, $key: expr, $optional_value: expr) => {
        if let Some(value) = $optional_value {
            $dest.push($key);
            $dest.push(value as u8);
        }
    };
}

pub(crate) use encode_optional_boolean_property;

macro_rules! encode_optional_string_property {
    ($dest: expr, $key: expr, $optional_value: expr) => {
        if let Some(value) = &$optional_value {
            $dest.push($key);
            write_length_prefixed_string($dest, value);
        }
    };
}

pub(crate) use encode_optional_string_property;

macro_rules! encode_optional_bytes_property {
    ($dest: expr, $key: expr, $optional_value: expr) => {
        if let Some(value) = &$optional_value {
            $dest.push($key);
            write_length_prefixed_bytes($dest, value);
        }
    };
}

pub(crate) use encode_optional_bytes_property;

/// Describes which optional properties a size-constrained encoding pass should include.
///
/// When an outbound packet does not fit within the connection's maximum packet size,
/// optional properties get shed in a fixed order: user properties first, then the reason
/// string.  Mandatory fields are never dropped; a packet whose mandatory encoding exceeds
/// the limit simply cannot be sent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum PropertyInclusion {

    /// Include every property present on the packet
    All,

    /// Include everything except user properties
    NoUserProperties,

    /// Include only properties required for the packet to be semantically complete
    RequiredOnly,
}

const PROPERTY_INCLUSION_LEVELS : [PropertyInclusion; 3] = [PropertyInclusion::All, PropertyInclusion::NoUserProperties, PropertyInclusion::RequiredOnly];

pub(crate) fn compute_total_packet_size(total_remaining_length: u32) -> MqttResult<u32> {
    let remaining_length_encoding_size = compute_variable_length_integer_encode_size(total_remaining_length as usize)?;
    Ok(1 + remaining_length_encoding_size as u32 + total_remaining_length)
}

// a maximum packet size of zero means no limit
pub(crate) fn fits_within_maximum_packet_size(total_remaining_length: u32, maximum_packet_size: u32) -> MqttResult<bool> {
    if maximum_packet_size == 0 {
        return Ok(true);
    }

    Ok(compute_total_packet_size(total_remaining_length)? <= maximum_packet_size)
}

/// Finds the most-inclusive property inclusion level whose encoding fits within the
/// maximum packet size.  `compute_fn` maps an inclusion level to the packet's
/// (total remaining length, property section length) pair at that level.
///
/// Returns None when even the required-only encoding exceeds the maximum packet size.
pub(crate) fn select_property_inclusion<F>(maximum_packet_size: u32, compute_fn: F) -> MqttResult<Option<(PropertyInclusion, u32, u32)>>
    where F : Fn(PropertyInclusion) -> MqttResult<(u32, u32)>
{
    for inclusion in PROPERTY_INCLUSION_LEVELS {
        let (total_remaining_length, property_section_length) = compute_fn(inclusion)?;
        if fits_within_maximum_packet_size(total_remaining_length, maximum_packet_size)? {
            return Ok(Some((inclusion, total_remaining_length, property_section_length)));
        }
    }

    Ok(None)
}

macro_rules! define_ack_packet_lengths_function {
    ($function_name: ident, $packet_type: ident, $reason_code_success: path) => {
        fn $function_name(packet: &$packet_type, inclusion: PropertyInclusion) -> MqttResult<(u32, u32)> {
            let mut property_section_length = 0;

            if inclusion == PropertyInclusion::All {
                property_section_length += compute_user_properties_length(&packet.user_properties);
            }

            if inclusion != PropertyInclusion::RequiredOnly {
                add_optional_string_property_length!(property_section_length, packet.reason_string);
            }

            if property_section_length == 0 {
                if packet.reason_code == $reason_code_success {
                    /* Success can be expressed with a 2-byte remaining length */
                    return Ok((2, 0));
                }

                return Ok((3, 0));
            }

            let total_remaining_length : usize = 3 + property_section_length + compute_variable_length_integer_encode_size(property_section_length)?;

            Ok((total_remaining_length as u32, property_section_length as u32))
        }
    };
}

pub(crate) use define_ack_packet_lengths_function;

macro_rules! define_ack_packet_encoding_function {
    ($function_name: ident, $packet_type: ident, $packet_type_as_string: expr, $lengths_function_name: ident, $first_byte: expr) => {
        pub(crate) fn $function_name(packet: &$packet_type, context: &EncodingContext, dest: &mut Vec<u8>) -> MqttResult<usize> {
            let start = dest.len();

            if context.protocol_version != ProtocolVersion::Mqtt5 {
                if !fits_within_maximum_packet_size(2, context.maximum_packet_size)? {
                    debug!("{}Packet Encode - packet does not fit within the maximum packet size", $packet_type_as_string);
                    return Ok(0);
                }

                dest.push($first_byte);
                encode_vli(2, dest)?;
                write_u16(dest, packet.packet_id);

                return Ok(dest.len() - start);
            }

            let selection = select_property_inclusion(context.maximum_packet_size, |inclusion| { $lengths_function_name(packet, inclusion) })?;
            let Some((inclusion, total_remaining_length, property_section_length)) = selection else {
                debug!("{}Packet Encode - packet does not fit within the maximum packet size", $packet_type_as_string);
                return Ok(0);
            };

            dest.push($first_byte);
            encode_vli(total_remaining_length, dest)?;
            write_u16(dest, packet.packet_id);

            if total_remaining_length == 2 {
                return Ok(dest.len() - start);
            }

            dest.push(packet.reason_code as u8);

            if total_remaining_length == 3 {
                return Ok(dest.len() - start);
            }

            encode_vli(property_section_length, dest)?;

            if inclusion != PropertyInclusion::RequiredOnly {
                encode_optional_string_property!(dest, PROPERTY_KEY_REASON_STRING, packet.reason_string);
            }

            if inclusion == PropertyInclusion::All {
                write_user_properties(dest, &packet.user_properties);
            }

            Ok(dest.len() - start)
        }
    };
}

pub(crate) use define_ack_packet_encoding_function;
