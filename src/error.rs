/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/*!
A module containing the core crate error enumeration, context structures, and conversion
definitions.
 */

use crate::mqtt::PacketType;

use std::error::Error;
use std::fmt;

/// Additional details about a DecodingFailure error variant
#[derive(Debug)]
pub struct DecodingFailureContext {
    source: Box<dyn Error + Send + Sync + 'static>
}

/// Additional details about an EncodingFailure error variant
#[derive(Debug)]
pub struct EncodingFailureContext {
    source: Box<dyn Error + Send + Sync + 'static>
}

/// Additional details about a ProtocolError error variant
#[derive(Debug)]
pub struct ProtocolErrorContext {
    source: Box<dyn Error + Send + Sync + 'static>
}

/// Additional details about an InboundTopicAliasNotValid error variant
#[derive(Debug)]
pub struct InboundTopicAliasNotValidContext {
    source: Box<dyn Error + Send + Sync + 'static>
}

/// Additional details about a PacketValidation error variant
#[derive(Debug)]
pub struct PacketValidationContext {

    /// type of packet that failed validation
    pub packet_type: PacketType,

    source: Box<dyn Error + Send + Sync + 'static>
}

/// Additional details about a ConfigurationFailure error variant
#[derive(Debug)]
pub struct ConfigurationFailureContext {
    source: Box<dyn Error + Send + Sync + 'static>
}

/// Additional details about a PacketIdSpaceExhausted error variant
#[derive(Debug)]
pub struct PacketIdSpaceExhaustedContext {
}

/// Additional details about a PacketIdReleaseFailure error variant
#[derive(Debug)]
pub struct PacketIdReleaseFailureContext {
    source: Box<dyn Error + Send + Sync + 'static>
}

/// Additional details about an InternalStateError error variant
#[derive(Debug)]
pub struct InternalStateErrorContext {
    source: Box<dyn Error + Send + Sync + 'static>
}

/// Basic error type for the entire crate.
#[derive(Debug)]
#[non_exhaustive]
pub enum MqttError {

    /// Error encountered while attempting to decode an MQTT packet.  Covers both malformed
    /// encodings (bad header flags, mismatches between length fields and overall packet
    /// length, etc...) and encodings that are syntactically impossible (a fifth
    /// variable-length-integer continuation byte).  Running out of bytes mid-packet is NOT
    /// an error; codecs signal that condition as an insufficient-data outcome value.
    DecodingFailure(DecodingFailureContext),

    /// Error encountered while attempting to encode an MQTT packet
    EncodingFailure(EncodingFailureContext),

    /// Generic error emitted when a peer's behavior violates the MQTT specification in a way
    /// that cannot be safely ignored or recovered from.  Expected to be connection-fatal.
    ProtocolError(ProtocolErrorContext),

    /// Error emitted when an inbound publish arrives with an unusable topic alias.
    InboundTopicAliasNotValid(InboundTopicAliasNotValidContext),

    /// Error emitted when a packet is submitted whose fields violate the MQTT specification.
    /// Indicates a bug in the caller, not a wire-level condition.
    PacketValidation(PacketValidationContext),

    /// Error emitted when a component is constructed with invalid arguments (for example, a
    /// packet id pool bucket size that is not a power of two).
    ConfigurationFailure(ConfigurationFailureContext),

    /// Error emitted when all 65535 packet identifiers are simultaneously rented.  Recoverable
    /// by the caller backing off new QoS1+/subscribe flows until ids are released.
    PacketIdSpaceExhausted(PacketIdSpaceExhaustedContext),

    /// Error emitted when a packet id is released that is not currently rented (double release,
    /// release of id zero, or release of an id whose bucket was never allocated).  Indicates a
    /// session-state bug and should be treated as fatal to the session.
    PacketIdReleaseFailure(PacketIdReleaseFailureContext),

    /// Error emitted when something happens that should never happen.  Always indicates
    /// a bug in this crate.
    InternalStateError(InternalStateErrorContext),
}

impl MqttError {

    pub(crate) fn new_decoding_failure(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::DecodingFailure(
            DecodingFailureContext {
                source : source.into()
            }
        )
    }

    pub(crate) fn new_encoding_failure(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::EncodingFailure(
            EncodingFailureContext {
                source : source.into()
            }
        )
    }

    pub(crate) fn new_protocol_error(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::ProtocolError(
            ProtocolErrorContext {
                source : source.into()
            }
        )
    }

    pub(crate) fn new_inbound_topic_alias_not_valid(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::InboundTopicAliasNotValid(
            InboundTopicAliasNotValidContext{
                source : source.into()
            }
        )
    }

    pub(crate) fn new_packet_validation(packet_type: PacketType, source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::PacketValidation(
            PacketValidationContext {
                packet_type,
                source : source.into()
            }
        )
    }

    pub(crate) fn new_configuration_failure(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::ConfigurationFailure(
            ConfigurationFailureContext {
                source : source.into()
            }
        )
    }

    pub(crate) fn new_packet_id_space_exhausted() -> Self {
        MqttError::PacketIdSpaceExhausted(
            PacketIdSpaceExhaustedContext {
            }
        )
    }

    pub(crate) fn new_packet_id_release_failure(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::PacketIdReleaseFailure(
            PacketIdReleaseFailureContext {
                source : source.into()
            }
        )
    }

    pub(crate) fn new_internal_state_error(source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        MqttError::InternalStateError(
            InternalStateErrorContext {
                source : source.into()
            }
        )
    }
}

impl Error for MqttError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MqttError::DecodingFailure(context) => {
                Some(context.source.as_ref())
            }
            MqttError::EncodingFailure(context) => {
                Some(context.source.as_ref())
            }
            MqttError::ProtocolError(context) => {
                Some(context.source.as_ref())
            }
            MqttError::InboundTopicAliasNotValid(context) => {
                Some(context.source.as_ref())
            }
            MqttError::PacketValidation(context) => {
                Some(context.source.as_ref())
            }
            MqttError::ConfigurationFailure(context) => {
                Some(context.source.as_ref())
            }
            MqttError::PacketIdReleaseFailure(context) => {
                Some(context.source.as_ref())
            }
            MqttError::InternalStateError(context) => {
                Some(context.source.as_ref())
            }
            _ => { None }
        }
    }
}

impl fmt::Display for MqttError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MqttError::DecodingFailure(_) => {
                write!(f, "failure encountered while decoding an incoming MQTT packet")
            }
            MqttError::EncodingFailure(_) => {
                write!(f, "failure encountered while encoding an outbound MQTT packet")
            }
            MqttError::ProtocolError(_) => {
                write!(f, "peer behavior disallowed by the mqtt spec")
            }
            MqttError::InboundTopicAliasNotValid(_) => {
                write!(f, "topic alias value on incoming publish is not valid")
            }
            MqttError::PacketValidation(context) => {
                write!(f, "{} contains a property that violates the mqtt spec", context.packet_type)
            }
            MqttError::ConfigurationFailure(_) => {
                write!(f, "component constructed with invalid arguments; source contains further details")
            }
            MqttError::PacketIdSpaceExhausted(_) => {
                write!(f, "all 65535 packet identifiers are currently rented")
            }
            MqttError::PacketIdReleaseFailure(_) => {
                write!(f, "attempt to release a packet identifier that is not rented")
            }
            MqttError::InternalStateError(_) => {
                write!(f, "crate reached an invalid internal state; almost certainly a bug")
            }
        }
    }
}

/// Crate-wide result type for functions that can fail
pub type MqttResult<T> = Result<T, MqttError>;
