/*
 * Copyright Bret Ambrose. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Topic alias support for MQTT5 connections.
//!
//! Topic aliasing lets a publisher replace the topic string of a PUBLISH packet with a small
//! integer once a binding between the two has been established on the connection.  Each
//! direction maintains its own independent alias space.

use crate::error::{MqttError, MqttResult};

use log::*;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// The outcome of checking an outbound publish topic against the connection's outbound alias
/// state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OutboundAliasResolution {

    /// True if the topic is already bound to the alias on this connection and therefore does
    /// not need to be transmitted.
    pub skip_topic: bool,

    /// The alias to attach to the outgoing publish, if any.
    pub alias: Option<u16>,
}

/// An outbound topic alias resolver that assigns aliases to the most recently used topics,
/// evicting the least recently used binding once the peer's alias limit has been reached.
pub struct LruOutboundAliasResolver {
    maximum_alias_value: u16,

    cache: LruCache<String, u16>,
}

impl LruOutboundAliasResolver {

    /// Creates a new outbound resolver willing to use aliases in the range
    /// `[1, maximum_alias_value]`.  A maximum of zero disables outbound aliasing entirely.
    pub fn new(maximum_alias_value: u16) -> Self {
        let capacity = NonZeroUsize::new((maximum_alias_value as usize).max(1)).unwrap_or(NonZeroUsize::MIN);

        LruOutboundAliasResolver {
            maximum_alias_value,
            cache: LruCache::new(capacity),
        }
    }

    /// Returns the maximum alias value the resolver is currently willing to use.
    pub fn maximum_alias_value(&self) -> u16 {
        self.maximum_alias_value
    }

    /// Discards all alias bindings and applies the alias limit granted by the peer on a freshly
    /// established connection.
    pub fn reset_for_new_connection(&mut self, maximum_alias_value: u16) {
        let capacity = NonZeroUsize::new((maximum_alias_value as usize).max(1)).unwrap_or(NonZeroUsize::MIN);

        self.maximum_alias_value = maximum_alias_value;
        self.cache.clear();
        self.cache.resize(capacity);
    }

    /// Determines the alias treatment for an outgoing publish to `topic`.
    ///
    /// A topic with an existing binding reuses its alias and skips topic transmission.  A topic
    /// without one is bound to a fresh alias, reclaiming the least recently used binding when
    /// the alias space is full.
    pub fn resolve_topic_alias(&mut self, topic: &str) -> OutboundAliasResolution {
        if self.maximum_alias_value == 0 {
            return OutboundAliasResolution { ..Default::default() };
        }

        if let Some(alias) = self.cache.get(topic) {
            let resolution = OutboundAliasResolution {
                skip_topic: true,
                alias: Some(*alias),
            };

            debug!("LruOutboundAliasResolver - reusing alias {} for topic {}", *alias, topic);
            return resolution;
        }

        let alias =
            if self.cache.len() < self.maximum_alias_value as usize {
                (self.cache.len() + 1) as u16
            } else if let Some((evicted_topic, evicted_alias)) = self.cache.pop_lru() {
                debug!("LruOutboundAliasResolver - rebinding alias {} from topic {} to topic {}", evicted_alias, evicted_topic, topic);
                evicted_alias
            } else {
                return OutboundAliasResolution { ..Default::default() };
            };

        self.cache.put(topic.to_string(), alias);

        OutboundAliasResolution {
            skip_topic: false,
            alias: Some(alias),
        }
    }
}

/// Tracks the topic alias bindings established by the peer on inbound publishes.
pub struct InboundAliasResolver {
    maximum_alias_value: u16,

    current_aliases: HashMap<u16, Arc<str>>,
}

impl InboundAliasResolver {

    /// Creates a new inbound resolver that accepts aliases in the range
    /// `[1, maximum_alias_value]`.
    pub fn new(maximum_alias_value: u16) -> Self {
        InboundAliasResolver {
            maximum_alias_value,
            current_aliases: HashMap::new(),
        }
    }

    /// Returns the maximum alias value the resolver currently accepts.
    pub fn maximum_alias_value(&self) -> u16 {
        self.maximum_alias_value
    }

    /// Discards all alias bindings and applies the alias limit advertised to the peer on a
    /// freshly established connection.
    pub fn reset_for_new_connection(&mut self, maximum_alias_value: u16) {
        self.maximum_alias_value = maximum_alias_value;
        self.current_aliases.clear();
    }

    /// Applies the aliasing fields of a received publish to the resolver's state, rewriting
    /// `topic` in place when the publish relied on an established binding.
    ///
    /// Topics are held as `Arc<str>` so that repeated resolutions of the same binding share
    /// one allocation.  A decoded publish carries its topic as a `String`; convert it once
    /// with `Arc::from(topic.as_str())` before resolution and, if the session needs the
    /// resolved value back on the packet, assign `topic.to_string()` afterwards.
    ///
    /// An alias outside the advertised range fails with
    /// [`MqttError::InboundTopicAliasNotValid`](crate::error::MqttError); an empty topic whose
    /// alias has no binding fails with a protocol error.
    pub fn resolve_topic_alias(&mut self, alias: &Option<u16>, topic: &mut Arc<str>) -> MqttResult<()> {
        let Some(alias_value) = alias else {
            return Ok(());
        };

        if *alias_value == 0 || *alias_value > self.maximum_alias_value {
            error!("InboundAliasResolver - topic alias ({}) outside the range advertised to the peer", *alias_value);
            return Err(MqttError::new_inbound_topic_alias_not_valid("topic alias outside the range advertised to the peer"));
        }

        if topic.is_empty() {
            if let Some(bound_topic) = self.current_aliases.get(alias_value) {
                *topic = bound_topic.clone();
                return Ok(());
            }

            error!("InboundAliasResolver - publish used unbound topic alias ({})", *alias_value);
            return Err(MqttError::new_protocol_error("publish used an unbound topic alias"));
        }

        self.current_aliases.insert(*alias_value, topic.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mqtt::PublishPacket;
    use assert_matches::assert_matches;

    #[test]
    fn outbound_resolver_disabled_when_maximum_is_zero() {
        let mut resolver = LruOutboundAliasResolver::new(0);

        let resolution = resolver.resolve_topic_alias("some/topic");
        assert!(!resolution.skip_topic);
        assert_eq!(None, resolution.alias);
    }

    #[test]
    fn outbound_resolver_binds_then_reuses() {
        let mut resolver = LruOutboundAliasResolver::new(4);

        let first = resolver.resolve_topic_alias("some/topic");
        assert!(!first.skip_topic);
        assert_eq!(Some(1), first.alias);

        let second = resolver.resolve_topic_alias("some/topic");
        assert!(second.skip_topic);
        assert_eq!(Some(1), second.alias);

        let other = resolver.resolve_topic_alias("another/topic");
        assert!(!other.skip_topic);
        assert_eq!(Some(2), other.alias);
    }

    #[test]
    fn outbound_resolver_evicts_least_recently_used() {
        let mut resolver = LruOutboundAliasResolver::new(2);

        assert_eq!(Some(1), resolver.resolve_topic_alias("a").alias);
        assert_eq!(Some(2), resolver.resolve_topic_alias("b").alias);

        // touch "a" so that "b" becomes the eviction candidate
        assert!(resolver.resolve_topic_alias("a").skip_topic);

        let third = resolver.resolve_topic_alias("c");
        assert!(!third.skip_topic);
        assert_eq!(Some(2), third.alias);

        // "b" lost its binding and must be rebound from scratch
        let rebound = resolver.resolve_topic_alias("b");
        assert!(!rebound.skip_topic);
        assert_eq!(Some(1), rebound.alias);
    }

    #[test]
    fn outbound_resolver_reset_drops_bindings() {
        let mut resolver = LruOutboundAliasResolver::new(4);

        assert_eq!(Some(1), resolver.resolve_topic_alias("a").alias);
        assert!(resolver.resolve_topic_alias("a").skip_topic);

        resolver.reset_for_new_connection(8);
        assert_eq!(8, resolver.maximum_alias_value());

        let resolution = resolver.resolve_topic_alias("a");
        assert!(!resolution.skip_topic);
        assert_eq!(Some(1), resolution.alias);
    }

    #[test]
    fn inbound_resolver_no_alias_is_passthrough() {
        let mut resolver = InboundAliasResolver::new(4);

        let mut topic : Arc<str> = Arc::from("some/topic");
        assert!(resolver.resolve_topic_alias(&None, &mut topic).is_ok());
        assert_eq!("some/topic", &*topic);
    }

    #[test]
    fn inbound_resolver_binds_and_resolves() {
        let mut resolver = InboundAliasResolver::new(4);

        let mut original : Arc<str> = Arc::from("some/topic");
        assert!(resolver.resolve_topic_alias(&Some(2), &mut original).is_ok());

        let mut empty : Arc<str> = Arc::from("");
        assert!(resolver.resolve_topic_alias(&Some(2), &mut empty).is_ok());

        assert!(Arc::ptr_eq(&original, &empty));
    }

    #[test]
    fn inbound_resolver_rebinds_alias() {
        let mut resolver = InboundAliasResolver::new(4);

        let mut first : Arc<str> = Arc::from("first/topic");
        assert!(resolver.resolve_topic_alias(&Some(1), &mut first).is_ok());

        let mut second : Arc<str> = Arc::from("second/topic");
        assert!(resolver.resolve_topic_alias(&Some(1), &mut second).is_ok());

        let mut empty : Arc<str> = Arc::from("");
        assert!(resolver.resolve_topic_alias(&Some(1), &mut empty).is_ok());
        assert_eq!("second/topic", &*empty);
    }

    #[test]
    fn inbound_resolver_alias_out_of_range() {
        let mut resolver = InboundAliasResolver::new(4);

        let mut topic : Arc<str> = Arc::from("some/topic");
        assert_matches!(resolver.resolve_topic_alias(&Some(0), &mut topic), Err(MqttError::InboundTopicAliasNotValid(_)));
        assert_matches!(resolver.resolve_topic_alias(&Some(5), &mut topic), Err(MqttError::InboundTopicAliasNotValid(_)));

        // range check applies even when the topic is empty
        let mut empty : Arc<str> = Arc::from("");
        assert_matches!(resolver.resolve_topic_alias(&Some(5), &mut empty), Err(MqttError::InboundTopicAliasNotValid(_)));
    }

    #[test]
    fn inbound_resolver_unbound_alias_is_protocol_error() {
        let mut resolver = InboundAliasResolver::new(4);

        let mut empty : Arc<str> = Arc::from("");
        assert_matches!(resolver.resolve_topic_alias(&Some(3), &mut empty), Err(MqttError::ProtocolError(_)));
    }

    #[test]
    fn inbound_resolver_handles_decoded_publish_topics() {
        let mut resolver = InboundAliasResolver::new(4);

        // decoded publishes carry String topics; convert once at the resolution boundary
        let mut binding_publish = PublishPacket {
            topic: "some/topic".to_string(),
            topic_alias: Some(2),
            ..Default::default()
        };

        let mut topic : Arc<str> = Arc::from(binding_publish.topic.as_str());
        assert!(resolver.resolve_topic_alias(&binding_publish.topic_alias, &mut topic).is_ok());
        binding_publish.topic = topic.to_string();

        let mut aliased_publish = PublishPacket {
            topic_alias: Some(2),
            ..Default::default()
        };

        let mut aliased_topic : Arc<str> = Arc::from(aliased_publish.topic.as_str());
        assert!(resolver.resolve_topic_alias(&aliased_publish.topic_alias, &mut aliased_topic).is_ok());
        aliased_publish.topic = aliased_topic.to_string();

        assert_eq!("some/topic", aliased_publish.topic);
    }

    #[test]
    fn inbound_resolver_reset_drops_bindings() {
        let mut resolver = InboundAliasResolver::new(4);

        let mut topic : Arc<str> = Arc::from("some/topic");
        assert!(resolver.resolve_topic_alias(&Some(1), &mut topic).is_ok());

        resolver.reset_for_new_connection(4);

        let mut empty : Arc<str> = Arc::from("");
        assert_matches!(resolver.resolve_topic_alias(&Some(1), &mut empty), Err(MqttError::ProtocolError(_)));
    }
}
