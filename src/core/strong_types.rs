// Strong Types - newtypes for ids and entity kinds
// Keeps raw integers and table discriminators from leaking across the graph API

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque, store-assigned entity id.
///
/// Serialised as a decimal string: snowflake ids exceed the 2^53 integers a
/// JavaScript client can hold. Numbers are still accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityIdVisitor)
    }
}

struct EntityIdVisitor;

impl<'de> Visitor<'de> for EntityIdVisitor {
    type Value = EntityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an entity id as an integer or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<EntityId, E> {
        Ok(EntityId(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<EntityId, E> {
        i64::try_from(value)
            .map(EntityId)
            .map_err(|_| E::custom(format!("entity id out of range: {}", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<EntityId, E> {
        value
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// Every kind of record the entity store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Profile,
    Group,
    Event,
    Post,
    Comment,
    Thread,
    Message,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::User,
        EntityKind::Profile,
        EntityKind::Group,
        EntityKind::Event,
        EntityKind::Post,
        EntityKind::Comment,
        EntityKind::Thread,
        EntityKind::Message,
    ];

    /// Discriminator stored in the `kind` column
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Profile => "profile",
            EntityKind::Group => "group",
            EntityKind::Event => "event",
            EntityKind::Post => "post",
            EntityKind::Comment => "comment",
            EntityKind::Thread => "thread",
            EntityKind::Message => "message",
        }
    }

    /// Human readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Profile => "Profile",
            EntityKind::Group => "Group",
            EntityKind::Event => "Event",
            EntityKind::Post => "Post",
            EntityKind::Comment => "Comment",
            EntityKind::Thread => "Thread",
            EntityKind::Message => "Message",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown entity kind: {}", s))
    }
}

/// Milliseconds since the unix epoch
pub fn current_time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
