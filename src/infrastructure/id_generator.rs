// Entity ID Generator - Snowflake-like IDs with embedded node information
// 64-bit ID format: [timestamp:42][node_id:10][sequence:12]

use std::sync::Mutex;

use crate::core::{current_time_millis, EntityId};

const SEQUENCE_BITS: u32 = 12;
const NODE_BITS: u32 = 10;
const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;

/// Allows 1024 nodes and 4096 ids per millisecond per node
#[derive(Debug)]
pub struct EntityIdGenerator {
    node_id: u16,
    state: Mutex<GeneratorState>,
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_timestamp: u64,
    sequence: u64,
}

impl EntityIdGenerator {
    pub const MAX_NODE_ID: u16 = (1 << NODE_BITS) - 1;

    pub fn new(node_id: u16) -> Self {
        assert!(node_id < (1 << NODE_BITS), "Node ID must be less than 1024");

        Self {
            node_id,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    /// Generate next unique ID. Ids from one generator are strictly increasing.
    pub fn next_id(&self) -> EntityId {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut now = current_time_millis().max(0) as u64;
        if now < state.last_timestamp {
            // clock went backwards, keep counting on the last timestamp
            now = state.last_timestamp;
        }

        if now == state.last_timestamp {
            if state.sequence >= MAX_SEQUENCE {
                // sequence exhausted: spin to the next millisecond, at most
                // one millisecond of busy-wait under the lock
                while now <= state.last_timestamp {
                    std::hint::spin_loop();
                    now = current_time_millis().max(0) as u64;
                }
                state.sequence = 0;
            } else {
                state.sequence += 1;
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = now;

        let id = ((now & 0x3FF_FFFF_FFFF) << (NODE_BITS + SEQUENCE_BITS))
            | ((self.node_id as u64) << SEQUENCE_BITS)
            | (state.sequence & MAX_SEQUENCE);

        EntityId::new(id as i64)
    }

    /// Extract node ID from an entity ID
    pub fn extract_node_id(id: EntityId) -> u16 {
        ((id.value() as u64 >> SEQUENCE_BITS) & ((1 << NODE_BITS) - 1)) as u16
    }

    /// Extract sequence from an entity ID
    pub fn extract_sequence(id: EntityId) -> u16 {
        (id.value() as u64 & MAX_SEQUENCE) as u16
    }

    pub fn node_id(&self) -> u16 {
        self.node_id
    }
}
