use keyed_priority_queue::KeyedPriorityQueue;
use slotmap::{new_key_type, SlotMap};

use super::event::TimedEvent;

pub type Ticks = u64;

new_key_type! {
    pub struct EntityId;
    pub struct EventKey;
}

#[derive(Debug, Clone, Copy)]
pub struct WaitingEntity {
    pub priority: i64,
    pub waiting_time: Ticks,
}

// KeyedPriorityQueue is a max-heap, so Deadline's Ord is flipped to pop the
// earliest deadline first, and among equal deadlines the earliest insertion.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct Deadline {
    pub time: Ticks,
    pub seq: u64,
}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub struct SchedState {
    pub now: Ticks,
    pub waiting: SlotMap<EntityId, WaitingEntity>,
    events: SlotMap<EventKey, Box<dyn TimedEvent>>,
    order: KeyedPriorityQueue<EventKey, Deadline>,

    // Increments per scheduled event; FIFO tie-break for equal deadlines
    next_seq: u64,
}

impl SchedState {
    pub fn new() -> Self {
        Self {
            now: 0,
            waiting: SlotMap::with_key(),
            events: SlotMap::with_key(),
            order: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn admit(&mut self, priority: i64) -> EntityId {
        self.waiting.insert(WaitingEntity {
            priority,
            waiting_time: 0,
        })
    }

    pub fn withdraw(&mut self, id: EntityId) -> bool {
        self.waiting.remove(id).is_some()
    }

    pub fn push_event(&mut self, event: Box<dyn TimedEvent>) {
        let deadline = Deadline {
            time: event.deadline(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let key = self.events.insert(event);
        self.order.push(key, deadline);
    }

    // Pops the earliest pending event iff its deadline has elapsed.
    pub fn pop_due(&mut self, now: Ticks) -> Option<(Deadline, Box<dyn TimedEvent>)> {
        match self.order.peek() {
            Some((_, deadline)) if deadline.time <= now => {}
            _ => return None,
        }

        let (key, deadline) = self
            .order
            .pop()
            .expect("peeked pending event vanished before pop");
        let event = self
            .events
            .remove(key)
            .expect("pending order references missing event");
        Some((deadline, event))
    }

    pub fn next_deadline(&self) -> Option<Ticks> {
        self.order.peek().map(|(_, deadline)| deadline.time)
    }

    pub fn pending_len(&self) -> usize {
        debug_assert_eq!(
            self.events.len(),
            self.order.len(),
            "event storage and deadline order out of sync"
        );
        self.order.len()
    }
}

impl Default for SchedState {
    fn default() -> Self {
        Self::new()
    }
}
