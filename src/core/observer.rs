use super::state::SchedState;
use crate::config::SchedConfig;

// Debug-build invariant checks run after every successful tick.
#[derive(Debug)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn observe(&mut self, config: &SchedConfig, state: &SchedState) {
        self.step += 1;

        for (id, entity) in &state.waiting {
            debug_assert!(
                entity.waiting_time <= config.max_wait_time,
                "entity {id:?} with waiting_time {} survived past max wait {}",
                entity.waiting_time,
                config.max_wait_time
            );
        }

        if let Some(deadline) = state.next_deadline() {
            debug_assert!(
                deadline > state.now,
                "due event with deadline {deadline} left pending at tick {}",
                state.now
            );
        }
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}
