use super::{
    event::{DeferredAction, EventError, TimedEvent},
    observer::Observer,
    state::{EntityId, SchedState, Ticks, WaitingEntity},
};
use crate::config::SchedConfig;

#[derive(Debug, Default)]
pub struct TickSummary {
    pub promoted: Vec<EntityId>,
    pub evicted: Vec<EntityId>,
    pub released: usize,
}

pub struct TickScheduler {
    config: SchedConfig,
    state: SchedState,
    observer: Observer,
}

impl TickScheduler {
    pub fn new(config: SchedConfig) -> Self {
        Self {
            config,
            state: SchedState::new(),
            observer: Observer::new(),
        }
    }

    pub fn tick(&mut self) -> Result<TickSummary, EventError> {
        self.state.advance_time(1);
        let now = self.state.now;

        // Age a stable snapshot of the waiting set; entities admitted by side
        // effects of this call are not aged until the next tick.
        let snapshot: Vec<EntityId> = self.state.waiting.keys().collect();
        let mut promoted = Vec::new();
        let mut evicted = Vec::new();
        for id in snapshot {
            let entity = match self.state.waiting.get_mut(id) {
                Some(entity) => entity,
                None => continue,
            };
            entity.waiting_time += 1;

            // Promotion fires once, on the tick that crosses the threshold.
            // Eviction checks the same post-increment waiting time, so an
            // entity can be promoted and evicted in one step.
            if entity.waiting_time == self.config.aging_threshold + 1 {
                entity.priority += 1;
                promoted.push(id);
                tracing::debug!(entity = ?id, priority = entity.priority, "promoted waiting entity");
            }
            if entity.waiting_time > self.config.max_wait_time {
                evicted.push(id);
            }
        }
        for &id in &evicted {
            self.state.waiting.remove(id);
            tracing::debug!(entity = ?id, now, "evicted waiting entity");
        }

        // Drain every due event, earliest deadline first. A failing event has
        // already been consumed; the rest stay pending for the next tick.
        let mut released = 0;
        while let Some((deadline, event)) = self.state.pop_due(now) {
            released += 1;
            event.fire().map_err(|source| EventError {
                deadline: deadline.time,
                now,
                source,
            })?;
        }
        if released > 0 {
            tracing::debug!(now, released, "released due events");
        }

        self.observer.observe(&self.config, &self.state);
        Ok(TickSummary {
            promoted,
            evicted,
            released,
        })
    }

    pub fn admit(&mut self, priority: i64) -> EntityId {
        let id = self.state.admit(priority);
        tracing::debug!(entity = ?id, priority, now = self.state.now, "admitted waiting entity");
        id
    }

    // Idempotent: removing an absent entity is a no-op.
    pub fn withdraw(&mut self, id: EntityId) -> bool {
        self.state.withdraw(id)
    }

    pub fn schedule(&mut self, event: Box<dyn TimedEvent>) {
        self.state.push_event(event);
    }

    pub fn schedule_at<F>(&mut self, deadline: Ticks, action: F)
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        self.state
            .push_event(Box::new(DeferredAction { deadline, action }));
    }

    pub fn now(&self) -> Ticks {
        self.state.now
    }

    pub fn entity(&self, id: EntityId) -> Option<&WaitingEntity> {
        self.state.waiting.get(id)
    }

    pub fn waiting_len(&self) -> usize {
        self.state.waiting.len()
    }

    pub fn pending_len(&self) -> usize {
        self.state.pending_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scheduler(aging_threshold: Ticks, max_wait_time: Ticks) -> TickScheduler {
        TickScheduler::new(SchedConfig {
            aging_threshold,
            max_wait_time,
        })
    }

    #[test]
    fn waiting_time_increments_once_per_tick() {
        let mut sched = scheduler(10, 100);
        let id = sched.admit(0);
        for _ in 0..4 {
            sched.tick().unwrap();
        }
        assert_eq!(sched.entity(id).unwrap().waiting_time, 4);
    }

    #[test]
    fn promotion_fires_exactly_once_at_crossing() {
        let mut sched = scheduler(3, 100);
        let id = sched.admit(7);

        for tick in 1..=3 {
            let summary = sched.tick().unwrap();
            assert!(summary.promoted.is_empty(), "promoted early at tick {tick}");
            assert_eq!(sched.entity(id).unwrap().priority, 7);
        }

        let summary = sched.tick().unwrap();
        assert_eq!(summary.promoted, vec![id]);
        assert_eq!(sched.entity(id).unwrap().priority, 8);

        let summary = sched.tick().unwrap();
        assert!(summary.promoted.is_empty());
        assert_eq!(sched.entity(id).unwrap().priority, 8);
    }

    #[test]
    fn eviction_boundary() {
        let mut sched = scheduler(100, 5);
        let id = sched.admit(0);

        for _ in 1..=5 {
            let summary = sched.tick().unwrap();
            assert!(summary.evicted.is_empty());
            assert!(sched.entity(id).is_some());
        }

        let summary = sched.tick().unwrap();
        assert_eq!(summary.evicted, vec![id]);
        assert!(sched.entity(id).is_none());
        assert_eq!(sched.waiting_len(), 0);
    }

    #[test]
    fn promote_and_evict_in_same_tick() {
        let mut sched = scheduler(5, 5);
        let id = sched.admit(1);
        for _ in 1..=5 {
            sched.tick().unwrap();
        }
        let summary = sched.tick().unwrap();
        assert_eq!(summary.promoted, vec![id]);
        assert_eq!(summary.evicted, vec![id]);
        assert!(sched.entity(id).is_none());
    }

    #[test]
    fn withdraw_is_idempotent() {
        let mut sched = scheduler(5, 5);
        let id = sched.admit(0);
        assert!(sched.withdraw(id));
        assert!(!sched.withdraw(id));
    }

    #[test]
    fn release_preserves_deadline_and_fifo_order() {
        let mut sched = scheduler(5, 5);
        let log = Rc::new(RefCell::new(Vec::new()));

        for (deadline, tag) in [(3, "first-3"), (3, "second-3"), (5, "at-5")] {
            let log = Rc::clone(&log);
            sched.schedule_at(deadline, move || {
                log.borrow_mut().push(tag);
                Ok(())
            });
        }

        for _ in 0..2 {
            assert_eq!(sched.tick().unwrap().released, 0);
        }
        assert_eq!(sched.tick().unwrap().released, 2);
        assert_eq!(*log.borrow(), vec!["first-3", "second-3"]);

        sched.tick().unwrap();
        assert_eq!(sched.tick().unwrap().released, 1);
        assert_eq!(*log.borrow(), vec!["first-3", "second-3", "at-5"]);
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn release_drains_all_due_events_in_one_tick() {
        let mut sched = scheduler(5, 5);
        let count = Rc::new(RefCell::new(0));
        for _ in 0..3 {
            let count = Rc::clone(&count);
            sched.schedule_at(1, move || {
                *count.borrow_mut() += 1;
                Ok(())
            });
        }
        assert_eq!(sched.tick().unwrap().released, 3);
        assert_eq!(*count.borrow(), 3);
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn custom_event_types_release_through_the_same_path() {
        struct Page {
            at: Ticks,
            copies: Rc<RefCell<u32>>,
        }
        impl TimedEvent for Page {
            fn deadline(&self) -> Ticks {
                self.at
            }
            fn fire(self: Box<Self>) -> anyhow::Result<()> {
                *self.copies.borrow_mut() += 1;
                Ok(())
            }
        }

        let mut sched = scheduler(5, 5);
        let copies = Rc::new(RefCell::new(0));
        sched.schedule(Box::new(Page {
            at: 2,
            copies: Rc::clone(&copies),
        }));

        sched.tick().unwrap();
        assert_eq!(*copies.borrow(), 0);
        sched.tick().unwrap();
        assert_eq!(*copies.borrow(), 1);
    }

    #[test]
    fn past_deadline_event_fires_on_next_tick() {
        let mut sched = scheduler(5, 5);
        sched.tick().unwrap();
        sched.tick().unwrap();

        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        sched.schedule_at(1, move || {
            *flag.borrow_mut() = true;
            Ok(())
        });
        sched.tick().unwrap();
        assert!(*fired.borrow());
    }

    #[test]
    fn event_failure_aborts_release_and_consumes_the_event() {
        let mut sched = scheduler(5, 5);
        let log = Rc::new(RefCell::new(Vec::new()));

        let ok = Rc::clone(&log);
        sched.schedule_at(1, move || {
            ok.borrow_mut().push("ok");
            Ok(())
        });
        sched.schedule_at(1, || Err(anyhow::anyhow!("jammed")));
        let late = Rc::clone(&log);
        sched.schedule_at(1, move || {
            late.borrow_mut().push("late");
            Ok(())
        });

        let err = sched.tick().unwrap_err();
        assert_eq!(err.deadline, 1);
        assert_eq!(err.now, 1);
        assert_eq!(*log.borrow(), vec!["ok"]);
        // Failed event is consumed; the remaining due event survives.
        assert_eq!(sched.pending_len(), 1);

        sched.tick().unwrap();
        assert_eq!(*log.borrow(), vec!["ok", "late"]);
        assert_eq!(sched.pending_len(), 0);
    }
}
