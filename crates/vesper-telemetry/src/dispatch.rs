// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Interest-gated delivery of completed entries to the registered observer.

use crate::state::TimingState;
use std::fmt;
use vesper_core::telemetry::{EntryType, PerformanceEntry};

/// The observer callback. At most one is active per session.
pub type ObserverFn = Box<dyn FnMut(&PerformanceEntry)>;

/// Holds the session's single observer callback and delivers entries to it.
///
/// Interest counters and callback registration are independently mutable
/// external state: nonzero interest with no callback simply skips delivery.
pub struct ObserverDispatch {
    callback: Option<ObserverFn>,
}

impl ObserverDispatch {
    /// Creates a dispatcher with no callback registered.
    pub fn new() -> Self {
        Self { callback: None }
    }

    /// Registers the observer callback, silently replacing any previous one.
    pub fn set_callback(&mut self, callback: impl FnMut(&PerformanceEntry) + 'static) {
        if self.callback.is_some() {
            log::trace!("Observer callback replaced.");
        }
        self.callback = Some(Box::new(callback));
    }

    /// Removes the observer callback.
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Whether a callback is currently registered.
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Delivers `entry` to the registered callback if anyone is interested.
    ///
    /// An unknown `type_label`, a zero interest count for the resolved type,
    /// or a missing callback each make this a silent no-op; nobody asked
    /// for the payload. Returns whether the callback was invoked.
    pub fn notify(
        &mut self,
        state: &TimingState,
        type_label: &str,
        entry: &PerformanceEntry,
    ) -> bool {
        let Some(entry_type) = EntryType::from_label(type_label) else {
            log::trace!("Dropping entry with unknown type {type_label:?}.");
            return false;
        };
        if state.interest_count(entry_type) == 0 {
            return false;
        }
        match self.callback.as_mut() {
            Some(callback) => {
                callback(entry);
                true
            }
            None => {
                log::trace!("Interest in {type_label:?} but no observer callback; entry skipped.");
                false
            }
        }
    }
}

impl Default for ObserverDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObserverDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverDispatch")
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn gc_entry() -> PerformanceEntry {
        use vesper_core::telemetry::{GcFlags, GcKind};
        PerformanceEntry::gc(10.0, 2.0, GcKind::Minor, GcFlags::NONE)
    }

    fn recording_dispatch() -> (ObserverDispatch, Rc<RefCell<Vec<PerformanceEntry>>>) {
        let mut dispatch = ObserverDispatch::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        dispatch.set_callback(move |entry| sink.borrow_mut().push(entry.clone()));
        (dispatch, received)
    }

    #[test]
    fn zero_interest_skips_the_callback() {
        let state = TimingState::new();
        let (mut dispatch, received) = recording_dispatch();

        assert!(!dispatch.notify(&state, "gc", &gc_entry()));
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn interested_observer_receives_the_entry_unchanged() {
        let mut state = TimingState::new();
        state.add_interest(EntryType::Gc);
        let (mut dispatch, received) = recording_dispatch();

        let entry = gc_entry();
        assert!(dispatch.notify(&state, "gc", &entry));

        let received = received.borrow();
        assert_eq!(received.len(), 1, "Exactly one delivery");
        assert_eq!(received[0], entry);
    }

    #[test]
    fn unknown_type_labels_are_dropped() {
        let mut state = TimingState::new();
        state.add_interest(EntryType::Gc);
        let (mut dispatch, received) = recording_dispatch();

        assert!(!dispatch.notify(&state, "frame", &gc_entry()));
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn interest_without_a_callback_skips_delivery() {
        let mut state = TimingState::new();
        state.add_interest(EntryType::Gc);
        let mut dispatch = ObserverDispatch::new();

        assert!(!dispatch.notify(&state, "gc", &gc_entry()));
    }

    #[test]
    fn registering_replaces_instead_of_composing() {
        let mut state = TimingState::new();
        state.add_interest(EntryType::Gc);

        let first_hits = Rc::new(RefCell::new(0u32));
        let second_hits = Rc::new(RefCell::new(0u32));

        let mut dispatch = ObserverDispatch::new();
        let sink = Rc::clone(&first_hits);
        dispatch.set_callback(move |_| *sink.borrow_mut() += 1);
        let sink = Rc::clone(&second_hits);
        dispatch.set_callback(move |_| *sink.borrow_mut() += 1);

        dispatch.notify(&state, "gc", &gc_entry());
        assert_eq!(*first_hits.borrow(), 0, "Replaced callback never fires");
        assert_eq!(*second_hits.borrow(), 1);
    }

    #[test]
    fn cleared_callback_stops_delivery() {
        let mut state = TimingState::new();
        state.add_interest(EntryType::Gc);
        let (mut dispatch, received) = recording_dispatch();

        dispatch.clear_callback();
        assert!(!dispatch.has_callback());
        assert!(!dispatch.notify(&state, "gc", &gc_entry()));
        assert!(received.borrow().is_empty());
    }
}
