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

use log;

/// A single-consumer ready queue for work that must not run inline at the
/// point it is produced.
///
/// Producers `post` tasks from instrumentation callbacks; the owner drains
/// the queue on the next safe cooperative turn. Tasks never keep anything
/// alive on their own: dropping the queue drops every task that has not run,
/// silently. Teardown cancellation works the same way; there is no
/// per-task cancel handle.
#[derive(Debug)]
pub struct DeferredQueue<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> DeferredQueue<T> {
    /// Creates a new, empty queue backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Enqueues a task for the next drain.
    pub fn post(&self, task: T) {
        // The queue holds both halves, so this cannot fail while it exists.
        let _ = self.sender.send(task);
    }

    /// Returns a cloneable producer handle.
    pub fn sender(&self) -> DeferredSender<T> {
        DeferredSender {
            inner: self.sender.clone(),
        }
    }

    /// Takes every task currently queued, in posting order.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Discards every task currently queued without running it. Returns the
    /// number of tasks dropped.
    pub fn clear(&self) -> usize {
        let dropped = self.receiver.try_iter().count();
        if dropped > 0 {
            log::trace!("Discarded {dropped} deferred task(s).");
        }
        dropped
    }

    /// Number of tasks currently queued.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T: Send + 'static> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A producer handle detached from the queue's lifetime.
///
/// Posting after the queue is gone is a silent no-op: the task belongs to a
/// consumer that no longer exists.
#[derive(Debug)]
pub struct DeferredSender<T: Send + 'static> {
    inner: flume::Sender<T>,
}

impl<T: Send + 'static> DeferredSender<T> {
    /// Enqueues a task, dropping it silently if the queue has been torn down.
    pub fn post(&self, task: T) {
        if self.inner.send(task).is_err() {
            log::trace!("Deferred task dropped: queue no longer exists.");
        }
    }
}

impl<T: Send + 'static> Clone for DeferredSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_starts_empty() {
        let queue = DeferredQueue::<u32>::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn drain_preserves_posting_order() {
        let queue = DeferredQueue::new();
        queue.post(1);
        queue.post(2);
        queue.post(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(queue.is_empty(), "Drain should leave the queue empty");
    }

    #[test]
    fn sender_posts_into_the_same_queue() {
        let queue = DeferredQueue::new();
        let sender = queue.sender();
        let sender2 = sender.clone();

        sender.post("a");
        sender2.post("b");
        queue.post("c");

        assert_eq!(queue.drain(), vec!["a", "b", "c"]);
    }

    #[test]
    fn clear_discards_without_running() {
        let queue = DeferredQueue::new();
        queue.post(10);
        queue.post(20);

        assert_eq!(queue.clear(), 2);
        assert!(queue.drain().is_empty());
        assert_eq!(queue.clear(), 0);
    }

    #[test]
    fn post_after_queue_drop_is_silent() {
        let queue = DeferredQueue::new();
        let sender = queue.sender();
        drop(queue);

        // Must not panic; the task simply vanishes.
        sender.post(99);
    }
}
