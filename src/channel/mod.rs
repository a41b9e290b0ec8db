//! Ordered hand-off of commands between threads.
//!
//! Reader threads hold a [`CommandSender`] each and push whatever they
//! decode. A single consumer owns the [`CommandChannel`] and drains it from
//! its scheduling loop.
//!
//! ## Contract
//!
//! - `poll()` reports whether an item is ready without consuming it
//! - `pop()` removes the oldest item and may only follow a successful
//!   `poll()`; popping an empty channel panics
//! - Items from one sender arrive in the order they were pushed; items from
//!   different senders interleave in no particular order
//! - Nothing is dropped and nothing blocks the producer. There is no
//!   backpressure, so a consumer that falls behind lets the queue grow
//!
//! ## Example
//!
//! ```
//! use rust_draughts::channel::command_channel;
//!
//! let (sender, mut channel) = command_channel();
//! sender.push("move 9 3 4");
//! sender.push("moves 9");
//!
//! let mut seen = Vec::new();
//! while channel.poll() {
//!     seen.push(channel.pop());
//! }
//! assert_eq!(seen, ["move 9 3 4", "moves 9"]);
//! ```

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Create a connected sender/channel pair.
#[must_use]
pub fn command_channel<T>() -> (CommandSender<T>, CommandChannel<T>) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (
        CommandSender { sender },
        CommandChannel {
            receiver,
            pending: None,
        },
    )
}

/// Producer half. Clone one per reader thread.
#[derive(Debug)]
pub struct CommandSender<T> {
    sender: Sender<T>,
}

impl<T> Clone for CommandSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> CommandSender<T> {
    /// Enqueue an item.
    ///
    /// Never blocks. Returns false only if the consumer has been dropped,
    /// in which case the item is discarded.
    pub fn push(&self, item: T) -> bool {
        self.sender.send(item).is_ok()
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct CommandChannel<T> {
    receiver: Receiver<T>,

    /// Item fetched by `poll()` but not yet popped.
    pending: Option<T>,
}

impl<T> CommandChannel<T> {
    /// Check if an item is available, without removing it.
    pub fn poll(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = self.receiver.try_recv().ok();
        }
        self.pending.is_some()
    }

    /// Remove and return the oldest pending item.
    ///
    /// # Panics
    ///
    /// Panics if the channel is empty. Call [`poll`](Self::poll) first.
    pub fn pop(&mut self) -> T {
        match self.pending.take().or_else(|| self.receiver.try_recv().ok()) {
            Some(item) => item,
            None => panic!("pop on an empty command channel; poll first"),
        }
    }

    /// Pop everything that is pending right now.
    ///
    /// Items pushed while the iterator is being consumed are left for the
    /// next drain, so one drain always terminates.
    pub fn drain(&mut self) -> Drain<'_, T> {
        let remaining = self.len();
        Drain {
            channel: self,
            remaining,
        }
    }

    /// Block until an item arrives.
    ///
    /// Returns `None` once every sender is gone and the queue is empty.
    pub fn recv(&mut self) -> Option<T> {
        match self.pending.take() {
            Some(item) => Some(item),
            None => self.receiver.recv().ok(),
        }
    }

    /// Block until an item arrives or `timeout` elapses.
    ///
    /// Returns `None` on timeout and once every sender is gone.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<T> {
        if let Some(item) = self.pending.take() {
            return Some(item);
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Number of items waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len() + usize::from(self.pending.is_some())
    }

    /// Check if nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator returned by [`CommandChannel::drain`].
pub struct Drain<'a, T> {
    channel: &'a mut CommandChannel<T>,
    remaining: usize,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 || !self.channel.poll() {
            return None;
        }
        self.remaining -= 1;
        Some(self.channel.pop())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_poll_does_not_consume() {
        let (sender, mut channel) = command_channel();
        sender.push(1);

        assert!(channel.poll());
        assert!(channel.poll());
        assert_eq!(channel.len(), 1);
        assert_eq!(channel.pop(), 1);
        assert!(!channel.poll());
        assert!(channel.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let (sender, mut channel) = command_channel();
        for i in 0..10 {
            sender.push(i);
        }

        let mut out = Vec::new();
        while channel.poll() {
            out.push(channel.pop());
        }
        assert_eq!(out, (0..10).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "poll first")]
    fn test_pop_empty_panics() {
        let (_sender, mut channel) = command_channel::<u32>();
        channel.pop();
    }

    #[test]
    fn test_drain_is_bounded() {
        let (sender, mut channel) = command_channel();
        sender.push(1);
        sender.push(2);

        let mut drained = Vec::new();
        for item in channel.drain() {
            // Pushed mid-drain: left for the next round.
            sender.push(item * 10);
            drained.push(item);
        }

        assert_eq!(drained, vec![1, 2]);
        assert_eq!(channel.drain().collect::<Vec<_>>(), vec![10, 20]);
    }

    #[test]
    fn test_push_after_consumer_dropped() {
        let (sender, channel) = command_channel();
        drop(channel);
        assert!(!sender.push(5));
    }

    #[test]
    fn test_recv_returns_none_when_senders_gone() {
        let (sender, mut channel) = command_channel();
        sender.push(7);
        drop(sender);

        assert_eq!(channel.recv(), Some(7));
        assert_eq!(channel.recv(), None);
    }

    #[test]
    fn test_recv_prefers_polled_item() {
        let (sender, mut channel) = command_channel();
        sender.push(1);
        sender.push(2);

        assert!(channel.poll());
        assert_eq!(channel.recv_timeout(Duration::from_millis(10)), Some(1));
        assert_eq!(channel.recv(), Some(2));
        assert_eq!(channel.recv_timeout(Duration::from_millis(10)), None);
    }

    #[test]
    fn test_per_producer_order_across_threads() {
        let (sender, mut channel) = command_channel();

        let handles: Vec<_> = (0..4u32)
            .map(|producer| {
                let sender = sender.clone();
                thread::spawn(move || {
                    for seq in 0..250u32 {
                        sender.push((producer, seq));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut last = [None::<u32>; 4];
        let mut total = 0;
        while channel.poll() {
            let (producer, seq) = channel.pop();
            let slot = &mut last[producer as usize];
            assert!(slot.map_or(true, |prev| seq == prev + 1));
            *slot = Some(seq);
            total += 1;
        }
        assert_eq!(total, 1000);
    }
}
