//! Synchronous listener lists.
//!
//! Delivery happens on the calling thread, in registration order, and
//! finishes before `publish` returns. The first listener error stops the
//! delivery and is handed back to the caller unchanged.

use crate::error::Result;

pub type Listener<T> = Box<dyn Fn(&T) -> Result<()> + Send + Sync>;

pub struct Channel<T> {
    listeners: Vec<Listener<T>>,
}

impl<T> Channel<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Delivers `event` to every listener.
    pub fn publish(&self, event: &T) -> Result<()> {
        for listener in &self.listeners {
            listener(event)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalkError;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn publish_without_listeners_is_noop() {
        let channel: Channel<u32> = Channel::new();
        assert!(channel.is_empty());
        assert!(channel.publish(&7).is_ok());
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut channel: Channel<u32> = Channel::new();
        for id in 0..3 {
            let seen = Arc::clone(&seen);
            channel.subscribe(move |event: &u32| {
                seen.lock().push((id, *event));
                Ok(())
            });
        }

        channel.publish(&1).unwrap();
        channel.publish(&2).unwrap();

        assert_eq!(channel.len(), 3);
        assert_eq!(
            *seen.lock(),
            vec![(0, 1), (1, 1), (2, 1), (0, 2), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn first_error_stops_delivery() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut channel: Channel<u32> = Channel::new();

        let first = Arc::clone(&seen);
        channel.subscribe(move |_: &u32| {
            first.lock().push("first");
            Ok(())
        });
        channel.subscribe(|_: &u32| Err(WalkError::listener("rejected")));
        let third = Arc::clone(&seen);
        channel.subscribe(move |_: &u32| {
            third.lock().push("third");
            Ok(())
        });

        let result = channel.publish(&0);
        assert!(matches!(result, Err(WalkError::Listener(_))));
        assert_eq!(*seen.lock(), vec!["first"]);
    }
}
