//! Publish/subscribe value holder.
//!
//! An [`Observable`] always has a current value. Subscribers are called with that
//! value as soon as they subscribe and again after every update, until their
//! [`Subscription`] is released.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    value: T,
    listeners: BTreeMap<u64, Listener<T>>,
    next_id: u64,
}

pub struct Observable<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Observable<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                value: initial,
                listeners: BTreeMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Copy of the current value
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Replaces the value and notifies every subscriber
    pub fn set(&self, value: T) {
        let (snapshot, listeners) = {
            let mut shared = self.lock();
            shared.value = value;
            (shared.value.clone(), Self::listeners(&shared))
        };

        // Listeners run without the lock held so they may read or publish again
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Applies `change` to the current value, then notifies subscribers
    pub fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut T),
    {
        self.update_if(|value| {
            change(value);
            true
        });
    }

    /// Applies `change`; subscribers are notified only if it returns `true`
    pub fn update_if<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        let (snapshot, listeners) = {
            let mut shared = self.lock();
            if !change(&mut shared.value) {
                return false;
            }
            (shared.value.clone(), Self::listeners(&shared))
        };

        for listener in listeners {
            listener(&snapshot);
        }
        true
    }

    /// Reads the current value without cloning it
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.lock().value)
    }

    /// Registers `listener`, calling it immediately with the current value
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let listener: Listener<T> = Arc::new(listener);
        let (id, current) = {
            let mut shared = self.lock();
            let id = shared.next_id;
            shared.next_id += 1;
            shared.listeners.insert(id, listener.clone());
            (id, shared.value.clone())
        };

        listener(&current);

        let weak: Weak<Mutex<Shared<T>>> = Arc::downgrade(&self.shared);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    if let Ok(mut shared) = shared.lock() {
                        shared.listeners.remove(&id);
                    }
                }
            })),
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn listeners(shared: &Shared<T>) -> Vec<Listener<T>> {
        shared.listeners.values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared<T>> {
        // A listener panicking must not take the value down with it
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Handle to a registered listener
///
/// Dropping it (or calling [`Subscription::unsubscribe`]) removes the listener;
/// no callback is delivered afterwards.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value: &T| sink.lock().unwrap().push(value.clone()))
    }

    #[test]
    fn test_subscriber_gets_current_value_then_updates() {
        let loading = Observable::new(false);
        let (seen, listener) = recorder::<bool>();

        let _sub = loading.subscribe(listener);
        loading.set(true);
        loading.set(false);

        assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_no_callbacks_after_unsubscribe() {
        let error: Observable<Option<String>> = Observable::new(None);
        let (seen, listener) = recorder::<Option<String>>();

        let sub = error.subscribe(listener);
        error.set(Some("boom".to_string()));
        sub.unsubscribe();
        error.set(None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("boom".to_string())]
        );
        assert_eq!(error.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let list = Observable::new(vec![1]);
        {
            let _sub = list.subscribe(|_| {});
            assert_eq!(list.subscriber_count(), 1);
        }
        assert_eq!(list.subscriber_count(), 0);
    }

    #[test]
    fn test_update_in_place() {
        let list = Observable::new(vec![1, 2]);
        list.update(|items| items.push(3));
        assert_eq!(list.get(), vec![1, 2, 3]);
        assert_eq!(list.with(|items| items.len()), 3);
    }

    #[test]
    fn test_update_if_skips_notification_when_unchanged() {
        let list = Observable::new(vec![1]);
        let (seen, listener) = recorder::<Vec<i32>>();
        let _sub = list.subscribe(listener);

        assert!(!list.update_if(|items| items.contains(&7)));
        assert!(list.update_if(|items| {
            items.push(2);
            true
        }));

        assert_eq!(*seen.lock().unwrap(), vec![vec![1], vec![1, 2]]);
    }

    #[test]
    fn test_listener_may_read_observable() {
        let counter = Arc::new(Observable::new(0));
        let inner = counter.clone();
        let (seen, record) = recorder::<i32>();

        let _sub = counter.subscribe(move |_| record(&inner.get()));
        counter.set(5);

        assert_eq!(*seen.lock().unwrap(), vec![0, 5]);
    }

    #[test]
    fn test_subscription_outlives_observable() {
        let list = Observable::new(0);
        let sub = list.subscribe(|_| {});
        drop(list);
        sub.unsubscribe();
    }
}
