use std::{
    cell::RefCell,
    fmt::{self, Debug, Formatter},
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    thread,
};

use parking_lot::{Mutex, RwLock};

use crate::reactive::{Value, sealed::Node};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Brings a derived cell up to date with the current values of its inputs.
pub(crate) type Recompute = Arc<dyn Fn() + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    version: AtomicU64,
    /// Derived cells reading this one. They are recomputed before any subscriber runs.
    dependents: Mutex<Vec<(u64, Recompute)>>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

thread_local! {
    /// Cells changed by the write in progress on this thread, waiting to notify.
    static PENDING: RefCell<Option<Vec<Arc<dyn Flush>>>> = const { RefCell::new(None) };
}

/// Run `f` as a single write.
///
/// Derived cells are kept up to date inside `f` as usual, but subscribers are only notified
/// once it returns, each at most once and with the final value.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    let _batch = Batch::begin();
    f()
}

/// Marks a write in progress. The outermost one flushes the pending notifications on drop.
struct Batch {
    outermost: bool,
}

impl Batch {
    fn begin() -> Self {
        let outermost = PENDING.with_borrow_mut(|pending| {
            if pending.is_some() {
                false
            } else {
                *pending = Some(Vec::new());
                true
            }
        });

        Self { outermost }
    }
}

impl Drop for Batch {
    fn drop(&mut self) {
        if !self.outermost {
            return;
        }

        // Cleared before flushing so subscribers that write start a batch of their own
        let pending = PENDING.with_borrow_mut(Option::take).unwrap_or_default();
        if thread::panicking() {
            return;
        }

        for cell in pending {
            cell.flush();
        }
    }
}

/// A writable cell of the signal graph.
///
/// Cloning a [`Signal`] yields another handle to the same cell.
pub struct Signal<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Value> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
                dependents: Mutex::new(Vec::new()),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the value, bring dependent cells up to date, then notify subscribers. Setting a
    /// value equal to the current one does nothing.
    pub fn set(&self, value: T) {
        let _batch = Batch::begin();

        {
            let mut current = self.inner.value.write();
            if *current == value {
                return;
            }
            *current = value;
            self.inner.version.fetch_add(1, Ordering::AcqRel);
        }

        self.propagate();
    }

    /// Modify the value in place as one atomic step, then propagate like [`set`](Self::set).
    ///
    /// The cell stays locked while `f` runs, so `f` must not access this signal.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let _batch = Batch::begin();

        {
            let mut current = self.inner.value.write();
            let mut next = current.clone();
            f(&mut next);
            if *current == next {
                return;
            }
            *current = next;
            self.inner.version.fetch_add(1, Ordering::AcqRel);
        }

        self.propagate();
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    pub(crate) fn current_version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    pub(crate) fn downgrade(&self) -> WeakSignal<T> {
        WeakSignal {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn add_subscriber<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().push((id, Arc::new(f)));

        self.subscription(id)
    }

    pub(crate) fn add_dependent(&self, recompute: Recompute) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.dependents.lock().push((id, recompute));

        self.subscription(id)
    }

    fn subscription(&self, id: u64) -> Subscription {
        let cell: Weak<dyn Detach> = Arc::downgrade(&self.inner) as Weak<dyn Detach>;
        Subscription { id, cell }
    }

    /// Queue this cell's notification, then recompute everything that reads it.
    fn propagate(&self) {
        let cell: Arc<dyn Flush> = self.inner.clone();
        let queued = PENDING.with_borrow_mut(|pending| match pending {
            Some(pending) => {
                if !pending.iter().any(|other| Arc::ptr_eq(other, &cell)) {
                    pending.push(cell.clone());
                }
                true
            }
            None => false,
        });

        let dependents: Vec<Recompute> = self
            .inner
            .dependents
            .lock()
            .iter()
            .map(|(_, recompute)| recompute.clone())
            .collect();
        for recompute in dependents {
            recompute();
        }

        if !queued {
            cell.flush();
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Debug> Debug for Signal<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.read())
            .field("version", &self.inner.version.load(Ordering::Acquire))
            .finish()
    }
}

impl<T: Default + Value> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Node<T> for Signal<T> {
    fn cell(&self) -> &Signal<T> {
        self
    }
}

/// A handle that doesn't keep its cell alive, used by derived cells to read their inputs.
pub(crate) struct WeakSignal<T> {
    inner: Weak<Inner<T>>,
}

impl<T> WeakSignal<T> {
    pub fn upgrade(&self) -> Option<Signal<T>> {
        self.inner.upgrade().map(|inner| Signal { inner })
    }
}

trait Flush {
    /// Call every subscriber with the current value.
    fn flush(&self);
}

impl<T: Value> Flush for Inner<T> {
    fn flush(&self) {
        let callbacks: Vec<Callback<T>> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        if callbacks.is_empty() {
            return;
        }

        let value = self.value.read().clone();
        for callback in callbacks {
            callback(&value);
        }
    }
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send + Sync> Detach for Inner<T> {
    fn detach(&self, id: u64) {
        self.dependents.lock().retain(|(other, _)| *other != id);
        self.subscribers.lock().retain(|(other, _)| *other != id);
    }
}

/// Keeps a callback registered on a cell. Dropping it unregisters the callback.
#[must_use = "dropping a Subscription unregisters its callback immediately"]
pub struct Subscription {
    id: u64,
    cell: Weak<dyn Detach>,
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.cell.strong_count() > 0))
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cell) = self.cell.upgrade() {
            cell.detach(self.id);
        }
    }
}

#[cfg(test)]
mod test {
    use std::{sync::Arc, thread};

    use parking_lot::Mutex;

    use crate::reactive::{Readable, Signal, batch};

    #[test]
    fn test_set_notifies() {
        let signal = Signal::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _sub = signal.subscribe({
            let seen = seen.clone();
            move |value| seen.lock().push(*value)
        });

        signal.set(2);
        signal.set(3);

        assert_eq!(*seen.lock(), vec![2, 3]);
        assert_eq!(signal.get(), 3);
        assert_eq!(signal.version(), 2);
    }

    #[test]
    fn test_set_equal_is_noop() {
        let signal = Signal::new(String::from("dark"));
        let calls = Arc::new(Mutex::new(0));

        let _sub = signal.subscribe({
            let calls = calls.clone();
            move |_| *calls.lock() += 1
        });

        signal.set("dark".into());
        signal.update(|_| {});

        assert_eq!(*calls.lock(), 0);
        assert_eq!(signal.version(), 0);
    }

    #[test]
    fn test_subscribers_called_in_order() {
        let signal = Signal::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (0..3)
            .map(|i| {
                let order = order.clone();
                signal.subscribe(move |_| order.lock().push(i))
            })
            .collect();

        signal.set(1);

        assert_eq!(*order.lock(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn test_drop_subscription_unsubscribes() {
        let signal = Signal::new(0);
        let calls = Arc::new(Mutex::new(0));

        let sub = signal.subscribe({
            let calls = calls.clone();
            move |_| *calls.lock() += 1
        });

        signal.set(1);
        drop(sub);
        signal.set(2);

        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_subscription_outlives_signal() {
        let signal = Signal::new(0);
        let sub = signal.subscribe(|_| {});

        drop(signal);
        drop(sub);
    }

    #[test]
    fn test_subscriber_reads_signal() {
        let signal = Signal::new(vec![1]);
        let seen = Arc::new(Mutex::new(0));

        let _sub = signal.subscribe({
            let signal = signal.downgrade();
            let seen = seen.clone();
            move |_| {
                if let Some(signal) = signal.upgrade() {
                    *seen.lock() = signal.with(|v| v.len());
                }
            }
        });

        signal.update(|v| v.push(2));

        assert_eq!(*seen.lock(), 2);
    }

    #[test]
    fn test_subscriber_may_write() {
        let source = Signal::new(0);
        let mirror = Signal::new(0);

        let _sub = source.subscribe({
            let mirror = mirror.clone();
            move |value| mirror.set(*value)
        });

        source.set(7);

        assert_eq!(mirror.get(), 7);
    }

    #[test]
    fn test_batch_notifies_once() {
        let signal = Signal::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _sub = signal.subscribe({
            let seen = seen.clone();
            move |value| seen.lock().push(*value)
        });

        batch(|| {
            signal.set(1);
            signal.set(2);
            assert!(seen.lock().is_empty());
        });

        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn test_set_from_another_thread() {
        let signal = Signal::new(0);

        thread::spawn({
            let signal = signal.clone();
            move || signal.set(42)
        })
        .join()
        .unwrap();

        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let signal = Signal::new(vec![0u32; 8]);

        thread::scope(|scope| {
            for slot in 0..8 {
                let signal = &signal;
                scope.spawn(move || {
                    for _ in 0..500 {
                        signal.update(|counts| {
                            if let Some(count) = counts.get_mut(slot) {
                                *count += 1;
                            }
                        });
                    }
                });
            }
        });

        assert_eq!(signal.get(), vec![500; 8]);
        assert_eq!(signal.version(), 4000);
    }
}
