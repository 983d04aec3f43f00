//! A minimal, explicit signal graph.
//!
//! - [`Signal`]: a writable cell that notifies its subscribers synchronously whenever its
//!   value changes.
//! - [`Derived`]: a read-only cell holding the cached output of a pure function of its
//!   inputs. It subscribes to those inputs and recomputes eagerly, so reads between changes
//!   are cheap and never stale.
//! - [`Subscription`]: RAII guard, dropping it unregisters the callback.
//!
//! A write propagates in two phases. First every derived cell downstream of it is
//! recomputed, then subscribers of the cells that changed are notified, so a subscriber
//! reading any other cell sees it consistent with the write. [`batch`] widens the first
//! phase to several writes.
//!
//! Each cell guards its value with its own lock and never holds it while subscribers run.
//! Writes to a cell, including [`Signal::update`]'s read-modify-write, are atomic, and
//! recomputations of one derived cell are serialized, so writers on several threads never
//! lose each other's changes.

mod derived;
mod signal;

pub use derived::Derived;
pub use signal::{Signal, Subscription, batch};

/// Anything that can be stored in a cell.
pub trait Value: Clone + PartialEq + Send + Sync + 'static {}

impl<T> Value for T where T: Clone + PartialEq + Send + Sync + 'static {}

mod sealed {
    use crate::reactive::Signal;

    pub trait Node<T> {
        fn cell(&self) -> &Signal<T>;
    }
}

/// Read access shared by every cell of the graph.
pub trait Readable<T: Value>: sealed::Node<T> {
    /// Borrow the current value.
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell().read(f)
    }

    /// Clone the current value.
    fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Number of effective changes since the cell was created.
    fn version(&self) -> u64 {
        self.cell().current_version()
    }

    /// Register `f` to be called with the new value after every change. It is not called
    /// with the current value.
    fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.cell().add_subscriber(f)
    }
}

impl<T: Value> Readable<T> for Signal<T> {}

impl<T: Value> Readable<T> for Derived<T> {}
