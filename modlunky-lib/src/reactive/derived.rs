use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::reactive::{
    Readable, Signal, Subscription, Value,
    sealed::Node,
    signal::{Recompute, WeakSignal},
};

/// A read-only cell caching a pure function of its inputs.
///
/// A write to an input recomputes every derived cell downstream of it before any subscriber
/// is notified, so subscribers always observe a settled graph. Subscribers of a [`Derived`]
/// are only notified when the recomputed value differs from the cached one. Dropping the
/// last handle stops the recomputation.
#[derive(Debug, Clone)]
pub struct Derived<T> {
    output: Signal<T>,
    _inputs: Arc<[Subscription]>,
}

impl<T: Value> Derived<T> {
    /// Derive a value from a single input.
    pub fn map<S, R, F>(source: &R, f: F) -> Self
    where
        S: Value,
        R: Readable<S>,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let source = source.cell();
        let output = Signal::new(source.read(&f));

        let recompute = serialized(&output, {
            let source = source.downgrade();
            move || {
                trace!("Recomputing derived value from one input");
                source.upgrade().map(|source| source.read(&f))
            }
        });

        Self {
            output,
            _inputs: Arc::new([source.add_dependent(recompute)]),
        }
    }

    /// Derive a value from two inputs, recomputed when either of them changes.
    pub fn map2<A, B, RA, RB, F>(a: &RA, b: &RB, f: F) -> Self
    where
        A: Value,
        B: Value,
        RA: Readable<A>,
        RB: Readable<B>,
        F: Fn(&A, &B) -> T + Send + Sync + 'static,
    {
        let (a, b) = (a.cell(), b.cell());
        let output = Signal::new(a.read(|a| b.read(|b| f(a, b))));

        // Inputs are held weakly so two inputs never keep each other alive
        let recompute = serialized(&output, {
            let (a, b): (WeakSignal<A>, WeakSignal<B>) = (a.downgrade(), b.downgrade());
            move || {
                trace!("Recomputing derived value from two inputs");
                let (a, b) = (a.upgrade()?, b.upgrade()?);
                Some(a.read(|a| b.read(|b| f(a, b))))
            }
        });

        Self {
            output,
            _inputs: Arc::new([
                a.add_dependent(recompute.clone()),
                b.add_dependent(recompute),
            ]),
        }
    }

    /// Derive a value from a single input and the previously derived value.
    ///
    /// `seed` plays the part of the previous value for the first computation.
    pub fn fold<S, R, F>(source: &R, seed: T, f: F) -> Self
    where
        S: Value,
        R: Readable<S>,
        F: Fn(&T, &S) -> T + Send + Sync + 'static,
    {
        let source = source.cell();
        let output = Signal::new(source.read(|value| f(&seed, value)));

        let recompute = serialized(&output, {
            let source = source.downgrade();
            let previous = output.downgrade();
            move || {
                trace!("Folding derived value");
                let (source, previous) = (source.upgrade()?, previous.upgrade()?);
                Some(source.read(|value| previous.read(|previous| f(previous, value))))
            }
        });

        Self {
            output,
            _inputs: Arc::new([source.add_dependent(recompute)]),
        }
    }
}

/// Wrap `compute` so that recomputations of one cell never interleave. Each one reads the
/// latest inputs, so whichever runs last leaves the cell consistent with every write.
fn serialized<T, F>(output: &Signal<T>, compute: F) -> Recompute
where
    T: Value,
    F: Fn() -> Option<T> + Send + Sync + 'static,
{
    let output = output.clone();
    let lock = Mutex::new(());

    Arc::new(move || {
        let _recomputing = lock.lock();
        if let Some(next) = compute() {
            output.set(next);
        }
    })
}

impl<T> Node<T> for Derived<T> {
    fn cell(&self) -> &Signal<T> {
        &self.output
    }
}
