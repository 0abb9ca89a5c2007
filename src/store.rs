//! Observable state store
//!
//! A `Store` holds one value and notifies observers synchronously after
//! every write. `Field` scopes reads, writes and observation to one part of
//! the value, and `Accessor` is the read/write capability both provide, so
//! code can depend on a cell without knowing who owns it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

type Observer<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Inner<S> {
    value: RwLock<S>,
    observers: Mutex<Vec<Observer<S>>>,
}

/// Shared handle to an observable value
///
/// Cloning the handle shares the same value.
pub struct Store<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store").field("value", &*value).finish()
    }
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    pub fn new(value: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the whole value
    pub fn get(&self) -> S {
        self.read(S::clone)
    }

    /// Read through a borrow without cloning the whole value
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let value = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        f(&value)
    }

    /// Replace the whole value
    pub fn set(&self, value: S) {
        self.merge(|s| *s = value);
    }

    /// Apply several changes as one write
    ///
    /// Observers run once, after `f` returns, and see the complete result.
    pub fn merge<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let (result, snapshot) = {
            let mut value = self.inner.value.write().unwrap_or_else(PoisonError::into_inner);
            let result = f(&mut value);
            (result, value.clone())
        };
        self.notify(&snapshot);
        result
    }

    /// Register an observer, called after every write
    pub fn observe(&self, observer: impl Fn(&S) + Send + Sync + 'static) {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Accessor scoped to one field of the value
    pub fn field<T>(&self, get: fn(&S) -> &T, get_mut: fn(&mut S) -> &mut T) -> Field<S, T> {
        Field {
            store: self.clone(),
            get,
            get_mut,
        }
    }

    fn notify(&self, snapshot: &S) {
        // Observers may write back to the store, so the list is not held while they run
        let observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer(snapshot);
        }
    }
}

/// One field of a `Store`, readable, writable and observable on its own
pub struct Field<S, T> {
    store: Store<S>,
    get: fn(&S) -> &T,
    get_mut: fn(&mut S) -> &mut T,
}

impl<S, T> Clone for Field<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            get: self.get,
            get_mut: self.get_mut,
        }
    }
}

impl<S, T> fmt::Debug for Field<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").finish_non_exhaustive()
    }
}

impl<S, T> Field<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn get(&self) -> T {
        self.store.read(|s| (self.get)(s).clone())
    }

    pub fn set(&self, value: T) {
        self.store.merge(|s| *(self.get_mut)(s) = value);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.store.merge(|s| f((self.get_mut)(s)))
    }

    /// Register an observer called only when this field's value changes
    pub fn observe(&self, observer: impl Fn(&T) + Send + Sync + 'static) {
        let get = self.get;
        let last = Mutex::new(self.get());
        self.store.observe(move |s| {
            let current = get(s);
            let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
            if *last != *current {
                *last = current.clone();
                drop(last);
                observer(current);
            }
        });
    }
}

/// Read/write capability over a value owned elsewhere
pub trait Accessor<T>: Send + Sync {
    fn get(&self) -> T;
    fn set(&self, value: T);
}

impl<T> Accessor<T> for Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get(&self) -> T {
        Store::get(self)
    }

    fn set(&self, value: T) {
        Store::set(self, value);
    }
}

impl<S, T> Accessor<T> for Field<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn get(&self) -> T {
        Field::get(self)
    }

    fn set(&self, value: T) {
        Field::set(self, value);
    }
}
