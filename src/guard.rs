// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Lock-guarded state for types that want serialized field access.

A type adopts the guard by keeping all of its mutable state in one struct and wrapping that
struct in a [`Guard`].  Individual fields are then exposed through accessor pairs generated by
[`guarded_field!`](crate::guarded_field) and [`deep_guarded_field!`](crate::deep_guarded_field),
or through hand-written methods built on [`Guard::synchronize`].

# Example

```
use guardlog::{Guard, guarded_field, deep_guarded_field};

#[derive(Debug, Default)]
struct Engine {
    rpm: u32,
}

impl Engine {
    fn rpm(&self) -> u32 { self.rpm }
    fn set_rpm(&mut self, rpm: u32) { self.rpm = rpm }
}

#[derive(Debug, Default)]
struct CarState {
    name: String,
    engine: Engine,
}

struct Car {
    state: Guard<CarState>,
}

impl Car {
    guarded_field!(pub name: String => state);
    deep_guarded_field!(pub speed: u32 => state.engine, rpm);
}

let car = Car { state: Guard::new(CarState::default()) };
car.set_name("beetle".to_string());
car.set_speed(3000);
assert_eq!(car.name(), "beetle");
assert_eq!(car.speed(), 3000);

// Several fields at once, under a single acquisition.
let (name, rpm) = car.state.synchronize(|raw| (raw.name.clone(), raw.engine.rpm()));
assert_eq!((name.as_str(), rpm), ("beetle", 3000));
```

# Reentrancy

The guard is not reentrant.  A block running inside [`Guard::synchronize`] must read and write
the raw state it was handed; calling a generated accessor on the same instance from inside the
block tries to take the lock a second time and deadlocks.  Nothing detects this.

For the same reason, an object reached through a deep accessor must not hold a reference back
to the instance that owns it.

# Construction

The raw state can only be reached through the guard, and the guard is created together with the
state in [`Guard::new`].  There is no way to call an accessor on an instance whose lock has not
been created yet.
*/

use wasm_safe_mutex::Mutex;

pub struct Guard<T> {
    raw: Mutex<T>,
}

impl<T> Guard<T> {
    pub fn new(raw: T) -> Self {
        Guard {
            raw: Mutex::new(raw),
        }
    }

    /**
    Runs `block` while holding the lock and returns its result.

    The lock is released when `block` returns, including when it returns early with an error
    or unwinds.

    # Deadlock

    Do not call another guarded accessor of the same instance from inside `block`.
    */
    pub fn synchronize<F, R>(&self, block: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut raw = self.raw.lock_sync();
        block(&mut *raw)
    }
}

impl<T: Default> Default for Guard<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        //reading the value would take the lock, which may already be held by the caller
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

/*
Boilerplate notes.

# Guard

Clone would need the lock; the point of the type is one lock per owning instance, so no.
PartialEq/Eq/Hash would all take the lock, hiding a deadlock inside `==`.  No.
Default forwards to the state.
Send/Sync follow from the mutex.
*/

#[cfg(test)]
mod tests {
    use super::Guard;
    use crate::{deep_guarded_field, guarded_field};
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Inner {
        value: u64,
    }

    impl Inner {
        fn value(&self) -> u64 {
            self.value
        }
        fn set_value(&mut self, value: u64) {
            self.value = value;
        }
    }

    #[derive(Debug, Default)]
    struct CounterState {
        value: u64,
        label: Option<String>,
        inner: Inner,
    }

    #[derive(Debug, Default)]
    struct Counter {
        state: Guard<CounterState>,
    }

    impl Counter {
        guarded_field!(value: u64 => state);
        guarded_field!(
            /// Optional label.
            pub(crate) label: Option<String> => state
        );
        deep_guarded_field!(nested: u64 => state.inner, value);
        deep_guarded_field!(value_alias: u64 => state.inner, value,);
    }

    #[test]
    fn accessors_read_back_writes() {
        let counter = Counter::default();
        assert_eq!(counter.value(), 0);
        counter.set_value(7);
        assert_eq!(counter.value(), 7);

        assert_eq!(counter.label(), None);
        counter.set_label(Some("seven".to_string()));
        assert_eq!(counter.label().as_deref(), Some("seven"));

        counter.set_nested(11);
        assert_eq!(counter.nested(), 11);
        assert_eq!(counter.value_alias(), 11);
        //the plain field is untouched by the deep one
        assert_eq!(counter.value(), 7);
    }

    #[test]
    fn synchronize_returns_block_result() {
        let counter = Counter::default();
        let r: Result<u64, &str> = counter.state.synchronize(|raw| {
            raw.value = 3;
            Err("failed")
        });
        assert_eq!(r, Err("failed"));
        //the lock was released even though the block failed
        assert_eq!(counter.value(), 3);
    }

    #[test]
    fn synchronize_releases_after_panic() {
        let counter = Arc::new(Counter::default());
        let move_counter = counter.clone();
        let result = thread::spawn(move || {
            move_counter.state.synchronize(|raw| {
                raw.value = 5;
                panic!("inside the guard");
            })
        })
        .join();
        assert!(result.is_err());
        counter.set_value(6);
        assert_eq!(counter.value(), 6);
    }

    #[test]
    fn accessor_blocks_while_synchronize_runs() {
        // Reentering from the same thread would deadlock, so probe the boundary from a
        // second thread: its accessor call must wait for the block to finish.
        let counter = Arc::new(Counter::default());
        let (tx, rx) = mpsc::channel();
        counter.state.synchronize(|raw| {
            raw.value = 1;
            let move_counter = counter.clone();
            let move_tx = tx.clone();
            thread::spawn(move || {
                let observed = move_counter.value();
                move_tx.send(observed).unwrap();
            });
            assert!(
                rx.recv_timeout(Duration::from_millis(100)).is_err(),
                "accessor completed while the guard was held"
            );
            raw.value = 2;
        });
        let observed = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(observed, 2);
    }

    #[test]
    fn concurrent_writes_are_never_torn() {
        const THREADS: u64 = 8;
        const WRITES: u64 = 500;
        let counter = Arc::new(Counter::default());
        // Every written value has the same high and low halves; a torn read would not.
        let encode = |t: u64, i: u64| {
            let half = (t << 16) | i;
            (half << 32) | half
        };
        let mut handles = Vec::new();
        for t in 0..THREADS {
            let move_counter = counter.clone();
            handles.push(thread::spawn(move || {
                for i in 0..WRITES {
                    move_counter.set_value(encode(t + 1, i));
                    let seen = move_counter.value();
                    assert_eq!(seen >> 32, seen & 0xFFFF_FFFF, "torn value {seen:#x}");
                    assert_ne!(seen, 0, "lost every write");
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        let last = counter.value();
        let half = last & 0xFFFF_FFFF;
        let (t, i) = (half >> 16, half & 0xFFFF);
        assert!((1..=THREADS).contains(&t));
        assert!(i < WRITES);
    }
}
