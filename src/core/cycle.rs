//! Purpose: Shared graph nodes and the scoped guard that decides what a cycle edge emits.
//! Exports: `Shared`, `CycleScope`, `DUPLICATE_LIMIT`.
//! Role: Lets `Rc`-linked graphs go through any serde serializer without overflowing the stack.
//! Invariants: Each thread has at most one active scope; nested scopes restore the outer one on drop.
//! Invariants: Without an installed scope a cycle is an error, never infinite recursion.
//! Notes: `Duplicate` output cannot be restored to the original graph; decoding
//! yields independent copies for every repeated node.
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};

use crate::core::policy::CycleHandling;

/// How many times a node may be re-emitted on a single ancestor path under `Duplicate`.
pub const DUPLICATE_LIMIT: usize = 1;

thread_local! {
    static ACTIVE: RefCell<CycleState> = RefCell::new(CycleState::default());
}

#[derive(Debug, Default)]
struct CycleState {
    mode: CycleHandling,
    path: Vec<usize>,
}

/// Installs a cycle mode for the current thread until dropped.
#[must_use]
pub struct CycleScope {
    previous: Option<CycleState>,
}

impl CycleScope {
    pub fn enter(mode: CycleHandling) -> Self {
        let previous = ACTIVE.with(|state| {
            state.replace(CycleState {
                mode,
                path: Vec::new(),
            })
        });
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for CycleScope {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            ACTIVE.with(|state| {
                state.replace(previous);
            });
        }
    }
}

enum Visit {
    Emit(PathEntry),
    Skip,
}

// Pops the node off the ancestor path when its subtree is done, including on error.
struct PathEntry;

impl Drop for PathEntry {
    fn drop(&mut self) {
        ACTIVE.with(|state| {
            state.borrow_mut().path.pop();
        });
    }
}

fn visit(addr: usize) -> Result<Visit, String> {
    ACTIVE.with(|state| {
        let mut state = state.borrow_mut();
        let seen = state.path.iter().filter(|entry| **entry == addr).count();
        if seen > 0 {
            match state.mode {
                CycleHandling::Error => {
                    return Err("self-referencing loop detected".to_string());
                }
                CycleHandling::Ignore => return Ok(Visit::Skip),
                CycleHandling::Duplicate if seen > DUPLICATE_LIMIT => return Ok(Visit::Skip),
                CycleHandling::Duplicate => {}
            }
        }
        state.path.push(addr);
        Ok(Visit::Emit(PathEntry))
    })
}

/// Reference-counted node handle for payloads that share or loop back to nodes.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printing the contents would recurse forever on cycles.
        write!(f, "Shared({:#x})", self.addr())
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Serialize> Serialize for Shared<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let _entry = match visit(self.addr()).map_err(<S::Error as ser::Error>::custom)? {
            Visit::Emit(entry) => entry,
            Visit::Skip => return serializer.serialize_unit(),
        };
        let value = self
            .0
            .try_borrow()
            .map_err(|_| <S::Error as ser::Error>::custom("shared node is mutably borrowed"))?;
        value.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Shared<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Shared::new)
    }
}
