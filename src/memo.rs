//! Memoized computations keyed on shallow dependency snapshots.
//!
//! A [`Memo`] owns one cached value together with the [`Deps`] snapshot it was built from. Asking for
//! the value with a new snapshot only rebuilds it when the snapshot is not shallow-equal to the stored
//! one:
//!
//! - same number of entries,
//! - position-wise identity: value equality for primitives, pointer equality for [`Dep::by_ref`].
//!
//! No deep comparison is performed, and position matters.
//!
//! ```rust
//! use pod_actions::{deps, memo::Memo};
//!
//! let mut memo = Memo::default();
//! let mut built = 0;
//! for uri in ["a", "a", "b", "a"] {
//!     memo.get(|| { built += 1; uri.len() }, deps![uri]);
//! }
//! assert_eq!(built, 3);
//! ```

use std::{any::Any, fmt, rc::Rc};

/// A single dependency value.
#[derive(Clone)]
pub enum Dep {
    Undefined,
    Bool(bool),
    Int(i64),
    /// Unsigned values beyond `i64::MAX`; smaller ones are stored as [`Dep::Int`].
    UInt(u64),
    /// Compared bitwise: `NaN` equals itself and `0.0` differs from `-0.0`.
    Float(f64),
    Str(String),
    /// Pointer identity. The referent is kept alive for as long as the snapshot holds it, so its
    /// address cannot be reused by an unrelated allocation.
    Ref {
        addr: *const (),
        keep_alive: Rc<dyn Any>,
    },
}

impl Dep {
    /// Dependency on the identity of a shared value.
    pub fn by_ref<T: ?Sized + 'static>(value: &Rc<T>) -> Dep {
        Dep::Ref {
            addr: Rc::as_ptr(value) as *const (),
            keep_alive: Rc::new(value.clone()),
        }
    }
}

impl PartialEq for Dep {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dep::Undefined, Dep::Undefined) => true,
            (Dep::Bool(l), Dep::Bool(r)) => l == r,
            (Dep::Int(l), Dep::Int(r)) => l == r,
            (Dep::UInt(l), Dep::UInt(r)) => l == r,
            (Dep::Float(l), Dep::Float(r)) => l.to_bits() == r.to_bits(),
            (Dep::Str(l), Dep::Str(r)) => l == r,
            (Dep::Ref { addr: l, .. }, Dep::Ref { addr: r, .. }) => std::ptr::eq(*l, *r),
            _ => false,
        }
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dep::Undefined => write!(f, "Undefined"),
            Dep::Bool(b) => write!(f, "Bool({b})"),
            Dep::Int(i) => write!(f, "Int({i})"),
            Dep::UInt(u) => write!(f, "UInt({u})"),
            Dep::Float(x) => write!(f, "Float({x})"),
            Dep::Str(s) => write!(f, "Str({s:?})"),
            Dep::Ref { addr, .. } => write!(f, "Ref({addr:p})"),
        }
    }
}

impl From<bool> for Dep {
    fn from(value: bool) -> Self {
        Dep::Bool(value)
    }
}

impl From<i64> for Dep {
    fn from(value: i64) -> Self {
        Dep::Int(value)
    }
}

impl From<i32> for Dep {
    fn from(value: i32) -> Self {
        Dep::Int(value.into())
    }
}

impl From<u64> for Dep {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Dep::UInt(value), Dep::Int)
    }
}

impl From<usize> for Dep {
    fn from(value: usize) -> Self {
        // usize is at most 64 bits on every supported target
        Dep::from(value as u64)
    }
}

impl From<f64> for Dep {
    fn from(value: f64) -> Self {
        Dep::Float(value)
    }
}

impl From<&str> for Dep {
    fn from(value: &str) -> Self {
        Dep::Str(value.to_string())
    }
}

impl From<String> for Dep {
    fn from(value: String) -> Self {
        Dep::Str(value)
    }
}

impl From<&String> for Dep {
    fn from(value: &String) -> Self {
        Dep::Str(value.clone())
    }
}

impl<T: Into<Dep>> From<Option<T>> for Dep {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Dep::Undefined)
    }
}

impl<T: ?Sized + 'static> From<&Rc<T>> for Dep {
    fn from(value: &Rc<T>) -> Self {
        Dep::by_ref(value)
    }
}

/// Ordered dependency snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deps(Vec<Dep>);

impl Deps {
    pub fn new(deps: Vec<Dep>) -> Self {
        Deps(deps)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn shallow_eq(&self, other: &Deps) -> bool {
        shallow_equal(&self.0, &other.0)
    }
}

impl FromIterator<Dep> for Deps {
    fn from_iter<I: IntoIterator<Item = Dep>>(iter: I) -> Self {
        Deps(iter.into_iter().collect())
    }
}

/// Build a [`Deps`] snapshot from values convertible into [`Dep`].
#[macro_export]
macro_rules! deps {
    () => {
        $crate::memo::Deps::default()
    };
    ($($dep:expr),+ $(,)?) => {
        $crate::memo::Deps::new(vec![$($crate::memo::Dep::from($dep)),+])
    };
}

pub fn shallow_equal(a: &[Dep], b: &[Dep]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(l, r)| l == r)
}

#[derive(Debug)]
struct MemoEntry<R> {
    deps: Deps,
    value: R,
}

/// A value rebuilt only when its dependency snapshot changes.
#[derive(Debug)]
pub struct Memo<R> {
    entry: Option<MemoEntry<R>>,
}

impl<R> Default for Memo<R> {
    fn default() -> Self {
        Memo { entry: None }
    }
}

impl<R> Memo<R> {
    pub fn get<F>(&mut self, create: F, deps: Deps) -> &R
    where
        F: FnOnce() -> R,
    {
        let fresh = self
            .entry
            .as_ref()
            .is_some_and(|entry| entry.deps.shallow_eq(&deps));
        if !fresh {
            tracing::trace!("[Memo::get] dependencies changed, rebuilding ({} deps)", deps.len());
            self.entry = None;
        }
        let entry = self.entry.get_or_insert_with(|| MemoEntry {
            deps,
            value: create(),
        });
        &entry.value
    }

    /// The cached value, if one has been built.
    pub fn value(&self) -> Option<&R> {
        self.entry.as_ref().map(|entry| &entry.value)
    }

    /// In-place access for the owner of the cached value. The dependency snapshot is untouched.
    pub fn value_mut(&mut self) -> Option<&mut R> {
        self.entry.as_mut().map(|entry| &mut entry.value)
    }

    /// Drop the cached value; the next `get` always rebuilds.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps;
    use std::cell::Cell;

    fn count_builds(snapshots: Vec<Deps>) -> usize {
        let built = Cell::new(0);
        let mut memo = Memo::default();
        for snapshot in snapshots {
            memo.get(|| built.set(built.get() + 1), snapshot);
        }
        built.get()
    }

    #[test]
    fn test_first_call_always_builds() {
        assert_eq!(count_builds(vec![deps![]]), 1);
        assert_eq!(count_builds(vec![deps!["a", 1]]), 1);
    }

    #[test]
    fn test_builds_once_per_run_of_equal_snapshots() {
        let snapshots = vec![
            deps!["a", 1],
            deps!["a", 1],
            deps!["a", 2],
            deps!["a", 2],
            deps!["a", 2],
            deps!["a", 1],
            deps!["a", 1, true],
            deps!["a", 1, true],
        ];
        assert_eq!(count_builds(snapshots), 4);
    }

    #[test]
    fn test_position_matters() {
        assert_eq!(count_builds(vec![deps!["a", "b"], deps!["b", "a"]]), 2);
    }

    #[test]
    fn test_reference_identity() {
        let shared = Rc::new(String::from("fetch"));
        let same_value_other_alloc = Rc::new(String::from("fetch"));

        assert_eq!(
            count_builds(vec![deps![&shared], deps![&shared.clone()]]),
            1
        );
        assert_eq!(
            count_builds(vec![deps![&shared], deps![&same_value_other_alloc]]),
            2
        );
    }

    #[test]
    fn test_float_identity_semantics() {
        assert_eq!(Dep::Float(f64::NAN), Dep::Float(f64::NAN));
        assert_ne!(Dep::Float(0.0), Dep::Float(-0.0));
        assert_ne!(Dep::Int(1), Dep::Float(1.0));
    }

    #[test]
    fn test_unsigned_values_keep_their_identity() {
        assert_eq!(Dep::from(7u64), Dep::from(7i64));
        assert_eq!(Dep::from(7usize), Dep::Int(7));
        assert_eq!(Dep::from(u64::MAX), Dep::UInt(u64::MAX));
        assert_ne!(Dep::from(u64::MAX), Dep::from(-1i64));
        assert_ne!(Dep::from(u64::MAX), Dep::from(u64::MAX - 1));
    }

    #[test]
    fn test_option_maps_to_undefined() {
        let none: Option<&str> = None;
        assert_eq!(Dep::from(none), Dep::Undefined);
        assert_eq!(Dep::from(Some("x")), Dep::Str("x".to_string()));
    }

    #[test]
    fn test_value_mut_keeps_snapshot() {
        let mut memo = Memo::default();
        memo.get(|| vec![1], deps![1]);
        if let Some(v) = memo.value_mut() {
            v.push(2);
        }
        assert_eq!(memo.get(|| vec![], deps![1]), &vec![1, 2]);
        memo.invalidate();
        assert_eq!(memo.get(|| vec![], deps![1]), &Vec::<i32>::new());
    }
}
