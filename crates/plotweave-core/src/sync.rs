//! Typed in-place property merging.
//!
//! [`SyncProps`] merges a freshly submitted value into a retained one and
//! reports whether anything observable changed. Structs get a generated
//! implementation through `#[derive(SyncProps)]`, which visits each named
//! field in declaration order; fields marked `#[sync(skip)]` hold
//! renderer-side bookkeeping and are never overwritten or cleared.
//!
//! Merge rules:
//! - scalars are overwritten, flagging a change only when the value differs
//!   (two NaNs compare equal so merging stays idempotent);
//! - `Option`s going from `None` to `Some` copy the source, from `Some` to
//!   `None` delete the retained value;
//! - sequences merge element-wise, then truncate or extend to the source length.

/// In-place merge of a source value into a retained target.
pub trait SyncProps {
    /// Merge `source` into `self`, returning `true` if anything was added,
    /// changed or removed.
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool;
}

/// Records the dotted paths of fields touched by a merge.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeLog {
    path: Vec<&'static str>,
    changed: Vec<String>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into a named field.
    pub fn enter(&mut self, field: &'static str) {
        self.path.push(field);
    }

    /// Return to the parent of the current field.
    pub fn leave(&mut self) {
        self.path.pop();
    }

    /// Record a change at the current path.
    ///
    /// Repeated records for the same path (one per changed sequence element)
    /// collapse into a single entry.
    pub fn record(&mut self) {
        let current = if self.path.is_empty() {
            String::from("<root>")
        } else {
            self.path.join(".")
        };
        if self.changed.last() != Some(&current) {
            self.changed.push(current);
        }
    }

    /// Dotted paths of the fields that changed, in visit order.
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.changed.clear();
    }
}

/// Implement [`SyncProps`] for types merged by plain equality and replacement.
#[macro_export]
macro_rules! sync_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::sync::SyncProps for $ty {
                fn sync_props(&mut self, source: &Self, log: &mut $crate::sync::ChangeLog) -> bool {
                    if *self == *source {
                        return false;
                    }
                    *self = ::std::clone::Clone::clone(source);
                    log.record();
                    true
                }
            }
        )*
    };
}

sync_scalar!(bool, char, String, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// NaN-aware equality used for numeric leaves.
#[inline]
pub fn same_number(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl SyncProps for f64 {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        if same_number(*self, *source) {
            return false;
        }
        *self = *source;
        log.record();
        true
    }
}

impl SyncProps for f32 {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        if same_number(*self as f64, *source as f64) {
            return false;
        }
        *self = *source;
        log.record();
        true
    }
}

impl<T: SyncProps + Clone> SyncProps for Option<T> {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        match (self.as_mut(), source) {
            (None, None) => false,
            (Some(target), Some(source)) => target.sync_props(source, log),
            (None, Some(source)) => {
                *self = Some(source.clone());
                log.record();
                true
            }
            (Some(_), None) => {
                *self = None;
                log.record();
                true
            }
        }
    }
}

impl<T: SyncProps + Clone> SyncProps for Vec<T> {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        let mut changed = false;
        for (target, source) in self.iter_mut().zip(source) {
            changed |= target.sync_props(source, log);
        }

        if self.len() > source.len() {
            self.truncate(source.len());
            log.record();
            changed = true;
        } else if self.len() < source.len() {
            self.extend_from_slice(&source[self.len()..]);
            log.record();
            changed = true;
        }

        changed
    }
}

impl<T: SyncProps> SyncProps for Box<T> {
    fn sync_props(&mut self, source: &Self, log: &mut ChangeLog) -> bool {
        (**self).sync_props(source, log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_unchanged() {
        let mut log = ChangeLog::new();
        let mut value = String::from("a");
        assert!(!value.sync_props(&"a".to_string(), &mut log));
        assert!(log.is_empty());
    }

    #[test]
    fn test_nan_is_stable() {
        let mut log = ChangeLog::new();
        let mut value = f64::NAN;
        assert!(!value.sync_props(&f64::NAN, &mut log));
        assert!(value.sync_props(&1.0, &mut log));
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_option_delete_and_add() {
        let mut log = ChangeLog::new();
        let mut value = Some(3.0);
        assert!(value.sync_props(&None, &mut log));
        assert_eq!(value, None);
        assert!(value.sync_props(&Some(4.0), &mut log));
        assert_eq!(value, Some(4.0));
    }

    #[test]
    fn test_vec_compacts_and_extends() {
        let mut log = ChangeLog::new();
        let mut values = vec![1.0, 2.0, 3.0, 4.0];
        assert!(values.sync_props(&vec![1.0, 5.0], &mut log));
        assert_eq!(values, vec![1.0, 5.0]);
        assert!(values.sync_props(&vec![1.0, 5.0, 6.0], &mut log));
        assert_eq!(values, vec![1.0, 5.0, 6.0]);
        assert!(!values.sync_props(&vec![1.0, 5.0, 6.0], &mut log));
    }

    #[test]
    fn test_log_paths_collapse() {
        let mut log = ChangeLog::new();
        log.enter("x");
        let mut values = vec![0.0; 4];
        values.sync_props(&vec![1.0; 4], &mut log);
        log.leave();
        assert_eq!(log.changed(), &["x".to_string()]);
    }
}
