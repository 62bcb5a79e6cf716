//! Thread-scoped holder for the current tenant identifier.
//!
//! Every OS thread owns one slot. Nothing clears the slot automatically, so
//! pooled worker threads keep whatever the last writer left behind. Prefer
//! [`ContextHolder::enter`] or [`ContextHolder::scope`] over raw
//! `get`/`set` pairs: the guard restores the previous value on every exit
//! path, including unwinding.

use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static CURRENT_TENANT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Returns true when the tenant is absent, empty, or whitespace only.
///
/// Blank tenants are stored and propagated literally; blankness only matters
/// to "context required" checks and cache name translation.
pub fn is_blank(tenant: Option<&str>) -> bool {
    tenant.map_or(true, |t| t.trim().is_empty())
}

/// Access point for the calling thread's tenant identifier.
pub struct ContextHolder;

impl ContextHolder {
    /// Get the tenant bound to the calling thread.
    pub fn get() -> Option<String> {
        CURRENT_TENANT.with(|slot| slot.borrow().clone())
    }

    /// Rebind the tenant for the calling thread. `None` clears it.
    pub fn set(tenant: Option<String>) {
        CURRENT_TENANT.with(|slot| *slot.borrow_mut() = tenant);
    }

    /// Rebind the tenant and return the value it replaced.
    pub fn replace(tenant: Option<String>) -> Option<String> {
        CURRENT_TENANT.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), tenant))
    }

    pub fn clear() {
        Self::set(None);
    }

    /// The current tenant, or `None` if it is absent or blank.
    pub fn current_non_blank() -> Option<String> {
        Self::get().filter(|t| !is_blank(Some(t.as_str())))
    }

    /// Install `tenant` until the returned guard is dropped.
    #[must_use = "the previous tenant is restored as soon as the guard is dropped"]
    pub fn enter(tenant: Option<String>) -> TenantContextGuard {
        let previous = Self::replace(tenant);
        TenantContextGuard {
            previous: Some(previous),
            _not_send: PhantomData,
        }
    }

    /// Run `f` with `tenant` installed, restoring the previous tenant afterwards.
    pub fn scope<F, R>(tenant: Option<String>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = Self::enter(tenant);
        f()
    }
}

/// Restores the previously bound tenant on drop.
///
/// Not `Send`: the guard must be dropped on the thread that created it.
#[derive(Debug)]
pub struct TenantContextGuard {
    previous: Option<Option<String>>,
    _not_send: PhantomData<*const ()>,
}

impl TenantContextGuard {
    /// The tenant that will be restored when this guard drops.
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_ref().and_then(|p| p.as_deref())
    }
}

impl Drop for TenantContextGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            ContextHolder::set(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_defaults_to_none() {
        assert_eq!(ContextHolder::get(), None);
    }

    #[test]
    fn test_set_and_clear() {
        ContextHolder::set(Some("acme".to_string()));
        assert_eq!(ContextHolder::get().as_deref(), Some("acme"));

        ContextHolder::clear();
        assert_eq!(ContextHolder::get(), None);
    }

    #[test]
    fn test_replace_returns_previous() {
        ContextHolder::set(Some("a".to_string()));
        let previous = ContextHolder::replace(Some("b".to_string()));
        assert_eq!(previous.as_deref(), Some("a"));
        assert_eq!(ContextHolder::get().as_deref(), Some("b"));
    }

    #[test]
    fn test_blank_tenants_are_stored_literally() {
        ContextHolder::set(Some("  ".to_string()));
        assert_eq!(ContextHolder::get().as_deref(), Some("  "));
        assert_eq!(ContextHolder::current_non_blank(), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t\n")));
        assert!(!is_blank(Some("acme")));
        assert!(!is_blank(Some(" acme ")));
    }

    #[test]
    fn test_guard_restores_previous() {
        ContextHolder::set(Some("outer".to_string()));
        {
            let guard = ContextHolder::enter(Some("inner".to_string()));
            assert_eq!(guard.previous(), Some("outer"));
            assert_eq!(ContextHolder::get().as_deref(), Some("inner"));
        }
        assert_eq!(ContextHolder::get().as_deref(), Some("outer"));
    }

    #[test]
    fn test_nested_guards_unwind_in_order() {
        let _a = ContextHolder::enter(Some("a".to_string()));
        {
            let _b = ContextHolder::enter(Some("b".to_string()));
            {
                let _none = ContextHolder::enter(None);
                assert_eq!(ContextHolder::get(), None);
            }
            assert_eq!(ContextHolder::get().as_deref(), Some("b"));
        }
        assert_eq!(ContextHolder::get().as_deref(), Some("a"));
    }

    #[test]
    fn test_scope_restores_after_panic() {
        ContextHolder::set(Some("stable".to_string()));
        let result = std::panic::catch_unwind(|| {
            ContextHolder::scope(Some("doomed".to_string()), || {
                assert_eq!(ContextHolder::get().as_deref(), Some("doomed"));
                panic!("boom");
            })
        });
        assert!(result.is_err());
        assert_eq!(ContextHolder::get().as_deref(), Some("stable"));
    }

    #[test]
    fn test_context_is_thread_scoped() {
        ContextHolder::set(Some("main".to_string()));
        let seen = std::thread::spawn(ContextHolder::get)
            .join()
            .expect("thread should not panic");
        assert_eq!(seen, None);
        assert_eq!(ContextHolder::get().as_deref(), Some("main"));
    }
}
