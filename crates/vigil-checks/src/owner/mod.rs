//! Plugin lifetime control and pinning.
//!
//! A [`PluginOwner`] stands for one loadable plugin. While the plugin is
//! loaded it holds a shared "live" marker; every [`OwnerPin`] is another
//! strong reference to that marker. Reference counting is therefore done by
//! [`Arc`] itself: the owner keeps a [`Weak`] tracker and reads the strong
//! count to learn how many pins are outstanding.
//!
//! Teardown happens in two steps. [`PluginOwner::begin_teardown`] drops the
//! owner's own reference so that [`PluginOwner::acquire`] fails from then on,
//! and [`PluginOwner::wait_released`] blocks until the last pin is dropped.
//! Code reached through a pin is therefore never torn down underneath it.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, PoisonError, Weak};

use tracing::debug;

use crate::error::CheckError;
use crate::sync::lock;

const OWNER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::owner");

#[derive(Debug)]
struct Live;

#[derive(Debug)]
struct OwnerState {
    live: Option<Arc<Live>>,
    torn_down: bool,
}

#[derive(Debug)]
struct OwnerShared {
    name: String,
    tracker: Weak<Live>,
    state: Mutex<OwnerState>,
    released: Condvar,
}

/// Handle to the lifetime controller of one plugin.
///
/// Cloning the handle is cheap; all clones observe the same state.
///
/// # Example
///
/// ```
/// use vigil_checks::PluginOwner;
///
/// let owner = PluginOwner::new("plugina");
/// let pin = owner.acquire().expect("loaded owners accept pins");
/// assert_eq!(owner.pin_count(), 1);
///
/// owner.begin_teardown();
/// assert!(owner.acquire().is_none());
///
/// pin.release();
/// owner.wait_released();
/// assert!(owner.is_torn_down());
/// ```
#[derive(Clone)]
pub struct PluginOwner {
    shared: Arc<OwnerShared>,
}

impl PluginOwner {
    /// Creates the controller for a freshly loaded plugin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let live = Arc::new(Live);
        let tracker = Arc::downgrade(&live);
        Self {
            shared: Arc::new(OwnerShared {
                name: name.into(),
                tracker,
                state: Mutex::new(OwnerState {
                    live: Some(live),
                    torn_down: false,
                }),
                released: Condvar::new(),
            }),
        }
    }

    /// Name of the plugin this owner controls.
    #[must_use]
    pub fn name(&self) -> &str {
        self.shared.name.as_str()
    }

    /// Extends the plugin's lifetime by one pin.
    ///
    /// Returns `None` once teardown has begun.
    #[must_use = "dropping the pin releases it immediately"]
    pub fn acquire(&self) -> Option<OwnerPin> {
        let state = lock(&self.shared.state);
        state.live.as_ref().map(|live| OwnerPin {
            live: Some(Arc::clone(live)),
            owner: Arc::clone(&self.shared),
        })
    }

    /// Number of pins currently outstanding.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        let state = lock(&self.shared.state);
        let own = usize::from(state.live.is_some());
        self.shared.tracker.strong_count().saturating_sub(own)
    }

    /// Marks the plugin as unloading so that no further pins are granted.
    ///
    /// Pins already handed out stay valid until they are dropped.
    pub fn begin_teardown(&self) {
        let mut state = lock(&self.shared.state);
        if state.live.take().is_some() {
            debug!(
                target: OWNER_TARGET,
                owner = %self.shared.name,
                "teardown started"
            );
        }
    }

    /// Starts teardown only when no pin is outstanding.
    ///
    /// The check and the transition happen under the same lock that
    /// [`PluginOwner::acquire`] takes, so no pin can slip in between. Calling
    /// this on an owner that is already unloading succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InUse`] when pins are still held.
    pub fn try_begin_teardown(&self) -> Result<(), CheckError> {
        let mut state = lock(&self.shared.state);
        let Some(live) = state.live.as_ref() else {
            return Ok(());
        };
        let pins = Arc::strong_count(live).saturating_sub(1);
        if pins > 0 {
            return Err(CheckError::InUse {
                owner: self.shared.name.clone(),
                pins,
            });
        }
        state.live = None;
        debug!(
            target: OWNER_TARGET,
            owner = %self.shared.name,
            "teardown started"
        );
        Ok(())
    }

    /// Blocks until every pin has been released, then marks the owner as
    /// torn down.
    ///
    /// Implies [`PluginOwner::begin_teardown`].
    pub fn wait_released(&self) {
        let mut state = lock(&self.shared.state);
        state.live = None;
        while self.shared.tracker.strong_count() > 0 {
            state = self
                .shared
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if !state.torn_down {
            state.torn_down = true;
            debug!(
                target: OWNER_TARGET,
                owner = %self.shared.name,
                "teardown complete"
            );
        }
    }

    /// Returns `true` once teardown has begun.
    #[must_use]
    pub fn is_unloading(&self) -> bool {
        lock(&self.shared.state).live.is_none()
    }

    /// Returns `true` once teardown has completed.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        lock(&self.shared.state).torn_down
    }

    /// Returns `true` when both handles control the same plugin.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for PluginOwner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PluginOwner")
            .field("name", &self.shared.name)
            .field("pins", &self.pin_count())
            .field("unloading", &self.is_unloading())
            .finish()
    }
}

/// One outstanding extension of a plugin's lifetime.
///
/// Dropping the pin releases it.
#[derive(Debug)]
#[must_use = "dropping the pin releases it immediately"]
pub struct OwnerPin {
    live: Option<Arc<Live>>,
    owner: Arc<OwnerShared>,
}

impl OwnerPin {
    /// Name of the pinned plugin.
    #[must_use]
    pub fn owner_name(&self) -> &str {
        self.owner.name.as_str()
    }

    /// Releases the pin.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for OwnerPin {
    fn drop(&mut self) {
        drop(self.live.take());
        // Taking the state lock orders this wake-up after a waiter has
        // parked on the condition variable.
        let _state = lock(&self.owner.state);
        self.owner.released.notify_all();
    }
}
