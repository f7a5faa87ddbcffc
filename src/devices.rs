//! Connected-device bookkeeping for hot-plug.
//!
//! The mapper addresses devices by index; the platform reports connections by
//! an opaque id. `ConnectedDevices` keeps the ids in connection order so an
//! index can be resolved, and tolerates every out-of-order notification.

use std::fmt::Debug;
use std::time::Duration;

/// How long the "controller connected" notice stays up.
pub const CONNECTION_NOTICE: Duration = Duration::from_millis(1300);

/// Connected device ids, in connection order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectedDevices<D> {
    ids: Vec<D>,
}

impl<D> Default for ConnectedDevices<D> {
    fn default() -> Self {
        Self { ids: Vec::new() }
    }
}

impl<D: Copy + PartialEq + Debug> ConnectedDevices<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a connection. Returns `false` if the id was already known.
    pub fn add(&mut self, id: D) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        tracing::debug!(device = ?id, index = self.ids.len(), "device connected");
        self.ids.push(id);
        true
    }

    /// Forget a device. Unknown ids are ignored.
    ///
    /// Devices connected after it shift down one index.
    pub fn remove(&mut self, id: D) -> bool {
        match self.ids.iter().position(|&d| d == id) {
            Some(index) => {
                self.ids.remove(index);
                tracing::debug!(device = ?id, index, "device disconnected");
                true
            }
            None => {
                tracing::warn!(device = ?id, "disconnect for unknown device ignored");
                false
            }
        }
    }

    /// Id at `index`, or `None` when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<D> {
        self.ids.get(index).copied()
    }

    #[inline]
    pub fn index_of(&self, id: D) -> Option<usize> {
        self.ids.iter().position(|&d| d == id)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = D> + '_ {
        self.ids.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Countdown for the on-screen connection notice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectionBanner {
    remaining: Duration,
}

impl ConnectionBanner {
    /// Show the notice for [`CONNECTION_NOTICE`], restarting it if shown.
    pub fn show(&mut self) {
        self.remaining = CONNECTION_NOTICE;
    }

    pub fn tick(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.remaining.is_zero()
    }
}
