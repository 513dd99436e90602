use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks remote actions in flight so a caller can disable the control
/// that triggered them.
///
/// Overlapping actions are still allowed; the flag only reports that at
/// least one is running.
#[derive(Debug, Default)]
pub struct BusyFlag {
    in_flight: AtomicUsize,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    /// Mark one action as started until the returned guard is dropped.
    pub(crate) fn enter(&self) -> BusyGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        BusyGuard { flag: self }
    }
}

pub(crate) struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
