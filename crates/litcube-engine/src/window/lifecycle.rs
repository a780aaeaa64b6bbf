/// Whether a context acquisition is the first one or a restoration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Acquire {
    Create,
    Restore,
}

/// Identifies one rendering context for the lifetime of the runtime.
///
/// Device-loss notifications carry the generation of the context that raised
/// them, so a late notification from a context that is already gone cannot
/// tear down its replacement.
pub type ContextGeneration = u64;

/// Bookkeeping for context creation, loss, and restoration.
///
/// Pure state: the runtime asks it what to do and performs the GPU work.
#[derive(Debug, Clone, Default)]
pub(crate) struct ContextLifecycle {
    /// Between `resumed` and `suspended`.
    active: bool,
    /// A context has been handed to the renderer at least once.
    started: bool,
    /// Generation of the context currently held, if any.
    live: Option<ContextGeneration>,
    /// Last generation handed out.
    issued: ContextGeneration,
    /// A device loss is waiting for an automatic re-acquire.
    restore_pending: bool,
}

impl ContextLifecycle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The app may draw again. Returns the acquisition to perform, if any.
    pub(crate) fn resumed(&mut self) -> Option<Acquire> {
        self.active = true;
        self.restore_pending = false;
        if self.live.is_some() {
            return None;
        }
        Some(self.next_acquire())
    }

    /// The app lost its surface. Returns `true` if a live context must be
    /// released. No restore is attempted until the next `resumed`.
    pub(crate) fn suspended(&mut self) -> bool {
        self.active = false;
        self.restore_pending = false;
        self.live.take().is_some()
    }

    /// A device reported loss. Returns `true` if it is the live context and
    /// must be released; stale notifications are ignored.
    pub(crate) fn device_lost(&mut self, generation: ContextGeneration) -> bool {
        if self.live != Some(generation) {
            return false;
        }
        self.live = None;
        self.restore_pending = self.active;
        true
    }

    /// The window is closing. Returns `true` if a live context must be
    /// released.
    pub(crate) fn closed(&mut self) -> bool {
        self.active = false;
        self.restore_pending = false;
        self.live.take().is_some()
    }

    /// Pending automatic restoration, consumed once.
    pub(crate) fn take_restore(&mut self) -> Option<Acquire> {
        if !(self.restore_pending && self.active && self.live.is_none()) {
            return None;
        }
        self.restore_pending = false;
        Some(Acquire::Restore)
    }

    /// Reserves the generation for a context about to be created.
    pub(crate) fn begin_acquire(&mut self) -> ContextGeneration {
        self.issued += 1;
        self.issued
    }

    /// The context created under `generation` is now in use.
    pub(crate) fn acquired(&mut self, generation: ContextGeneration) {
        self.live = Some(generation);
        self.started = true;
    }

    #[cfg(test)]
    fn live(&self) -> Option<ContextGeneration> {
        self.live
    }

    fn next_acquire(&self) -> Acquire {
        if self.started {
            Acquire::Restore
        } else {
            Acquire::Create
        }
    }
}
