use tokio::sync::watch;

/// One-way latch marking that the store has received data at least once.
///
/// Built eagerly alongside its store so every waiter observes the same
/// latch. `set` is idempotent and there is no transition back to unset.
#[derive(Debug)]
pub struct ReadinessGate {
    tx: watch::Sender<bool>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Trip the latch, releasing every pending waiter.
    /// Further calls are no-ops.
    pub fn set(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the latch is set. Returns immediately when it already is.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so the channel cannot close
        // while we wait.
        rx.wait_for(|set| *set).await.unwrap();
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}
