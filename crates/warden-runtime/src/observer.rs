use crate::error::RuntimeResult;
use async_trait::async_trait;
use std::sync::Arc;
use warden_types::RuntimeSnapshot;

/// Source of running-container snapshots.
#[async_trait]
pub trait RuntimeObserver: Send + Sync {
    /// Names of all containers currently running.
    async fn list_running_instances(&self) -> RuntimeResult<RuntimeSnapshot>;

    /// Check that the runtime is reachable.
    async fn ping(&self) -> RuntimeResult<()> {
        self.list_running_instances().await.map(|_| ())
    }

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

#[async_trait]
impl<T: RuntimeObserver + ?Sized> RuntimeObserver for Arc<T> {
    async fn list_running_instances(&self) -> RuntimeResult<RuntimeSnapshot> {
        (**self).list_running_instances().await
    }

    async fn ping(&self) -> RuntimeResult<()> {
        (**self).ping().await
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}
