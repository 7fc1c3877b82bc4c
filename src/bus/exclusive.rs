use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::i2c::I2CError;
use super::{I2CBus, I2CHandle};

/// Serialises every handle opened on `B`.
///
/// `open` takes the bus lock before opening the inner handle and the returned
/// handle keeps it until `close` or drop, so open, write, read and release run
/// as one unit with respect to other callers.
pub struct ExclusiveBus<B> {
    inner: B,
    lock: Arc<Mutex<()>>,
}

impl<B: I2CBus> ExclusiveBus<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: I2CBus> I2CBus for ExclusiveBus<B> {
    async fn open(&self, address: u8) -> Result<Box<dyn I2CHandle>, I2CError> {
        let guard = self.lock.clone().lock_owned().await;
        // A failed open drops the guard here
        let handle = self.inner.open(address).await?;
        Ok(Box::new(ExclusiveHandle {
            inner: handle,
            guard: Some(guard),
        }))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

struct ExclusiveHandle {
    inner: Box<dyn I2CHandle>,
    guard: Option<OwnedMutexGuard<()>>,
}

#[async_trait]
impl I2CHandle for ExclusiveHandle {
    async fn write(&mut self, data: &[u8]) -> Result<(), I2CError> {
        if self.guard.is_none() {
            return Err(I2CError::Closed);
        }
        self.inner.write(data).await
    }

    async fn read(&mut self, count: usize) -> Result<Vec<u8>, I2CError> {
        if self.guard.is_none() {
            return Err(I2CError::Closed);
        }
        self.inner.read(count).await
    }

    fn close(&mut self) {
        // Release the device before letting the next handle in
        self.inner.close();
        self.guard.take();
    }
}

impl Drop for ExclusiveHandle {
    fn drop(&mut self) {
        self.close();
    }
}
