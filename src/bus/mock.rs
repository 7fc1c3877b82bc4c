//! Recording I2C bus for driver tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::i2c::I2CError;
use super::{I2CBus, I2CHandle};

/// One bus operation as observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Open { address: u8 },
    Write { data: Vec<u8> },
    Read { count: usize },
    Close,
}

#[derive(Default)]
struct MockState {
    log: Vec<Transaction>,
    response: Vec<u8>,
    fail_open: bool,
    fail_write: bool,
    fail_read: bool,
    read_delay: Option<Duration>,
    open_handles: usize,
    max_open_handles: usize,
}

pub struct MockI2CBus {
    name: String,
    state: Arc<Mutex<MockState>>,
}

impl MockI2CBus {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Bytes returned by every read, truncated to the requested count.
    /// A response shorter than the request comes back as a short read.
    pub fn with_response(self, bytes: &[u8]) -> Self {
        self.state.lock().unwrap().response = bytes.to_vec();
        self
    }

    pub fn failing_open(self) -> Self {
        self.state.lock().unwrap().fail_open = true;
        self
    }

    pub fn failing_write(self) -> Self {
        self.state.lock().unwrap().fail_write = true;
        self
    }

    pub fn failing_read(self) -> Self {
        self.state.lock().unwrap().fail_read = true;
        self
    }

    /// Suspend every read for `delay`, leaving the handle open meanwhile
    pub fn with_read_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().read_delay = Some(delay);
        self
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.transactions()
            .into_iter()
            .filter_map(|t| match t {
                Transaction::Write { data } => Some(data),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Transaction) -> bool) -> usize {
        self.transactions().iter().filter(|t| matches(*t)).count()
    }

    /// Handles opened and not yet closed or dropped
    pub fn open_handles(&self) -> usize {
        self.state.lock().unwrap().open_handles
    }

    /// Most handles that were ever open at the same time
    pub fn max_open_handles(&self) -> usize {
        self.state.lock().unwrap().max_open_handles
    }
}

#[async_trait]
impl I2CBus for MockI2CBus {
    async fn open(&self, address: u8) -> Result<Box<dyn I2CHandle>, I2CError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(Transaction::Open { address });
        if state.fail_open {
            return Err(I2CError::Device(format!("no device at {:#04x}", address)));
        }
        state.open_handles += 1;
        state.max_open_handles = state.max_open_handles.max(state.open_handles);
        Ok(Box::new(MockHandle {
            state: self.state.clone(),
            open: true,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct MockHandle {
    state: Arc<Mutex<MockState>>,
    open: bool,
}

#[async_trait]
impl I2CHandle for MockHandle {
    async fn write(&mut self, data: &[u8]) -> Result<(), I2CError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(Transaction::Write { data: data.to_vec() });
        if state.fail_write {
            return Err(I2CError::Device("write not acknowledged".to_string()));
        }
        Ok(())
    }

    async fn read(&mut self, count: usize) -> Result<Vec<u8>, I2CError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.log.push(Transaction::Read { count });
            if state.fail_read {
                return Err(I2CError::Device("read not acknowledged".to_string()));
            }
            state.read_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock().unwrap();
        Ok(state.response.iter().copied().take(count).collect())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            let mut state = self.state.lock().unwrap();
            state.log.push(Transaction::Close);
            state.open_handles -= 1;
        }
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.close();
    }
}
