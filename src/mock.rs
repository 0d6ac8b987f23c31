//! In-memory collaborators for host tests.
//!
//! Every mock is a cheap handle over shared state: clone it before handing it
//! to the tracker and keep the clone to inject input and inspect output.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::clock::Clock;
use crate::gnss::SerialSource;
use crate::lora::{LoraError, PacketBuffer, RadioLink};

#[derive(Debug, Clone, Default)]
pub struct MockSerial {
    rx: Rc<RefCell<VecDeque<u8>>>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes as if the receiver had sent them
    pub fn inject(&self, bytes: &[u8]) {
        self.rx.borrow_mut().extend(bytes.iter().copied());
    }

    pub fn pending(&self) -> usize {
        self.rx.borrow().len()
    }
}

impl SerialSource for MockSerial {
    fn read_available(&mut self, buffer: &mut [u8]) -> usize {
        let mut rx = self.rx.borrow_mut();
        let to_read = buffer.len().min(rx.len());

        for (slot, byte) in buffer.iter_mut().zip(rx.drain(..to_read)) {
            *slot = byte;
        }

        to_read
    }
}

#[derive(Debug, Default)]
struct RadioState {
    sent: Vec<Vec<u8>>,
    inbox: VecDeque<Vec<u8>>,
    packet: PacketBuffer,
    polls: usize,
    fail_transmit: bool,
    fail_poll: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockRadio {
    state: Rc<RefCell<RadioState>>,
}

impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a packet to be picked up by the next poll
    pub fn deliver(&self, payload: &[u8]) {
        self.state.borrow_mut().inbox.push_back(payload.to_vec());
    }

    /// Payloads transmitted so far, oldest first
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.borrow().sent.clone()
    }

    pub fn polls(&self) -> usize {
        self.state.borrow().polls
    }

    pub fn fail_transmit(&self, fail: bool) {
        self.state.borrow_mut().fail_transmit = fail;
    }

    pub fn fail_poll(&self, fail: bool) {
        self.state.borrow_mut().fail_poll = fail;
    }
}

impl RadioLink for MockRadio {
    type Error = LoraError;

    async fn transmit(&mut self, payload: &[u8]) -> Result<(), LoraError> {
        let mut state = self.state.borrow_mut();
        if state.fail_transmit {
            return Err(LoraError::TransmissionError);
        }

        state.sent.push(payload.to_vec());
        Ok(())
    }

    async fn poll_incoming(&mut self) -> Result<usize, LoraError> {
        let mut state = self.state.borrow_mut();
        state.polls += 1;
        if state.fail_poll {
            return Err(LoraError::InvalidConfig);
        }

        match state.inbox.pop_front() {
            Some(payload) => Ok(state.packet.load(&payload)),
            None => Ok(0),
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.state.borrow_mut().packet.next_byte()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_ms: Rc<Cell<u32>>,
    reads: Rc<Cell<usize>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: u32) {
        self.now_ms.set(now_ms);
    }

    /// Moves time forward, wrapping like the hardware counter
    pub fn advance(&self, ms: u32) {
        self.now_ms.set(self.now_ms.get().wrapping_add(ms));
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.now_ms.get()
    }
}
