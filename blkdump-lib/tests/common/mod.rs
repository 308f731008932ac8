#![allow(dead_code)]

use blkdump_lib::{Error, MonitorTransport, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use std::rc::Rc;

/// Everything observed on either side of the bridge, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Literal(String),
    Formatted(String),
    Read(Vec<u8>),
    Emit(Vec<u8>),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Fake monitor replaying a fixed reply and recording commands.
pub struct ScriptedMonitor {
    reply: VecDeque<u8>,
    consumed: usize,
    log: EventLog,
}

impl ScriptedMonitor {
    pub fn new(reply: &[u8]) -> Self {
        Self {
            reply: reply.iter().copied().collect(),
            consumed: 0,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn log(&self) -> EventLog {
        Rc::clone(&self.log)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> Vec<u8> {
        self.reply.iter().copied().collect()
    }

    pub fn commands(&self) -> Vec<Event> {
        self.log
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Literal(_) | Event::Formatted(_)))
            .cloned()
            .collect()
    }
}

impl MonitorTransport for ScriptedMonitor {
    fn send_literal(&mut self, command: &str) -> Result<()> {
        self.log.borrow_mut().push(Event::Literal(command.to_string()));
        Ok(())
    }

    fn send_formatted(&mut self, command: &str) -> Result<()> {
        self.log
            .borrow_mut()
            .push(Event::Formatted(command.to_string()));
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.reply.len() < buf.len() {
            return Err(Error::channel_closed("reading scripted reply"));
        }
        for b in buf.iter_mut() {
            *b = self.reply.pop_front().unwrap();
        }
        self.consumed += buf.len();
        self.log.borrow_mut().push(Event::Read(buf.to_vec()));
        Ok(())
    }
}

/// Output sink sharing the monitor's event log.
pub struct RecordingSink {
    log: EventLog,
}

impl RecordingSink {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.log.borrow_mut().push(Event::Emit(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn hex_reply(bytes: &[u8], prompt: &[u8]) -> Vec<u8> {
    let mut reply: Vec<u8> = bytes
        .iter()
        .flat_map(|b| format!("{:02x}", b).into_bytes())
        .collect();
    reply.extend_from_slice(prompt);
    reply
}
