use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use ember_abi::arch::Port;

use crate::io::PortIo;

/// One IN or OUT as seen by [`RecordingPorts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortAccess {
    Write(Port, u8),
    Read(Port, u8),
}

/// Port backend that logs every access and answers reads from per-port
/// scripts.
///
/// A read pops the next scripted value for its port. An exhausted or absent
/// script yields the default value (0 unless changed). `io_wait` is not
/// logged so that sequences compare cleanly.
pub struct RecordingPorts {
    log: RefCell<Vec<PortAccess>>,
    scripts: RefCell<Vec<(Port, VecDeque<u8>)>>,
    default_read: Cell<u8>,
    waits: Cell<usize>,
}

impl RecordingPorts {
    pub fn new() -> Self {
        Self {
            log: RefCell::new(Vec::new()),
            scripts: RefCell::new(Vec::new()),
            default_read: Cell::new(0),
            waits: Cell::new(0),
        }
    }

    /// Queues `values` for successive reads of `port`.
    pub fn script(&self, port: Port, values: &[u8]) {
        let mut scripts = self.scripts.borrow_mut();
        match scripts.iter_mut().find(|(p, _)| *p == port) {
            Some((_, queue)) => queue.extend(values.iter().copied()),
            None => scripts.push((port, values.iter().copied().collect())),
        }
    }

    pub fn set_default_read(&self, value: u8) {
        self.default_read.set(value);
    }

    pub fn accesses(&self) -> Vec<PortAccess> {
        self.log.borrow().clone()
    }

    pub fn writes(&self) -> Vec<(Port, u8)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|a| match *a {
                PortAccess::Write(p, v) => Some((p, v)),
                PortAccess::Read(..) => None,
            })
            .collect()
    }

    /// Writes whose port is in `ports`, in order.
    pub fn writes_to(&self, ports: &[Port]) -> Vec<(Port, u8)> {
        self.writes()
            .into_iter()
            .filter(|(p, _)| ports.contains(p))
            .collect()
    }

    pub fn read_count(&self, port: Port) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|a| matches!(a, PortAccess::Read(p, _) if *p == port))
            .count()
    }

    pub fn wait_count(&self) -> usize {
        self.waits.get()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
        self.waits.set(0);
    }
}

impl Default for RecordingPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIo for RecordingPorts {
    fn write_u8(&self, port: Port, value: u8) {
        self.log.borrow_mut().push(PortAccess::Write(port, value));
    }

    fn read_u8(&self, port: Port) -> u8 {
        let value = self
            .scripts
            .borrow_mut()
            .iter_mut()
            .find(|(p, _)| *p == port)
            .and_then(|(_, queue)| queue.pop_front())
            .unwrap_or(self.default_read.get());
        self.log.borrow_mut().push(PortAccess::Read(port, value));
        value
    }

    fn io_wait(&self) {
        self.waits.set(self.waits.get() + 1);
    }
}
