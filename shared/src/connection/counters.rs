use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionCounter {
    PacketsWritten,
    PacketsRead,
    PacketsDiscarded,
    PacketsAcked,
}

impl ConnectionCounter {
    pub const ALL: [ConnectionCounter; 4] = [
        ConnectionCounter::PacketsWritten,
        ConnectionCounter::PacketsRead,
        ConnectionCounter::PacketsDiscarded,
        ConnectionCounter::PacketsAcked,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConnectionCounter::PacketsWritten => "packets written",
            ConnectionCounter::PacketsRead => "packets read",
            ConnectionCounter::PacketsDiscarded => "packets discarded",
            ConnectionCounter::PacketsAcked => "packets acked",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ConnectionCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a Connection's counters. Counters only ever go up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionCounters {
    values: [u64; 4],
}

impl ConnectionCounters {
    pub fn get(&self, counter: ConnectionCounter) -> u64 {
        self.values[counter.index()]
    }

    pub(crate) fn increment(&mut self, counter: ConnectionCounter) {
        self.values[counter.index()] += 1;
    }

    pub(crate) fn add(&mut self, counter: ConnectionCounter, amount: u64) {
        self.values[counter.index()] += amount;
    }

    pub fn packets_written(&self) -> u64 {
        self.get(ConnectionCounter::PacketsWritten)
    }

    pub fn packets_read(&self) -> u64 {
        self.get(ConnectionCounter::PacketsRead)
    }

    pub fn packets_discarded(&self) -> u64 {
        self.get(ConnectionCounter::PacketsDiscarded)
    }

    pub fn packets_acked(&self) -> u64 {
        self.get(ConnectionCounter::PacketsAcked)
    }
}

impl fmt::Display for ConnectionCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, counter) in ConnectionCounter::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", counter, self.get(*counter))?;
        }
        Ok(())
    }
}
