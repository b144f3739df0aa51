//! Events emitted by committed treasury operations.

use std::fmt;

use coffer_types::{Address, RequestId};
use serde::{Deserialize, Serialize};

/// Treasury-level events that observers (indexers, operator tools) can
/// replay from the [`EventLog`] or receive live through the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasuryEvent {
    /// Currency was added to the pool.
    Deposit { from: Address, amount: u128 },
    /// Shares moved. `from == None` is a mint.
    Transfer {
        from: Option<Address>,
        to: Address,
        amount: u128,
    },
    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
    /// The owner opened a withdrawal request.
    NewRequest { id: RequestId, amount: u128 },
    /// A voter locked shares on a request.
    NewVote {
        id: RequestId,
        voter: Address,
        amount: u128,
    },
    /// A request was settled; `payout` left the pool towards `recipient`.
    RequestResolved {
        id: RequestId,
        approved: bool,
        recipient: Address,
        payout: u128,
    },
    /// A voter pulled escrowed shares back after resolution.
    SharesReclaimed {
        id: RequestId,
        voter: Address,
        amount: u128,
    },
}

impl TreasuryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "Deposit",
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::NewRequest { .. } => "NewRequest",
            Self::NewVote { .. } => "NewVote",
            Self::RequestResolved { .. } => "RequestResolved",
            Self::SharesReclaimed { .. } => "SharesReclaimed",
        }
    }
}

impl fmt::Display for TreasuryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit { from, amount } => write!(f, "Deposit({from}, {amount})"),
            Self::Transfer { from: None, to, amount } => write!(f, "Transfer(mint, {to}, {amount})"),
            Self::Transfer {
                from: Some(from),
                to,
                amount,
            } => write!(f, "Transfer({from}, {to}, {amount})"),
            Self::Approval {
                owner,
                spender,
                amount,
            } => write!(f, "Approval({owner}, {spender}, {amount})"),
            Self::NewRequest { id, amount } => write!(f, "NewRequest({}, {amount})", id.raw()),
            Self::NewVote { id, voter, amount } => {
                write!(f, "NewVote({}, {voter}, {amount})", id.raw())
            }
            Self::RequestResolved {
                id,
                approved,
                recipient,
                payout,
            } => write!(
                f,
                "RequestResolved({}, {}, {recipient}, {payout})",
                id.raw(),
                if *approved { "approved" } else { "rejected" }
            ),
            Self::SharesReclaimed { id, voter, amount } => {
                write!(f, "SharesReclaimed({}, {voter}, {amount})", id.raw())
            }
        }
    }
}

/// Append-only, ordered record of every committed event.
///
/// An event's sequence number is its index in the log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<TreasuryEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, events: Vec<TreasuryEvent>) {
        self.events.extend(events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreasuryEvent> {
        self.events.iter()
    }

    /// Events with sequence number `>= seq`.
    pub fn since(&self, seq: usize) -> &[TreasuryEvent] {
        self.events.get(seq..).unwrap_or(&[])
    }

    /// Events with the given name, e.g. `"NewVote"`.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TreasuryEvent> + 'a {
        self.events.iter().filter(move |e| e.name() == name)
    }
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline after an operation commits, in emission
/// order; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&TreasuryEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TreasuryEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &TreasuryEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn bus_fans_out_to_all_listeners() {
        let mut bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let c = Arc::clone(&counter);
            bus.subscribe(Box::new(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        }
        bus.emit(&TreasuryEvent::NewRequest {
            id: RequestId::FIRST,
            amount: 1,
        });
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn log_slices_by_sequence_and_name() {
        let mut log = EventLog::new();
        log.append(vec![
            TreasuryEvent::NewRequest {
                id: RequestId::FIRST,
                amount: 20_000,
            },
            TreasuryEvent::NewVote {
                id: RequestId::FIRST,
                voter: Address::new("0xa"),
                amount: 8_000,
            },
        ]);
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(5).is_empty());
        assert_eq!(log.named("NewVote").count(), 1);
    }

    #[test]
    fn display_matches_event_signature() {
        let event = TreasuryEvent::NewVote {
            id: RequestId::new(0),
            voter: Address::new("0xa"),
            amount: 8_000,
        };
        assert_eq!(event.to_string(), "NewVote(0, 0xa, 8000)");
    }
}
