use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chain::RecoveryStrategy;
use crate::decimal::{Money, Rate};
use crate::types::{LoanId, PropertyId, TokenId};

/// all events that can be emitted by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // property lifecycle events
    PropertyRegistered {
        property_id: PropertyId,
        owner: String,
        value: Money,
        timestamp: DateTime<Utc>,
    },
    PropertyApproved {
        property_id: PropertyId,
        timestamp: DateTime<Utc>,
    },
    PropertyRejected {
        property_id: PropertyId,
        timestamp: DateTime<Utc>,
    },
    PropertyTokenized {
        property_id: PropertyId,
        token_id: TokenId,
        recovery_strategy: RecoveryStrategy,
        timestamp: DateTime<Utc>,
    },

    // loan lifecycle events
    LoanRequested {
        loan_id: LoanId,
        property_id: PropertyId,
        borrower: String,
        amount: Money,
        loan_to_value: Rate,
        timestamp: DateTime<Utc>,
    },
    LoanApproved {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanActivated {
        loan_id: LoanId,
        monthly_payment: Money,
        installments: u32,
        timestamp: DateTime<Utc>,
    },
    LoanRepaid {
        loan_id: LoanId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },
    LoanDefaulted {
        loan_id: LoanId,
        outstanding_installments: u32,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        loan_id: LoanId,
        installment_number: u32,
        scheduled_amount: Money,
        amount_paid: Money,
        timestamp: DateTime<Utc>,
    },
    InstallmentOverdue {
        loan_id: LoanId,
        installment_number: u32,
        due_date: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
