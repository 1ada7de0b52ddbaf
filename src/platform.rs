use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;

use crate::chain::{recover_token_id, TokenChain};
use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::payments::{apply_next_payment, mark_overdue, PaymentReceipt};
use crate::property::Property;
use crate::repository::{
    InMemoryLoanRepository, InMemoryPropertyRepository, LoanRepository, PropertyRepository,
};
use crate::types::{LoanId, LoanStatus, PropertyId, PropertyStatus};
use crate::underwriting::{available_equity, loan_to_value, UnderwritingPolicy};

/// orchestrates the property and loan lifecycle over injected
/// repositories. every operation validates, mutates, persists and emits
/// events; nothing is persisted when an operation fails
pub struct LendingPlatform<P, L>
where
    P: PropertyRepository,
    L: LoanRepository,
{
    pub properties: P,
    pub loans: L,
    pub policy: UnderwritingPolicy,
    pub events: EventStore,
}

impl LendingPlatform<InMemoryPropertyRepository, InMemoryLoanRepository> {
    /// platform over in-memory stores, used in tests and demos
    pub fn in_memory(policy: UnderwritingPolicy) -> Self {
        Self::new(
            InMemoryPropertyRepository::new(),
            InMemoryLoanRepository::new(),
            policy,
        )
    }
}

impl<P, L> LendingPlatform<P, L>
where
    P: PropertyRepository,
    L: LoanRepository,
{
    pub fn new(properties: P, loans: L, policy: UnderwritingPolicy) -> Self {
        Self {
            properties,
            loans,
            policy,
            events: EventStore::new(),
        }
    }

    // --- property lifecycle ---

    /// register a property for review
    pub fn register_property(
        &mut self,
        owner: String,
        title: String,
        description: String,
        location: String,
        value: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Property> {
        let now = time_provider.now();
        let property = Property::register(owner, title, description, location, value, now)?;

        self.properties.insert(property.clone())?;

        self.events.emit(Event::PropertyRegistered {
            property_id: property.id,
            owner: property.owner.clone(),
            value: property.value,
            timestamp: now,
        });

        Ok(property)
    }

    /// approve a pending property for tokenization
    pub fn approve_property(
        &mut self,
        property_id: PropertyId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Property> {
        let mut property = self.get_property(property_id)?;
        property.approve()?;
        self.properties.update(&property)?;

        self.events.emit(Event::PropertyApproved {
            property_id,
            timestamp: time_provider.now(),
        });

        Ok(property)
    }

    /// reject a pending property
    pub fn reject_property(
        &mut self,
        property_id: PropertyId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Property> {
        let mut property = self.get_property(property_id)?;
        property.reject()?;
        self.properties.update(&property)?;

        self.events.emit(Event::PropertyRejected {
            property_id,
            timestamp: time_provider.now(),
        });

        Ok(property)
    }

    /// mint a token for an approved property and record the recovered
    /// token id. nothing is persisted if the id cannot be determined
    pub fn tokenize_property<C: TokenChain>(
        &mut self,
        property_id: PropertyId,
        chain: &mut C,
        time_provider: &SafeTimeProvider,
    ) -> Result<Property> {
        let mut property = self.get_property(property_id)?;

        // guard before minting so a failed precondition costs no transaction
        if property.status != PropertyStatus::Approved {
            return Err(LendingError::InvalidPropertyStatus {
                current: property.status,
                expected: PropertyStatus::Approved,
            });
        }

        let receipt = chain.mint(&property.owner, property_id, property.value)?;
        let recovered = recover_token_id(&receipt, &property.owner, property_id, chain)?;

        property.tokenize(recovered.token_id)?;
        self.properties.update(&property)?;

        self.events.emit(Event::PropertyTokenized {
            property_id,
            token_id: recovered.token_id,
            recovery_strategy: recovered.strategy,
            timestamp: time_provider.now(),
        });

        Ok(property)
    }

    // --- equity queries ---

    /// equity still available on a property, computed on demand from the
    /// loan repository aggregate
    pub fn available_equity(&self, property_id: PropertyId) -> Result<Money> {
        let property = self.get_property(property_id)?;
        let loans = self.loans.by_property(&property_id)?;
        available_equity(property.value, &loans)
    }

    /// maximum lendable amount under the underwriting policy
    pub fn max_loan_amount(&self, property_id: PropertyId) -> Result<Money> {
        let property = self.get_property(property_id)?;
        let equity = self.available_equity(property_id)?;
        Ok(self.policy.max_loan_amount(property.value, equity))
    }

    /// amount to pre-fill on a loan application
    pub fn suggested_loan_amount(&self, property_id: PropertyId) -> Result<Money> {
        let property = self.get_property(property_id)?;
        let equity = self.available_equity(property_id)?;
        Ok(self.policy.suggest_amount(property.value, equity))
    }

    // --- loan lifecycle ---

    /// create a loan request against a tokenized property. rejected with
    /// the computed maximum when the amount exceeds available equity
    #[allow(clippy::too_many_arguments)]
    pub fn request_loan(
        &mut self,
        property_id: PropertyId,
        borrower: String,
        amount: Money,
        interest_rate: Rate,
        term_months: u32,
        collateral_amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let property = self.get_property(property_id)?;

        let token_id = match property.token_id {
            Some(token_id) if property.is_loan_eligible() => token_id,
            _ => {
                return Err(LendingError::PropertyNotTokenized {
                    id: property_id,
                    status: property.status,
                })
            }
        };

        if term_months == 0 {
            return Err(LendingError::InvalidTerm {
                months: term_months,
            });
        }
        if interest_rate.as_decimal() < Decimal::ZERO || interest_rate.as_decimal() > Decimal::ONE {
            return Err(LendingError::InvalidInterestRate {
                rate: interest_rate,
            });
        }

        let equity = self.available_equity(property_id)?;
        self.policy.validate_request(amount, property.value, equity)?;

        let ltv = loan_to_value(amount, property.value)?;

        let loan = Loan::request(
            property_id,
            token_id,
            borrower,
            amount,
            interest_rate,
            term_months,
            collateral_amount,
            ltv,
        );

        self.loans.insert(loan.clone())?;

        self.events.emit(Event::LoanRequested {
            loan_id: loan.id,
            property_id,
            borrower: loan.borrower.clone(),
            amount,
            loan_to_value: ltv,
            timestamp: time_provider.now(),
        });

        Ok(loan)
    }

    /// approve a pending loan request
    pub fn approve_loan(
        &mut self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let mut loan = self.get_loan(loan_id)?;
        loan.approve()?;
        self.loans.update(&loan)?;

        self.events.emit(Event::LoanApproved {
            loan_id,
            timestamp: time_provider.now(),
        });

        Ok(loan)
    }

    /// activate an approved loan, generating its repayment schedule
    /// starting from the current time
    pub fn activate_loan(
        &mut self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();

        let mut loan = self.get_loan(loan_id)?;
        let schedule = loan.activate(now)?;
        let monthly_payment = schedule.monthly_payment;
        let installments = schedule.term_months;

        self.loans.update(&loan)?;

        self.events.emit(Event::LoanActivated {
            loan_id,
            monthly_payment,
            installments,
            timestamp: now,
        });

        Ok(loan)
    }

    /// record a payment against the next owed installment. the loan
    /// flips to repaid when the last installment settles
    pub fn record_payment(
        &mut self,
        loan_id: LoanId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        let now = time_provider.now();

        let mut loan = self.get_loan(loan_id)?;
        if loan.status != LoanStatus::Active {
            return Err(LendingError::InvalidLoanStatus {
                current: loan.status,
                expected: LoanStatus::Active,
            });
        }

        let receipt = apply_next_payment(loan.schedule_mut()?, amount)?;

        if receipt.schedule_settled {
            loan.mark_repaid()?;
        }

        self.loans.update(&loan)?;

        self.events.emit(Event::PaymentRecorded {
            loan_id,
            installment_number: receipt.installment_number,
            scheduled_amount: receipt.scheduled_amount,
            amount_paid: receipt.amount_paid,
            timestamp: now,
        });

        if receipt.schedule_settled {
            self.events.emit(Event::LoanRepaid {
                loan_id,
                total_paid: loan.paid_amount(),
                timestamp: now,
            });
        }

        Ok(receipt)
    }

    /// flip past-due pending installments to overdue on an active loan
    pub fn refresh_overdue(
        &mut self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<u32>> {
        let now = time_provider.now();

        let mut loan = self.get_loan(loan_id)?;
        if loan.status != LoanStatus::Active {
            return Ok(Vec::new());
        }

        let flipped = mark_overdue(loan.schedule_mut()?, now);
        if flipped.is_empty() {
            return Ok(flipped);
        }

        let overdue_dates: Vec<_> = {
            let schedule = loan.schedule_mut()?;
            flipped
                .iter()
                .map(|n| schedule.installments[(*n - 1) as usize].due_date)
                .collect()
        };

        self.loans.update(&loan)?;

        for (number, due_date) in flipped.iter().zip(overdue_dates) {
            self.events.emit(Event::InstallmentOverdue {
                loan_id,
                installment_number: *number,
                due_date,
                timestamp: now,
            });
        }

        Ok(flipped)
    }

    /// write off a non-terminal loan
    pub fn mark_defaulted(
        &mut self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let mut loan = self.get_loan(loan_id)?;
        loan.mark_defaulted()?;

        let outstanding = loan
            .schedule
            .as_ref()
            .map(|s| s.remaining())
            .unwrap_or(loan.term_months);

        self.loans.update(&loan)?;

        self.events.emit(Event::LoanDefaulted {
            loan_id,
            outstanding_installments: outstanding,
            timestamp: time_provider.now(),
        });

        Ok(loan)
    }

    // --- lookups ---

    pub fn property(&self, property_id: PropertyId) -> Result<Property> {
        self.get_property(property_id)
    }

    pub fn loan(&self, loan_id: LoanId) -> Result<Loan> {
        self.get_loan(loan_id)
    }

    pub fn properties_by_owner(&self, owner: &str) -> Result<Vec<Property>> {
        self.properties.by_owner(owner)
    }

    pub fn loans_by_borrower(&self, borrower: &str) -> Result<Vec<Loan>> {
        self.loans.by_borrower(borrower)
    }

    pub fn loans_by_property(&self, property_id: PropertyId) -> Result<Vec<Loan>> {
        self.loans.by_property(&property_id)
    }

    /// drain pending events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn get_property(&self, id: PropertyId) -> Result<Property> {
        self.properties
            .by_id(&id)?
            .ok_or(LendingError::PropertyNotFound { id })
    }

    fn get_loan(&self, id: LoanId) -> Result<Loan> {
        self.loans.by_id(&id)?.ok_or(LendingError::LoanNotFound { id })
    }
}
