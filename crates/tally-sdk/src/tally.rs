use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tally_events::{EventBus, EventFilter, EventRecord, EventStream, Notification};
use tally_ledger::{
    AuditReport, BalanceSheet, Expense, ExpenseId, ExpenseInfo, InMemoryLedger, LedgerAuditor,
    LedgerReader, LedgerWriter, NewExpense,
};
use tally_registry::{validate_name, InMemoryRegistry, Person, Registry};
use tally_types::{Amount, Balance, Clock, Identity, SystemClock};
use tracing::{debug, info, warn};

use crate::config::TallyConfig;
use crate::error::{TallyError, TallyResult};
use crate::settlement::Settlement;
use crate::snapshot::{TallySnapshot, SNAPSHOT_VERSION};

/// A shared expense ledger: participant registry, expense records and
/// notifications behind one entry point.
///
/// Mutating calls are serialized through a single writer lock and emit their
/// notification before releasing it, so notification order is acceptance
/// order. Reads go straight to the stores and never take the writer lock.
pub struct Tally {
    clock: Arc<dyn Clock>,
    registry: InMemoryRegistry,
    ledger: InMemoryLedger,
    bus: EventBus,
    writer: Mutex<()>,
}

impl Tally {
    /// Create an empty Tally on the system clock.
    pub fn new(config: TallyConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an empty Tally that stamps expenses and notifications with
    /// `clock`.
    pub fn with_clock(config: TallyConfig, clock: Arc<dyn Clock>) -> Self {
        let ledger =
            InMemoryLedger::new(Arc::clone(&clock)).with_cached_balances(config.cache_balances);
        Self {
            clock,
            registry: InMemoryRegistry::new(),
            ledger,
            bus: EventBus::new(config.bus_config()),
            writer: Mutex::new(()),
        }
    }

    /// Rebuild a Tally from a snapshot. No notifications are emitted.
    pub fn restore(snapshot: TallySnapshot, config: TallyConfig) -> TallyResult<Self> {
        Self::restore_with_clock(snapshot, config, Arc::new(SystemClock))
    }

    pub fn restore_with_clock(
        snapshot: TallySnapshot,
        config: TallyConfig,
        clock: Arc<dyn Clock>,
    ) -> TallyResult<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(TallyError::UnsupportedSnapshot {
                version: snapshot.version,
            });
        }

        let tally = Self::with_clock(config, clock);
        for person in &snapshot.people {
            let stored_trimmed = validate_name(&person.name).is_ok_and(|n| n == person.name);
            if !person.is_registered || !stored_trimmed {
                return Err(TallyError::InvalidSnapshotPerson {
                    identity: person.identity,
                });
            }
            tally.registry.register(person.identity, &person.name)?;
        }
        for expense in snapshot.expenses {
            tally.ledger.import(expense)?;
        }

        debug!(
            people = tally.registry.count(),
            expenses = tally.ledger.count(),
            "tally restored"
        );
        Ok(tally)
    }

    /// Export people in registration order and expenses in id order.
    pub fn snapshot(&self) -> TallySnapshot {
        let _guard = self.writer();
        TallySnapshot::new(self.registry.people(), self.ledger.expenses())
    }

    // ---- Registry ----

    pub fn register(&self, identity: Identity, name: &str) -> TallyResult<Person> {
        let _guard = self.writer();
        let person = self.registry.register(identity, name).map_err(|e| {
            warn!(%identity, error = %e, "registration rejected");
            e
        })?;

        info!(%identity, name = %person.name, "person registered");
        self.bus.emit(
            self.clock.now(),
            Notification::PersonRegistered {
                identity,
                name: person.name.clone(),
            },
        );
        Ok(person)
    }

    pub fn update_name(&self, identity: &Identity, new_name: &str) -> TallyResult<Person> {
        let _guard = self.writer();
        let person = self.registry.update_name(identity, new_name).map_err(|e| {
            warn!(%identity, error = %e, "name update rejected");
            e
        })?;

        info!(%identity, name = %person.name, "name updated");
        self.bus.emit(
            self.clock.now(),
            Notification::NameUpdated {
                identity: *identity,
                new_name: person.name.clone(),
            },
        );
        Ok(person)
    }

    /// Total: unregistered identities yield an empty, unregistered record.
    pub fn lookup(&self, identity: &Identity) -> Person {
        self.registry.lookup(identity)
    }

    pub fn person_count(&self) -> u64 {
        self.registry.count()
    }

    /// Registered identities in registration order.
    pub fn enumerate(&self) -> Vec<Identity> {
        self.registry.enumerate()
    }

    pub fn people(&self) -> Vec<Person> {
        self.registry.people()
    }

    // ---- Ledger ----

    /// Validate and append an expense. Participants need not be registered.
    pub fn add_expense(&self, input: &NewExpense) -> TallyResult<ExpenseId> {
        let _guard = self.writer();
        let expense = self.ledger.add_expense(input).map_err(|e| {
            warn!(label = %input.label, error = %e, "expense rejected");
            e
        })?;

        info!(id = expense.id, label = %expense.label, "expense added");
        self.bus.emit(
            expense.timestamp,
            Notification::ExpenseAdded {
                id: expense.id,
                label: expense.label,
            },
        );
        Ok(expense.id)
    }

    pub fn basic_info(&self, id: ExpenseId) -> TallyResult<ExpenseInfo> {
        Ok(self.ledger.basic_info(id)?)
    }

    pub fn participants(&self, id: ExpenseId) -> TallyResult<Vec<Identity>> {
        Ok(self.ledger.participants(id)?)
    }

    pub fn amount_paid(&self, id: ExpenseId, identity: &Identity) -> TallyResult<Amount> {
        Ok(self.ledger.amount_paid(id, identity)?)
    }

    pub fn amount_owed(&self, id: ExpenseId, identity: &Identity) -> TallyResult<Amount> {
        Ok(self.ledger.amount_owed(id, identity)?)
    }

    pub fn last_label(&self) -> TallyResult<String> {
        Ok(self.ledger.last_label()?)
    }

    /// Number of expenses, which is also the next id.
    pub fn expense_count(&self) -> u64 {
        self.ledger.count()
    }

    pub fn expense(&self, id: ExpenseId) -> TallyResult<Expense> {
        Ok(self.ledger.expense(id)?)
    }

    pub fn expenses(&self) -> Vec<Expense> {
        self.ledger.expenses()
    }

    // ---- Balances ----

    /// Paid minus owed across every expense. Positive means others owe
    /// `identity`.
    pub fn net_balance(&self, identity: &Identity) -> Balance {
        self.ledger.net_balance(identity)
    }

    pub fn balance_sheet(&self) -> BalanceSheet {
        BalanceSheet::build(&self.ledger)
    }

    /// `true` if cached balances match a full recomputation (always `true`
    /// with caching off).
    pub fn verify_balances(&self) -> bool {
        self.ledger.verify_cached_balances()
    }

    /// Audit every expense, flagging participants missing from the registry.
    pub fn audit(&self) -> AuditReport {
        LedgerAuditor::audit_against(&self.ledger, |identity| {
            self.registry.is_registered(identity)
        })
    }

    // ---- Settlement ----

    /// Announce that `payer` settled `amount` with `payee`.
    ///
    /// Only a notification is produced; no record or balance changes.
    pub fn record_settlement(
        &self,
        payer: Identity,
        payee: Identity,
        amount: Balance,
    ) -> TallyResult<EventRecord> {
        let _guard = self.writer();
        let settlement = Settlement::new(payer, payee, amount).map_err(|e| {
            warn!(%payer, %payee, amount, error = %e, "settlement rejected");
            e
        })?;

        info!(%payer, %payee, amount, "settlement recorded");
        Ok(self.bus.emit(
            self.clock.now(),
            Notification::DebtSettled {
                payer: settlement.payer,
                payee: settlement.payee,
                amount: settlement.amount,
            },
        ))
    }

    // ---- Notifications ----

    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        self.bus.subscribe(filter)
    }

    /// Retained notifications, oldest first.
    pub fn history(&self) -> Vec<EventRecord> {
        self.bus.history()
    }

    /// Retained notifications with `seq` greater than `after`, for readers
    /// catching up from the last record they saw.
    pub fn history_since(&self, after: u64) -> Vec<EventRecord> {
        self.bus.history_since(after)
    }

    /// Seq of the most recent notification, or 0 if none was emitted.
    pub fn last_seq(&self) -> u64 {
        self.bus.last_seq()
    }

    fn writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new(TallyConfig::default())
    }
}
