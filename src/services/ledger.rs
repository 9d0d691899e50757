//! Ledger service
//!
//! The only code that moves wallet balances. Every transaction mutation goes
//! through here so that, for every wallet,
//!
//! ```text
//! current_balance == initial_balance + Σ effects of the transactions that reference it
//! ```
//!
//! Adding applies a transaction's posting, deleting reverts it, and updating
//! reverts the old posting before applying the new one. All three work on a
//! scratch copy of the touched wallets; nothing is written until every check
//! has passed.

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, CategoryId, Money, Transaction, TransactionId, TransactionKind, Wallet, WalletId,
};
use crate::storage::Storage;

/// Field values for a transaction being added or rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Money,
    pub date: NaiveDateTime,
    pub note: Option<String>,
    pub category_id: CategoryId,
    pub wallet_id: WalletId,
    /// Required for transfers, ignored otherwise
    pub destination_wallet_id: Option<WalletId>,
}

impl NewTransaction {
    pub fn new(
        amount: Money,
        date: NaiveDateTime,
        category_id: CategoryId,
        wallet_id: WalletId,
    ) -> Self {
        Self {
            amount,
            date,
            note: None,
            category_id,
            wallet_id,
            destination_wallet_id: None,
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn destination(mut self, wallet_id: WalletId) -> Self {
        self.destination_wallet_id = Some(wallet_id);
        self
    }

    /// The current field values of a stored transaction
    ///
    /// Returns `None` for orphaned transactions, which have no category to
    /// post against.
    pub fn from_existing(txn: &Transaction) -> Option<Self> {
        Some(Self {
            amount: txn.amount,
            date: txn.date,
            note: txn.note.clone(),
            category_id: txn.category_id?,
            wallet_id: txn.wallet_id,
            destination_wallet_id: txn.destination_wallet_id,
        })
    }
}

/// A wallet whose cached balance disagrees with its transaction history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDiscrepancy {
    pub wallet_id: WalletId,
    pub wallet_name: String,
    pub cached: Money,
    pub expected: Money,
}

impl BalanceDiscrepancy {
    /// How far the cached balance is from the recomputed one
    pub fn drift(&self) -> Money {
        self.cached.saturating_sub(self.expected)
    }
}

/// What a transaction does to balances, resolved against its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Posting {
    kind: TransactionKind,
    amount: Money,
    wallet: WalletId,
    destination: Option<WalletId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Apply,
    Revert,
}

impl Direction {
    fn orient(self, delta: Money) -> Money {
        match self {
            Direction::Apply => delta,
            Direction::Revert => -delta,
        }
    }
}

/// Signed balance changes made by applying a posting
fn balance_deltas(posting: &Posting) -> Vec<(WalletId, Money)> {
    match posting.kind {
        TransactionKind::Income => vec![(posting.wallet, posting.amount)],
        TransactionKind::Expense => vec![(posting.wallet, -posting.amount)],
        TransactionKind::Transfer => {
            let mut deltas = vec![(posting.wallet, -posting.amount)];
            if let Some(dest) = posting.destination {
                deltas.push((dest, posting.amount));
            }
            deltas
        }
    }
}

/// Working copies of the wallets an operation touches
struct BalanceSheet<'s> {
    storage: &'s Storage,
    original: HashMap<WalletId, Wallet>,
    working: HashMap<WalletId, Wallet>,
}

impl<'s> BalanceSheet<'s> {
    fn new(storage: &'s Storage) -> Self {
        Self {
            storage,
            original: HashMap::new(),
            working: HashMap::new(),
        }
    }

    /// Pull a wallet into the sheet; `false` if it no longer exists
    fn load(&mut self, id: WalletId) -> LedgerResult<bool> {
        if self.working.contains_key(&id) {
            return Ok(true);
        }

        match self.storage.wallets.get(id)? {
            Some(wallet) => {
                self.original.insert(id, wallet.clone());
                self.working.insert(id, wallet);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn post(&mut self, posting: &Posting, direction: Direction) -> LedgerResult<()> {
        for (wallet_id, delta) in balance_deltas(posting) {
            let delta = direction.orient(delta);

            if !self.load(wallet_id)? {
                debug!(wallet = %wallet_id, "wallet no longer exists, skipping delta");
                continue;
            }

            if let Some(wallet) = self.working.get_mut(&wallet_id) {
                debug!(wallet = %wallet_id, delta = delta.units(), ?direction, "balance delta");
                if wallet.adjust_balance(delta).is_none() {
                    return Err(LedgerError::Validation(format!(
                        "Amount {} would overflow the balance of wallet '{}'",
                        posting.amount, wallet.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Working and stored balance of a wallet already in the sheet
    fn balances(&self, id: WalletId) -> Option<(Money, Money)> {
        let working = self.working.get(&id)?.current_balance();
        let original = self.original.get(&id)?.current_balance();
        Some((working, original))
    }

    fn wallet_name(&self, id: WalletId) -> String {
        self.working
            .get(&id)
            .map(|w| w.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Write changed wallets back to the repository, returning audit entries
    fn commit(self) -> LedgerResult<Vec<AuditEntry>> {
        let Self {
            storage,
            original,
            working,
        } = self;

        let mut changed: Vec<(Wallet, Wallet)> = working
            .into_values()
            .filter_map(|after| {
                let before = original.get(&after.id)?;
                (before.current_balance() != after.current_balance())
                    .then(|| (before.clone(), after))
            })
            .collect();
        changed.sort_by(|a, b| a.1.name.cmp(&b.1.name));

        let mut entries = Vec::with_capacity(changed.len());
        for (before, after) in changed {
            entries.push(AuditEntry::update(
                EntityType::Wallet,
                after.id.to_string(),
                Some(after.name.clone()),
                &before,
                &after,
            ));
            storage.wallets.upsert(after)?;
        }

        Ok(entries)
    }
}

fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Service that keeps wallet balances consistent with transactions
pub struct LedgerService<'a> {
    storage: &'a Storage,
    enforce_sufficient_funds: bool,
}

impl<'a> LedgerService<'a> {
    /// Create a ledger service with the funds check enabled
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            enforce_sufficient_funds: true,
        }
    }

    /// Create a ledger service following the user's settings
    pub fn with_settings(storage: &'a Storage, settings: &Settings) -> Self {
        Self::new(storage).enforce_sufficient_funds(settings.enforce_sufficient_funds)
    }

    /// Turn the insufficient-funds check on or off
    pub fn enforce_sufficient_funds(mut self, enforce: bool) -> Self {
        self.enforce_sufficient_funds = enforce;
        self
    }

    /// Record a new transaction and apply it to its wallet(s)
    pub fn add_transaction(&self, input: NewTransaction) -> LedgerResult<Transaction> {
        let (category, posting) = self.resolve(&input)?;

        let mut sheet = BalanceSheet::new(self.storage);
        sheet.post(&posting, Direction::Apply)?;
        self.check_funds(&sheet, &posting)?;

        let mut txn = Transaction::new(input.amount, input.date, Some(category.id), input.wallet_id);
        txn.note = clean_note(input.note);
        txn.destination_wallet_id = posting.destination;

        let mut entries = vec![AuditEntry::create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.display_title(Some(&category))),
            &txn,
        )];
        entries.extend(sheet.commit()?);
        self.storage.transactions.upsert(txn.clone())?;
        self.persist(&entries)?;

        info!(
            transaction = %txn.id,
            kind = %category.kind,
            amount = txn.amount.units(),
            "transaction added"
        );
        Ok(txn)
    }

    /// Rewrite a transaction: revert its old effect, then apply the new one
    ///
    /// On error nothing changes, neither the transaction nor any balance.
    pub fn update_transaction(
        &self,
        id: TransactionId,
        input: NewTransaction,
    ) -> LedgerResult<Transaction> {
        let existing = self.get_existing(id)?;
        let (category, posting) = self.resolve(&input)?;

        let mut sheet = BalanceSheet::new(self.storage);
        if let Some(old) = self.posting_of(&existing)? {
            sheet.post(&old, Direction::Revert)?;
        }
        sheet.post(&posting, Direction::Apply)?;
        self.check_funds(&sheet, &posting)?;

        let mut txn = existing.clone();
        txn.amount = input.amount;
        txn.date = input.date;
        txn.note = clean_note(input.note);
        txn.category_id = Some(category.id);
        txn.wallet_id = input.wallet_id;
        txn.destination_wallet_id = posting.destination;
        txn.updated_at = Utc::now();

        let mut entries = vec![AuditEntry::update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.display_title(Some(&category))),
            &existing,
            &txn,
        )];
        entries.extend(sheet.commit()?);
        self.storage.transactions.upsert(txn.clone())?;
        self.persist(&entries)?;

        info!(transaction = %txn.id, kind = %category.kind, "transaction updated");
        Ok(txn)
    }

    /// Remove a transaction and reverse its effect
    ///
    /// Orphaned transactions (no category or a vanished source wallet) are
    /// removed without touching any balance. Fails only if the transaction
    /// does not exist or storage cannot be written.
    pub fn delete_transaction(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let existing = self.get_existing(id)?;

        let mut sheet = BalanceSheet::new(self.storage);
        if let Some(old) = self.posting_of(&existing)? {
            sheet.post(&old, Direction::Revert)?;
        }

        let mut entries = vec![self.delete_entry(&existing)?];
        entries.extend(sheet.commit()?);
        self.storage.transactions.delete(id)?;
        self.persist(&entries)?;

        info!(transaction = %id, "transaction deleted");
        Ok(existing)
    }

    /// Delete every transaction that uses a wallet as source or destination
    ///
    /// Each deleted transaction's effect is reversed on the wallets that
    /// remain, so they stay consistent once the wallet itself is removed.
    /// Returns the number of transactions deleted.
    pub fn purge_wallet(&self, wallet_id: WalletId) -> LedgerResult<usize> {
        let affected = self.storage.transactions.get_by_wallet(wallet_id)?;
        if affected.is_empty() {
            return Ok(0);
        }

        let mut sheet = BalanceSheet::new(self.storage);
        let mut entries = Vec::with_capacity(affected.len());
        for txn in &affected {
            if let Some(old) = self.posting_of(txn)? {
                sheet.post(&old, Direction::Revert)?;
            }
            entries.push(self.delete_entry(txn)?);
        }

        entries.extend(sheet.commit()?);
        for txn in &affected {
            self.storage.transactions.delete(txn.id)?;
        }
        self.persist(&entries)?;

        info!(wallet = %wallet_id, count = affected.len(), "wallet transactions purged");
        Ok(affected.len())
    }

    /// Unlink every transaction from a category that is about to be deleted
    ///
    /// The transactions stay, but as orphans they no longer count toward any
    /// balance, so their effect is reverted first. Returns the number of
    /// transactions detached.
    pub fn detach_category(&self, category_id: CategoryId) -> LedgerResult<usize> {
        let affected = self.storage.transactions.get_by_category(category_id)?;
        if affected.is_empty() {
            return Ok(0);
        }

        let mut sheet = BalanceSheet::new(self.storage);
        let mut entries = Vec::with_capacity(affected.len());
        let mut orphans = Vec::with_capacity(affected.len());
        for txn in &affected {
            if let Some(old) = self.posting_of(txn)? {
                sheet.post(&old, Direction::Revert)?;
            }

            let mut orphan = txn.clone();
            orphan.category_id = None;
            orphan.updated_at = Utc::now();
            entries.push(AuditEntry::update(
                EntityType::Transaction,
                orphan.id.to_string(),
                Some(orphan.display_title(None)),
                txn,
                &orphan,
            ));
            orphans.push(orphan);
        }

        entries.extend(sheet.commit()?);
        for orphan in orphans {
            self.storage.transactions.upsert(orphan)?;
        }
        self.persist(&entries)?;

        info!(category = %category_id, count = affected.len(), "category detached");
        Ok(affected.len())
    }

    /// Recompute every wallet from its history and report the ones that drifted
    pub fn verify_balances(&self) -> LedgerResult<Vec<BalanceDiscrepancy>> {
        let wallets = self.storage.wallets.get_all()?;
        let mut expected: HashMap<WalletId, Money> =
            wallets.iter().map(|w| (w.id, w.initial_balance)).collect();

        for txn in self.storage.transactions.get_all()? {
            if let Some(posting) = self.posting_of(&txn)? {
                for (wallet_id, delta) in balance_deltas(&posting) {
                    if let Some(total) = expected.get_mut(&wallet_id) {
                        *total = total.checked_add(delta).ok_or_else(|| {
                            LedgerError::Storage(format!(
                                "Balance history of wallet {} overflows",
                                wallet_id
                            ))
                        })?;
                    }
                }
            }
        }

        let discrepancies: Vec<_> = wallets
            .into_iter()
            .filter_map(|wallet| {
                let expected = *expected.get(&wallet.id)?;
                let cached = wallet.current_balance();
                (expected != cached).then(|| BalanceDiscrepancy {
                    wallet_id: wallet.id,
                    wallet_name: wallet.name,
                    cached,
                    expected,
                })
            })
            .collect();

        for d in &discrepancies {
            warn!(
                wallet = %d.wallet_id,
                cached = d.cached.units(),
                expected = d.expected.units(),
                "wallet balance drifted from history"
            );
        }

        Ok(discrepancies)
    }

    /// Overwrite drifted cached balances with the recomputed values
    ///
    /// Returns the number of wallets corrected.
    pub fn rebuild_balances(&self) -> LedgerResult<usize> {
        let discrepancies = self.verify_balances()?;

        let mut entries = Vec::with_capacity(discrepancies.len());
        for d in &discrepancies {
            if let Some(before) = self.storage.wallets.get(d.wallet_id)? {
                let mut after = before.clone();
                after.reset_balance(d.expected);
                entries.push(AuditEntry::update(
                    EntityType::Wallet,
                    after.id.to_string(),
                    Some(after.name.clone()),
                    &before,
                    &after,
                ));
                self.storage.wallets.upsert(after)?;
            }
        }

        if !entries.is_empty() {
            self.storage.wallets.save()?;
            self.storage.log_batch(&entries)?;
            info!(count = entries.len(), "wallet balances rebuilt");
        }

        Ok(entries.len())
    }

    fn get_existing(&self, id: TransactionId) -> LedgerResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))
    }

    /// Validate input and turn it into a posting; nothing is mutated
    fn resolve(&self, input: &NewTransaction) -> LedgerResult<(Category, Posting)> {
        if input.amount.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Amount cannot be negative, got {}",
                input.amount
            )));
        }
        if input.amount > Money::MAX_AMOUNT {
            return Err(LedgerError::Validation(format!(
                "Amount {} exceeds the maximum of {}",
                input.amount,
                Money::MAX_AMOUNT
            )));
        }

        let category = self
            .storage
            .categories
            .get(input.category_id)?
            .ok_or_else(|| LedgerError::category_not_found(input.category_id.to_string()))?;

        if self.storage.wallets.get(input.wallet_id)?.is_none() {
            return Err(LedgerError::wallet_not_found(input.wallet_id.to_string()));
        }

        let destination = if category.kind.requires_destination() {
            let dest = input
                .destination_wallet_id
                .ok_or(LedgerError::MissingDestinationWallet)?;
            if dest == input.wallet_id {
                return Err(LedgerError::SameWalletTransfer);
            }
            if self.storage.wallets.get(dest)?.is_none() {
                return Err(LedgerError::wallet_not_found(dest.to_string()));
            }
            Some(dest)
        } else {
            None
        };

        let posting = Posting {
            kind: category.kind,
            amount: input.amount,
            wallet: input.wallet_id,
            destination,
        };
        Ok((category, posting))
    }

    /// The posting a stored transaction currently contributes, if any
    fn posting_of(&self, txn: &Transaction) -> LedgerResult<Option<Posting>> {
        let category = match txn.category_id {
            Some(id) => self.storage.categories.get(id)?,
            None => None,
        };
        let category = match category {
            Some(c) => c,
            None => return Ok(None),
        };

        if self.storage.wallets.get(txn.wallet_id)?.is_none() {
            return Ok(None);
        }

        Ok(Some(Posting {
            kind: category.kind,
            amount: txn.amount,
            wallet: txn.wallet_id,
            destination: if category.kind.requires_destination() {
                txn.destination_wallet_id
            } else {
                None
            },
        }))
    }

    /// Reject expenses and transfers that push their source wallet below zero
    ///
    /// Must run after the posting is on the sheet. An operation that leaves the
    /// source no lower than it started is always allowed.
    fn check_funds(&self, sheet: &BalanceSheet<'_>, posting: &Posting) -> LedgerResult<()> {
        if !self.enforce_sufficient_funds || posting.kind == TransactionKind::Income {
            return Ok(());
        }

        if let Some((after, before)) = sheet.balances(posting.wallet) {
            if after.is_negative() && after < before {
                return Err(LedgerError::InsufficientFunds {
                    wallet: sheet.wallet_name(posting.wallet),
                    needed: posting.amount,
                    available: after + posting.amount,
                });
            }
        }

        Ok(())
    }

    fn delete_entry(&self, txn: &Transaction) -> LedgerResult<AuditEntry> {
        let category = match txn.category_id {
            Some(id) => self.storage.categories.get(id)?,
            None => None,
        };
        Ok(AuditEntry::delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.display_title(category.as_ref())),
            txn,
        ))
    }

    fn persist(&self, entries: &[AuditEntry]) -> LedgerResult<()> {
        self.storage.wallets.save()?;
        self.storage.transactions.save()?;
        self.storage.log_batch(entries)
    }
}
