//! Property-based tests for the ledger engine
//!
//! - Every wallet balance equals its initial balance plus the effects of its
//!   transactions, whatever sequence of operations produced it
//! - Adding then deleting a transaction leaves every balance unchanged
//! - Updating a transaction to its own values changes nothing
//! - Updating A into B matches deleting A and adding B

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use pocket_ledger::config::LedgerPaths;
use pocket_ledger::models::{CategoryId, Money, TransactionKind, WalletId};
use pocket_ledger::services::{
    CategoryService, LedgerService, NewTransaction, WalletService,
};
use pocket_ledger::storage::Storage;
use proptest::prelude::*;
use tempfile::TempDir;

const WALLETS: usize = 3;

struct Fixture {
    _dir: TempDir,
    storage: Storage,
    wallets: Vec<WalletId>,
    categories: HashMap<TransactionKind, CategoryId>,
}

impl Fixture {
    fn new(initial: &[i64]) -> Self {
        let dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let wallets = {
            let service = WalletService::new(&storage);
            initial
                .iter()
                .enumerate()
                .map(|(i, units)| service.create(&format!("W{}", i), Money::new(*units)).unwrap().id)
                .collect()
        };
        let categories = {
            let service = CategoryService::new(&storage);
            let transfer = service.ensure_transfer_category().unwrap();
            [TransactionKind::Income, TransactionKind::Expense]
                .iter()
                .map(|kind| {
                    let c = service.create(kind.as_str(), *kind, None, None).unwrap();
                    (*kind, c.id)
                })
                .chain(std::iter::once((TransactionKind::Transfer, transfer.id)))
                .collect()
        };

        Self {
            _dir: dir,
            storage,
            wallets,
            categories,
        }
    }

    fn ledger(&self, enforce: bool) -> LedgerService<'_> {
        LedgerService::new(&self.storage).enforce_sufficient_funds(enforce)
    }

    fn input(&self, op: &Op) -> NewTransaction {
        let source = self.wallets[op.source];
        let input = NewTransaction::new(
            Money::new(op.amount),
            op.date,
            self.categories[&op.kind],
            source,
        );
        if op.kind == TransactionKind::Transfer {
            input.destination(self.wallets[(op.source + 1 + op.hop) % WALLETS])
        } else {
            input
        }
    }

    fn balances(&self) -> Vec<Money> {
        self.wallets
            .iter()
            .map(|id| self.storage.wallets.get(*id).unwrap().unwrap().current_balance())
            .collect()
    }

    /// Balances recomputed from scratch out of the stored transactions
    fn expected_balances(&self) -> Vec<Money> {
        let kinds: HashMap<CategoryId, TransactionKind> =
            self.categories.iter().map(|(k, id)| (*id, *k)).collect();
        let mut expected: HashMap<WalletId, Money> = self
            .wallets
            .iter()
            .map(|id| (*id, self.storage.wallets.get(*id).unwrap().unwrap().initial_balance))
            .collect();

        for txn in self.storage.transactions.get_all().unwrap() {
            let Some(kind) = txn.category_id.and_then(|id| kinds.get(&id)) else {
                continue;
            };
            match kind {
                TransactionKind::Income => *expected.get_mut(&txn.wallet_id).unwrap() += txn.amount,
                TransactionKind::Expense => *expected.get_mut(&txn.wallet_id).unwrap() -= txn.amount,
                TransactionKind::Transfer => {
                    *expected.get_mut(&txn.wallet_id).unwrap() -= txn.amount;
                    let dest = txn.destination_wallet_id.unwrap();
                    *expected.get_mut(&dest).unwrap() += txn.amount;
                }
            }
        }

        self.wallets.iter().map(|id| expected[id]).collect()
    }
}

#[derive(Debug, Clone)]
struct Op {
    kind: TransactionKind,
    amount: i64,
    source: usize,
    hop: usize,
    date: NaiveDateTime,
}

fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Income),
        Just(TransactionKind::Expense),
        Just(TransactionKind::Transfer),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (kind_strategy(), 0i64..500_000, 0..WALLETS, 0..WALLETS - 1, 1u32..28)
        .prop_map(|(kind, amount, source, hop, day)| Op {
            kind,
            amount,
            source,
            hop,
            date: NaiveDate::from_ymd_opt(2025, 6, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        })
}

fn initial_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..1_000_000, WALLETS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn balances_match_history(
        initial in initial_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..20),
        deletes in prop::collection::vec(any::<prop::sample::Index>(), 0..5),
    ) {
        let fx = Fixture::new(&initial);
        let ledger = fx.ledger(false);

        let mut ids = Vec::new();
        for op in &ops {
            ids.push(ledger.add_transaction(fx.input(op)).unwrap().id);
        }
        for index in deletes {
            if ids.is_empty() {
                break;
            }
            let id = ids.remove(index.index(ids.len()));
            ledger.delete_transaction(id).unwrap();
        }

        prop_assert_eq!(fx.balances(), fx.expected_balances());
        prop_assert!(ledger.verify_balances().unwrap().is_empty());
    }

    #[test]
    fn enforced_funds_never_overdraw(
        initial in initial_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let fx = Fixture::new(&initial);
        let ledger = fx.ledger(true);

        for op in &ops {
            // Rejections are expected; they must leave no trace
            let before = fx.balances();
            if ledger.add_transaction(fx.input(op)).is_err() {
                prop_assert_eq!(fx.balances(), before);
            }
        }

        prop_assert!(fx.balances().iter().all(|b| !b.is_negative()));
        prop_assert_eq!(fx.balances(), fx.expected_balances());
    }

    #[test]
    fn add_then_delete_restores_balances(
        initial in initial_strategy(),
        history in prop::collection::vec(op_strategy(), 0..8),
        op in op_strategy(),
    ) {
        let fx = Fixture::new(&initial);
        let ledger = fx.ledger(false);
        for past in &history {
            ledger.add_transaction(fx.input(past)).unwrap();
        }

        let before = fx.balances();
        let txn = ledger.add_transaction(fx.input(&op)).unwrap();
        ledger.delete_transaction(txn.id).unwrap();

        prop_assert_eq!(fx.balances(), before);
    }

    #[test]
    fn noop_update_changes_nothing(
        initial in initial_strategy(),
        history in prop::collection::vec(op_strategy(), 1..8),
        pick in any::<prop::sample::Index>(),
        enforce in any::<bool>(),
    ) {
        let fx = Fixture::new(&initial);
        let mut ids = Vec::new();
        for past in &history {
            ids.push(fx.ledger(false).add_transaction(fx.input(past)).unwrap().id);
        }

        let id = ids[pick.index(ids.len())];
        let existing = fx.storage.transactions.get(id).unwrap().unwrap();
        let before = fx.balances();

        let same = NewTransaction::from_existing(&existing).unwrap();
        fx.ledger(enforce).update_transaction(id, same).unwrap();

        prop_assert_eq!(fx.balances(), before);
    }

    #[test]
    fn update_matches_delete_and_add(
        initial in initial_strategy(),
        history in prop::collection::vec(op_strategy(), 0..6),
        original in op_strategy(),
        updates in prop::collection::vec(op_strategy(), 1..6),
    ) {
        let updated = Fixture::new(&initial);
        let replaced = Fixture::new(&initial);

        let mut balances = Vec::new();
        for (fx, update) in [(&updated, true), (&replaced, false)] {
            let ledger = fx.ledger(false);
            for past in &history {
                ledger.add_transaction(fx.input(past)).unwrap();
            }
            let txn = ledger.add_transaction(fx.input(&original)).unwrap();
            if update {
                // Each edit replaces the previous one; only the last must count
                for next in &updates {
                    ledger.update_transaction(txn.id, fx.input(next)).unwrap();
                }
            } else {
                ledger.delete_transaction(txn.id).unwrap();
                if let Some(last) = updates.last() {
                    ledger.add_transaction(fx.input(last)).unwrap();
                }
            }
            prop_assert!(ledger.verify_balances().unwrap().is_empty());
            balances.push(fx.balances());
        }

        prop_assert_eq!(&balances[0], &balances[1]);
        prop_assert_eq!(
            updated.storage.transactions.count().unwrap(),
            replaced.storage.transactions.count().unwrap()
        );
    }
}
