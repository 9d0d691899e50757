//! Wallet service
//!
//! Provides business logic for wallet management: creation, lookup, styling
//! and deletion. Balances are never written here; see `LedgerService`.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Wallet, WalletId};
use crate::storage::Storage;

use super::find_by_short_id;
use super::ledger::LedgerService;

/// Service for wallet management
pub struct WalletService<'a> {
    storage: &'a Storage,
}

/// Result of deleting a wallet
#[derive(Debug, Clone)]
pub struct WalletDeletion {
    pub wallet: Wallet,
    /// Transactions removed along with the wallet
    pub transactions_removed: usize,
}

impl<'a> WalletService<'a> {
    /// Create a new wallet service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new wallet
    pub fn create(&self, name: &str, initial_balance: Money) -> LedgerResult<Wallet> {
        self.create_styled(name, initial_balance, None, None)
    }

    /// Create a new wallet with an optional icon and color
    pub fn create_styled(
        &self,
        name: &str,
        initial_balance: Money,
        icon_symbol: Option<&str>,
        color_hex: Option<&str>,
    ) -> LedgerResult<Wallet> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Wallet name cannot be empty".into()));
        }

        if self.storage.wallets.name_exists(name, None)? {
            return Err(LedgerError::Duplicate {
                entity_type: "Wallet",
                identifier: name.to_string(),
            });
        }

        let mut wallet = Wallet::new(name, initial_balance);
        if let Some(icon) = icon_symbol {
            wallet.icon_symbol = icon.to_string();
        }
        if let Some(color) = color_hex {
            wallet.color_hex = color.to_string();
        }

        wallet
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.wallets.upsert(wallet.clone())?;
        self.storage.wallets.save()?;

        self.storage.log_create(
            EntityType::Wallet,
            wallet.id.to_string(),
            Some(wallet.name.clone()),
            &wallet,
        )?;

        info!(wallet = %wallet.id, "wallet created");
        Ok(wallet)
    }

    /// Get a wallet by ID
    pub fn get(&self, id: WalletId) -> LedgerResult<Option<Wallet>> {
        self.storage.wallets.get(id)
    }

    /// Find a wallet by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Wallet>> {
        if let Some(wallet) = self.storage.wallets.get_by_name(identifier)? {
            return Ok(Some(wallet));
        }

        if let Ok(id) = identifier.parse::<WalletId>() {
            return self.storage.wallets.get(id);
        }

        let wallets = self.storage.wallets.get_all()?;
        find_by_short_id(wallets, identifier, |w| w.id, "wallets")
    }

    /// Find a wallet or fail with `NotFound`
    pub fn require(&self, identifier: &str) -> LedgerResult<Wallet> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::wallet_not_found(identifier))
    }

    /// All wallets, sorted by name
    pub fn list(&self) -> LedgerResult<Vec<Wallet>> {
        self.storage.wallets.get_all()
    }

    /// Rename and/or restyle a wallet
    pub fn update(
        &self,
        id: WalletId,
        name: Option<&str>,
        icon_symbol: Option<&str>,
        color_hex: Option<&str>,
    ) -> LedgerResult<Wallet> {
        let mut wallet = self
            .storage
            .wallets
            .get(id)?
            .ok_or_else(|| LedgerError::wallet_not_found(id.to_string()))?;

        let before = wallet.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(LedgerError::Validation("Wallet name cannot be empty".into()));
            }

            if self.storage.wallets.name_exists(new_name, Some(id))? {
                return Err(LedgerError::Duplicate {
                    entity_type: "Wallet",
                    identifier: new_name.to_string(),
                });
            }

            wallet.rename(new_name);
        }

        if let Some(icon) = icon_symbol {
            wallet.icon_symbol = icon.to_string();
        }
        if let Some(color) = color_hex {
            wallet.color_hex = color.to_string();
        }
        wallet.updated_at = chrono::Utc::now();

        wallet
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.wallets.upsert(wallet.clone())?;
        self.storage.wallets.save()?;

        self.storage.log_update(
            EntityType::Wallet,
            wallet.id.to_string(),
            Some(wallet.name.clone()),
            &before,
            &wallet,
        )?;

        Ok(wallet)
    }

    /// Delete a wallet and every transaction that references it
    pub fn delete(&self, id: WalletId) -> LedgerResult<WalletDeletion> {
        if self.storage.wallets.get(id)?.is_none() {
            return Err(LedgerError::wallet_not_found(id.to_string()));
        }

        let transactions_removed = LedgerService::new(self.storage).purge_wallet(id)?;

        // Re-read: purging may have moved this wallet's balance back
        let wallet = self
            .storage
            .wallets
            .get(id)?
            .ok_or_else(|| LedgerError::wallet_not_found(id.to_string()))?;

        self.storage.wallets.delete(id)?;
        self.storage.wallets.save()?;

        self.storage.log_delete(
            EntityType::Wallet,
            wallet.id.to_string(),
            Some(wallet.name.clone()),
            &wallet,
        )?;

        info!(wallet = %id, transactions_removed, "wallet deleted");
        Ok(WalletDeletion {
            wallet,
            transactions_removed,
        })
    }

    /// Sum of every wallet's current balance
    pub fn total_balance(&self) -> LedgerResult<Money> {
        Ok(self
            .storage
            .wallets
            .get_all()?
            .iter()
            .map(Wallet::current_balance)
            .sum())
    }
}
