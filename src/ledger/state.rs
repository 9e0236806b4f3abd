//! Account balances, envelope nonces and deployed contracts.
use std::{collections::HashMap, fmt};

use alloy::primitives::{Address, U256};

use super::contract::{Contract, ContractRevert};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Account {
    pub balance: U256,
    /// Number of envelopes this account has had included.
    pub nonce: u64,
}

/// Mutable world state of the ledger.
///
/// Cloning yields an independent snapshot, which is how frames roll back.
#[derive(Default)]
pub struct WorldState {
    accounts: HashMap<Address, Account>,
    contracts: HashMap<Address, Box<dyn Contract>>,
}

impl Clone for WorldState {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            contracts: self
                .contracts
                .iter()
                .map(|(address, contract)| (*address, contract.box_clone()))
                .collect(),
        }
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldState")
            .field("accounts", &self.accounts)
            .field(
                "contracts",
                &self
                    .contracts
                    .iter()
                    .map(|(address, contract)| (*address, contract.name()))
                    .collect::<HashMap<_, _>>(),
            )
            .finish()
    }
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, address: Address) -> Account {
        self.accounts.get(&address).copied().unwrap_or_default()
    }

    pub fn balance(&self, address: Address) -> U256 {
        self.account(address).balance
    }

    pub fn nonce(&self, address: Address) -> u64 {
        self.account(address).nonce
    }

    pub fn credit(&mut self, address: Address, amount: U256) {
        let account = self.accounts.entry(address).or_default();
        account.balance = account.balance.saturating_add(amount);
    }

    /// Debits up to `amount`, never driving the balance below zero.
    pub fn debit_saturating(&mut self, address: Address, amount: U256) {
        let account = self.accounts.entry(address).or_default();
        account.balance = account.balance.saturating_sub(amount);
    }

    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), ContractRevert> {
        if value.is_zero() {
            return Ok(());
        }
        let balance = self.balance(from);
        if balance < value {
            return Err(ContractRevert::with_reason(format!(
                "insufficient balance for transfer: {} < {}",
                balance, value
            )));
        }
        self.debit_saturating(from, value);
        self.credit(to, value);
        Ok(())
    }

    pub fn increment_nonce(&mut self, address: Address) {
        self.accounts.entry(address).or_default().nonce += 1;
    }

    pub fn deploy(&mut self, address: Address, contract: Box<dyn Contract>) {
        self.contracts.insert(address, contract);
    }

    pub fn is_contract(&self, address: Address) -> bool {
        self.contracts.contains_key(&address)
    }

    pub fn contract_name(&self, address: Address) -> Option<&'static str> {
        self.contracts.get(&address).map(|contract| contract.name())
    }

    /// Removes a contract for the duration of its own frame.
    pub(super) fn take_contract(&mut self, address: Address) -> Option<Box<dyn Contract>> {
        self.contracts.remove(&address)
    }

    pub(super) fn put_contract(&mut self, address: Address, contract: Box<dyn Contract>) {
        self.contracts.insert(address, contract);
    }
}
