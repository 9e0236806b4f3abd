//! # Execution ledger
//!
//! In-process, append-only ledger the relayer submits to. It plays the part
//! of a single-node development network:
//!
//! * accounts with balances and envelope nonces,
//! * contracts deployed at `CREATE`-style addresses,
//! * a mempool with admission checks (signature, chain id, nonce, gas, funds),
//! * blocks that include pending envelopes in arrival order,
//! * receipts with status, gas used, output, revert reason and logs.
//!
//! Fees are `gas_used * gas_price`, debited from the envelope signer whether
//! or not the envelope reverted. All mutation goes through a single
//! [`SharedLedger`] mutex, so inclusions are totally ordered.
use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use alloy::primitives::{Address, Bytes, B256, U256};
use log::{debug, info};
use parking_lot::Mutex;

use crate::{
    constants::{DEFAULT_CHAIN_ID, DEFAULT_GAS_PRICE, TX_INTRINSIC_GAS, VIEW_CALL_GAS_LIMIT},
    models::{
        Block, DomainSeparator, LedgerError, SignedTransaction, TransactionReceipt,
        TransactionStatus,
    },
    utils::recover_address,
};

pub mod contract;
pub mod forwarder;
pub mod gas;
pub mod greeter;
pub mod nonce_registry;
pub mod state;

pub use contract::{CallEnv, Contract, ContractRevert};
pub use forwarder::{DispatchStage, Forwarder};
pub use gas::{GasMeter, OutOfGas};
pub use greeter::Greeter;
pub use nonce_registry::NonceRegistry;
pub use state::{Account, WorldState};

use contract::{run_frame, Frame};

pub type SharedLedger = Arc<Mutex<Ledger>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub chain_id: u64,
    pub gas_price: u128,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            gas_price: DEFAULT_GAS_PRICE,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingTransaction {
    hash: B256,
    sender: Address,
    transaction: SignedTransaction,
}

impl PendingTransaction {
    fn max_cost(&self, gas_price: u128) -> U256 {
        U256::from(self.transaction.envelope.gas_limit) * U256::from(gas_price)
            + self.transaction.envelope.value
    }
}

#[derive(Debug)]
pub struct Ledger {
    config: LedgerConfig,
    state: WorldState,
    mempool: VecDeque<PendingTransaction>,
    blocks: Vec<Block>,
    receipts: HashMap<B256, TransactionReceipt>,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        let genesis = Block {
            number: 0,
            timestamp: chrono::Utc::now().timestamp(),
            transactions: Vec::new(),
        };
        Self {
            config,
            state: WorldState::new(),
            mempool: VecDeque::new(),
            blocks: vec![genesis],
            receipts: HashMap::new(),
        }
    }

    pub fn shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    pub fn gas_price(&self) -> u128 {
        self.config.gas_price
    }

    /// Number of the latest block.
    pub fn block_number(&self) -> u64 {
        self.blocks.last().map(|block| block.number).unwrap_or_default()
    }

    pub fn block(&self, number: u64) -> Option<&Block> {
        self.blocks.get(number as usize)
    }

    pub fn balance(&self, address: Address) -> U256 {
        self.state.balance(address)
    }

    /// Envelope nonce after all included envelopes.
    pub fn nonce(&self, address: Address) -> u64 {
        self.state.nonce(address)
    }

    /// Envelope nonce the next submission from `address` must carry.
    pub fn pending_nonce(&self, address: Address) -> u64 {
        let pending = self
            .mempool
            .iter()
            .filter(|pending| pending.sender == address)
            .count() as u64;
        self.state.nonce(address) + pending
    }

    pub fn pending_count(&self) -> usize {
        self.mempool.len()
    }

    pub fn is_contract(&self, address: Address) -> bool {
        self.state.is_contract(address)
    }

    /// Credits `amount` to `address` outside of any envelope.
    pub fn fund(&mut self, address: Address, amount: U256) {
        self.state.credit(address, amount);
    }

    /// Deploys `contract` at the `CREATE` address of `deployer`'s current
    /// nonce, consuming that nonce.
    pub fn deploy(&mut self, deployer: Address, contract: Box<dyn Contract>) -> Address {
        let address = deployer.create(self.state.nonce(deployer));
        info!("deployed {} at {}", contract.name(), address);
        self.state.deploy(address, contract);
        self.state.increment_nonce(deployer);
        address
    }

    /// Deploys a forwarder whose domain binds this ledger's chain id and its
    /// own address.
    pub fn deploy_forwarder(
        &mut self,
        deployer: Address,
        name: &str,
        version: &str,
    ) -> (Address, DomainSeparator) {
        let address = deployer.create(self.state.nonce(deployer));
        let domain = DomainSeparator::new(name, version, self.config.chain_id, address);
        let deployed = self.deploy(deployer, Box::new(Forwarder::new(domain.clone())));
        debug_assert_eq!(deployed, address);
        (address, domain)
    }

    pub fn deploy_greeter(&mut self, deployer: Address, trusted_forwarder: Address) -> Address {
        self.deploy(deployer, Box::new(Greeter::new(trusted_forwarder)))
    }

    /// Admits a signed envelope into the mempool.
    pub fn submit(&mut self, transaction: SignedTransaction) -> Result<B256, LedgerError> {
        let envelope = &transaction.envelope;
        if envelope.chain_id != self.config.chain_id {
            return Err(LedgerError::ChainIdMismatch {
                expected: self.config.chain_id,
                got: envelope.chain_id,
            });
        }

        let sender = recover_address(&envelope.signing_hash(), &transaction.signature)
            .map_err(|_| LedgerError::InvalidSignature)?;

        let hash = transaction.hash();
        if self.receipts.contains_key(&hash) || self.mempool.iter().any(|p| p.hash == hash) {
            return Err(LedgerError::AlreadyKnown(hash));
        }

        let expected = self.pending_nonce(sender);
        if envelope.nonce < expected {
            return Err(LedgerError::NonceTooLow {
                sender,
                expected,
                got: envelope.nonce,
            });
        }
        if envelope.nonce > expected {
            return Err(LedgerError::NonceTooHigh {
                sender,
                expected,
                got: envelope.nonce,
            });
        }

        let intrinsic = TX_INTRINSIC_GAS + envelope.calldata_gas();
        if envelope.gas_limit < intrinsic {
            return Err(LedgerError::IntrinsicGasTooLow {
                required: intrinsic,
                limit: envelope.gas_limit,
            });
        }

        let pending = PendingTransaction {
            hash,
            sender,
            transaction,
        };
        let reserved: U256 = self
            .mempool
            .iter()
            .filter(|p| p.sender == sender)
            .map(|p| p.max_cost(self.config.gas_price))
            .fold(U256::ZERO, |acc, cost| acc.saturating_add(cost));
        let cost = pending.max_cost(self.config.gas_price);
        let balance = self.state.balance(sender);
        if balance < reserved.saturating_add(cost) {
            return Err(LedgerError::InsufficientFunds {
                sender,
                balance,
                cost,
            });
        }

        debug!("admitted {} from {} with nonce {}", hash, sender, expected);
        self.mempool.push_back(pending);
        Ok(hash)
    }

    /// Includes every pending envelope, in arrival order, into a new block.
    pub fn mine_block(&mut self) -> Block {
        let number = self.block_number() + 1;
        let mut transactions = Vec::with_capacity(self.mempool.len());

        while let Some(pending) = self.mempool.pop_front() {
            let receipt = self.apply(pending, number);
            transactions.push(receipt.tx_hash);
            self.receipts.insert(receipt.tx_hash, receipt);
        }

        let block = Block {
            number,
            timestamp: chrono::Utc::now().timestamp(),
            transactions,
        };
        if !block.transactions.is_empty() {
            info!(
                "mined block {} with {} transaction(s)",
                number,
                block.transactions.len()
            );
        }
        self.blocks.push(block.clone());
        block
    }

    fn apply(&mut self, pending: PendingTransaction, block_number: u64) -> TransactionReceipt {
        let envelope = &pending.transaction.envelope;
        let intrinsic = TX_INTRINSIC_GAS + envelope.calldata_gas();
        let frame = Frame {
            caller: pending.sender,
            target: envelope.to,
            value: envelope.value,
            gas_limit: envelope.gas_limit - intrinsic,
            block_number,
        };

        let mut logs = Vec::new();
        let outcome = run_frame(&mut self.state, &mut logs, frame, &envelope.data);
        let gas_used = intrinsic + outcome.gas_used;

        self.state.increment_nonce(pending.sender);
        let fee = U256::from(gas_used) * U256::from(self.config.gas_price);
        self.state.debit_saturating(pending.sender, fee);

        let success = outcome.success();
        let output = outcome.output();
        let revert_reason = outcome.result.err().and_then(|revert| revert.reason);
        debug!(
            "applied {} in block {}: success = {}, gas used = {}",
            pending.hash, block_number, success, gas_used
        );

        TransactionReceipt {
            tx_hash: pending.hash,
            block_number,
            from: pending.sender,
            to: envelope.to,
            success,
            gas_used,
            effective_gas_price: self.config.gas_price,
            output,
            revert_reason,
            logs,
        }
    }

    pub fn receipt(&self, hash: &B256) -> Option<&TransactionReceipt> {
        self.receipts.get(hash)
    }

    pub fn transaction_status(&self, hash: &B256) -> Result<TransactionStatus, LedgerError> {
        if let Some(receipt) = self.receipts.get(hash) {
            return Ok(if receipt.success {
                TransactionStatus::Confirmed
            } else {
                TransactionStatus::Reverted
            });
        }
        if self.mempool.iter().any(|pending| &pending.hash == hash) {
            return Ok(TransactionStatus::Pending);
        }
        Err(LedgerError::UnknownTransaction(*hash))
    }

    /// Executes `data` against a snapshot of the latest state and discards
    /// every effect.
    pub fn call(&self, from: Address, to: Address, data: &[u8]) -> Result<Bytes, LedgerError> {
        if !self.state.is_contract(to) {
            return Err(LedgerError::UnknownContract(to));
        }
        let mut scratch = self.state.clone();
        let mut logs = Vec::new();
        let frame = Frame {
            caller: from,
            target: to,
            value: U256::ZERO,
            gas_limit: VIEW_CALL_GAS_LIMIT,
            block_number: self.block_number(),
        };
        run_frame(&mut scratch, &mut logs, frame, data)
            .result
            .map_err(|revert| LedgerError::CallReverted {
                reason: revert.reason,
                output: revert.output,
            })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
