//! Contract execution frames.
//!
//! Each call runs in its own frame with a gas meter, a state checkpoint and a
//! log watermark. A reverting frame restores all three, so a failing callee
//! never leaks partial effects into its caller.
use alloy::{
    primitives::{Address, Bytes, Log, LogData, U256},
    sol_types::{Revert, SolError},
};

use super::{
    gas::{GasMeter, OutOfGas},
    state::WorldState,
};
use crate::{
    constants::{LOG_BASE_GAS, LOG_DATA_BYTE_GAS, LOG_TOPIC_GAS},
    models::{decode_revert_message, ForwarderError},
};

/// Code deployed on the ledger.
pub trait Contract: Send + Sync {
    fn name(&self) -> &'static str;

    /// Handles one invocation. Returning `Err` reverts the frame.
    fn call(&mut self, env: &mut CallEnv<'_>, input: &[u8]) -> Result<Bytes, ContractRevert>;

    fn box_clone(&self) -> Box<dyn Contract>;
}

/// Revert raised by a contract frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRevert {
    pub reason: Option<String>,
    pub output: Bytes,
}

impl ContractRevert {
    /// Reverts with an `Error(string)` payload.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let output = Revert::from(reason.clone()).abi_encode().into();
        Self {
            reason: Some(reason),
            output,
        }
    }

    pub fn with_output(output: Bytes) -> Self {
        Self {
            reason: decode_revert_message(&output),
            output,
        }
    }
}

impl From<OutOfGas> for ContractRevert {
    fn from(_: OutOfGas) -> Self {
        ContractRevert::with_reason("out of gas")
    }
}

impl From<ForwarderError> for ContractRevert {
    fn from(error: ForwarderError) -> Self {
        ContractRevert::with_output(error.revert_data())
    }
}

/// Parameters of one call frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub caller: Address,
    pub target: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub block_number: u64,
}

/// Result of a finished frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutcome {
    pub result: Result<Bytes, ContractRevert>,
    pub gas_used: u64,
}

impl FrameOutcome {
    pub fn success(&self) -> bool {
        self.result.is_ok()
    }

    /// Return data on success, revert payload on failure.
    pub fn output(&self) -> Bytes {
        match &self.result {
            Ok(output) => output.clone(),
            Err(revert) => revert.output.clone(),
        }
    }
}

/// Runs `input` against `frame.target`, rolling back state and logs if the
/// frame reverts. Calls to accounts without code succeed with empty output.
pub(super) fn run_frame(
    state: &mut WorldState,
    logs: &mut Vec<Log>,
    frame: Frame,
    input: &[u8],
) -> FrameOutcome {
    let checkpoint = state.clone();
    let log_mark = logs.len();
    let mut gas = GasMeter::new(frame.gas_limit);

    let result = match state.transfer(frame.caller, frame.target, frame.value) {
        Err(revert) => Err(revert),
        Ok(()) => match state.take_contract(frame.target) {
            None => Ok(Bytes::new()),
            Some(mut contract) => {
                let result = {
                    let mut env = CallEnv {
                        state: &mut *state,
                        logs: &mut *logs,
                        gas: &mut gas,
                        caller: frame.caller,
                        address: frame.target,
                        block_number: frame.block_number,
                    };
                    contract.call(&mut env, input)
                };
                state.put_contract(frame.target, contract);
                result
            }
        },
    };

    if result.is_err() {
        *state = checkpoint;
        logs.truncate(log_mark);
    }

    FrameOutcome {
        result,
        gas_used: gas.used(),
    }
}

/// Execution environment handed to a contract for one frame.
pub struct CallEnv<'a> {
    state: &'a mut WorldState,
    logs: &'a mut Vec<Log>,
    gas: &'a mut GasMeter,
    caller: Address,
    address: Address,
    block_number: u64,
}

impl CallEnv<'_> {
    /// Literal caller of this frame.
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Address of the executing contract.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn charge(&mut self, amount: u64) -> Result<(), OutOfGas> {
        self.gas.charge(amount)
    }

    /// Emits a log from the executing contract.
    pub fn emit(&mut self, data: LogData) -> Result<(), OutOfGas> {
        let cost = LOG_BASE_GAS
            + LOG_TOPIC_GAS * data.topics().len() as u64
            + LOG_DATA_BYTE_GAS * data.data.len() as u64;
        self.gas.charge(cost)?;
        self.logs.push(Log {
            address: self.address,
            data,
        });
        Ok(())
    }

    /// Calls `target` in a child frame bounded by `gas_limit` (capped at the
    /// gas this frame still has). The child's consumption is charged here
    /// whatever its outcome.
    pub fn call(
        &mut self,
        target: Address,
        value: U256,
        input: &[u8],
        gas_limit: u64,
    ) -> FrameOutcome {
        let frame = Frame {
            caller: self.address,
            target,
            value,
            gas_limit: gas_limit.min(self.gas.remaining()),
            block_number: self.block_number,
        };
        let outcome = run_frame(self.state, self.logs, frame, input);
        self.gas.absorb(outcome.gas_used);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;

    /// Records the caller, optionally reverting afterwards.
    #[derive(Clone)]
    struct Tally {
        calls: u64,
    }

    impl Contract for Tally {
        fn name(&self) -> &'static str {
            "Tally"
        }

        fn call(&mut self, env: &mut CallEnv<'_>, input: &[u8]) -> Result<Bytes, ContractRevert> {
            self.calls += 1;
            env.charge(1_000)?;
            env.emit(LogData::new_unchecked(vec![B256::repeat_byte(1)], Bytes::new()))?;
            if input == b"revert" {
                return Err(ContractRevert::with_reason("tally reverted"));
            }
            if input == b"burn" {
                env.charge(u64::MAX)?;
            }
            Ok(Bytes::from(self.calls.to_be_bytes().to_vec()))
        }

        fn box_clone(&self) -> Box<dyn Contract> {
            Box::new(self.clone())
        }
    }

    fn frame(target: Address, value: U256) -> Frame {
        Frame {
            caller: Address::repeat_byte(0xaa),
            target,
            value,
            gas_limit: 100_000,
            block_number: 1,
        }
    }

    fn setup() -> (WorldState, Address) {
        let target = Address::repeat_byte(0xcc);
        let mut state = WorldState::new();
        state.deploy(target, Box::new(Tally { calls: 0 }));
        state.credit(Address::repeat_byte(0xaa), U256::from(100));
        (state, target)
    }

    #[test]
    fn test_successful_frame_keeps_effects() {
        let (mut state, target) = setup();
        let mut logs = Vec::new();

        let outcome = run_frame(&mut state, &mut logs, frame(target, U256::from(5)), b"hi");

        assert!(outcome.success());
        assert_eq!(outcome.output(), Bytes::from(1u64.to_be_bytes().to_vec()));
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].address, target);
        assert_eq!(state.balance(target), U256::from(5));
        assert!(state.is_contract(target));
    }

    #[test]
    fn test_reverting_frame_rolls_back_everything() {
        let (mut state, target) = setup();
        let mut logs = Vec::new();

        let outcome = run_frame(&mut state, &mut logs, frame(target, U256::from(5)), b"revert");

        assert!(!outcome.success());
        assert_eq!(
            outcome.result.unwrap_err().reason.as_deref(),
            Some("tally reverted")
        );
        assert!(logs.is_empty());
        assert_eq!(state.balance(target), U256::ZERO);
        assert_eq!(state.balance(Address::repeat_byte(0xaa)), U256::from(100));

        // Contract-local state is rolled back too.
        let again = run_frame(&mut state, &mut logs, frame(target, U256::ZERO), b"hi");
        assert_eq!(again.output(), Bytes::from(1u64.to_be_bytes().to_vec()));
    }

    #[test]
    fn test_out_of_gas_consumes_whole_limit() {
        let (mut state, target) = setup();
        let mut logs = Vec::new();

        let outcome = run_frame(&mut state, &mut logs, frame(target, U256::ZERO), b"burn");

        assert!(!outcome.success());
        assert_eq!(outcome.gas_used, 100_000);
    }

    #[test]
    fn test_call_to_account_without_code_succeeds() {
        let (mut state, _) = setup();
        let mut logs = Vec::new();
        let eoa = Address::repeat_byte(0xee);

        let outcome = run_frame(&mut state, &mut logs, frame(eoa, U256::from(7)), b"anything");

        assert!(outcome.success());
        assert!(outcome.output().is_empty());
        assert_eq!(state.balance(eoa), U256::from(7));
    }

    #[test]
    fn test_value_above_balance_reverts() {
        let (mut state, target) = setup();
        let mut logs = Vec::new();

        let outcome = run_frame(&mut state, &mut logs, frame(target, U256::from(1_000)), b"hi");

        assert!(!outcome.success());
        assert_eq!(outcome.gas_used, 0);
    }
}
