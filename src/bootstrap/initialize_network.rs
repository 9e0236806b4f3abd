//! Development network genesis.
//!
//! Funds the relayer, then deploys the forwarder and a greeter that trusts it.
use alloy::primitives::{address, Address};
use log::info;

use crate::{
    config::{Config, ConfigError},
    ledger::{Ledger, LedgerConfig, SharedLedger},
    models::DomainSeparator,
};

/// Account that deploys the genesis contracts.
pub const GENESIS_DEPLOYER: Address = address!("00000000000000000000000000000000000dE910");

#[derive(Clone)]
pub struct DevNetwork {
    pub ledger: SharedLedger,
    pub forwarder: Address,
    pub domain: DomainSeparator,
    pub greeter: Address,
}

pub fn initialize_network(config: &Config, relayer: Address) -> Result<DevNetwork, ConfigError> {
    let mut ledger = Ledger::new(LedgerConfig {
        chain_id: config.network.chain_id,
        gas_price: u128::from(config.network.gas_price),
    });

    ledger.fund(relayer, config.relayer.funding()?);
    let (forwarder, domain) = ledger.deploy_forwarder(
        GENESIS_DEPLOYER,
        &config.forwarder.name,
        &config.forwarder.version,
    );
    let greeter = ledger.deploy_greeter(GENESIS_DEPLOYER, forwarder);

    info!(
        "development network ready: chain id {}, forwarder {}, greeter {}",
        config.network.chain_id, forwarder, greeter
    );

    Ok(DevNetwork {
        ledger: ledger.shared(),
        forwarder,
        domain,
        greeter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForwarderConfig, NetworkConfig, RelayerConfig};
    use alloy::primitives::U256;

    fn config() -> Config {
        Config {
            network: NetworkConfig::default(),
            forwarder: ForwarderConfig::default(),
            relayer: RelayerConfig {
                id: "relayer".to_string(),
                name: "Relayer".to_string(),
                funding_wei: "5000".to_string(),
                gas_overhead: 10_000,
            },
        }
    }

    #[test]
    fn test_genesis_deploys_and_funds() {
        let relayer = Address::repeat_byte(0xee);

        let network = initialize_network(&config(), relayer).unwrap();
        let ledger = network.ledger.lock();

        assert_eq!(ledger.balance(relayer), U256::from(5000));
        assert!(ledger.is_contract(network.forwarder));
        assert!(ledger.is_contract(network.greeter));
        assert_eq!(network.domain.verifying_contract, network.forwarder);
        assert_eq!(network.domain.chain_id, ledger.chain_id());
    }

    #[test]
    fn test_invalid_funding_is_reported() {
        let mut config = config();
        config.relayer.funding_wei = "-1".to_string();

        assert!(initialize_network(&config, Address::ZERO).is_err());
    }
}
