//! # Forward Request Signing Tool
//!
//! Signs a forward request off-line and prints the `POST /api/v1/relay` body.
//!
//! ## Usage
//!
//! ```bash
//! # Greeting through the forwarder deployed at genesis
//! cargo run --example sign_forward_request -- \
//!   --private-key "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d" \
//!   --forwarder "0x5FbDB2315678afecb367f032d93F642f64180aa3" \
//!   --to "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512" \
//!   --greeting "hello"
//!
//! # Arbitrary payload with an explicit nonce
//! cargo run --example sign_forward_request -- \
//!   --private-key "..." --forwarder "..." --to "..." \
//!   --data "0x0c49c36c" --nonce 3
//! ```
//!
//! The forwarder address and chain id are served by `GET /api/v1/domain`,
//! the sender's nonce by `GET /api/v1/nonces/{address}`.
use alloy::primitives::{Address, U256};
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::str::FromStr;

use metatx_relayer::{
    constants::{
        DEFAULT_CHAIN_ID, DEFAULT_FORWARDER_NAME, DEFAULT_FORWARDER_VERSION, DEFAULT_FORWARD_GAS,
    },
    domain::ForwardRequestBuilder,
    models::{DomainSeparator, ForwardRequestPayload, IGreeter, RelayRequest},
    services::{LocalSigner, TypedDataSigner},
    utils::decode_hex_field,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sender private key (32 bytes as hex, with or without 0x prefix).
    #[arg(long)]
    private_key: String,

    /// Forwarder contract address.
    #[arg(long)]
    forwarder: String,

    /// Target contract address.
    #[arg(long)]
    to: String,

    /// Sends `setGreeting(greeting)` to the target. Takes precedence over `--data`.
    #[arg(long)]
    greeting: Option<String>,

    /// Raw call payload as hex.
    #[arg(long, default_value = "0x")]
    data: String,

    #[arg(long, default_value_t = 0)]
    nonce: u64,

    #[arg(long, default_value_t = DEFAULT_FORWARD_GAS)]
    gas: u64,

    /// Value in wei.
    #[arg(long, default_value = "0")]
    value: String,

    #[arg(long, default_value_t = DEFAULT_CHAIN_ID)]
    chain_id: u64,

    #[arg(long, default_value = DEFAULT_FORWARDER_NAME)]
    name: String,

    #[arg(long, default_value = DEFAULT_FORWARDER_VERSION)]
    version: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let body = build_relay_request(&args).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn build_relay_request(args: &Args) -> Result<RelayRequest> {
    let signer = LocalSigner::from_private_key_hex(&args.private_key)
        .wrap_err("Invalid private key")?;
    let forwarder = Address::from_str(&args.forwarder).wrap_err("Invalid forwarder address")?;
    let to = Address::from_str(&args.to).wrap_err("Invalid target address")?;
    let value = U256::from_str(&args.value).wrap_err("Invalid value")?;

    let builder = ForwardRequestBuilder::new(signer.address_sync(), to)
        .value(value)
        .gas(args.gas);
    let builder = match &args.greeting {
        Some(greeting) => builder.call(IGreeter::setGreetingCall {
            greeting: greeting.clone(),
        }),
        None => builder.data(decode_hex_field(&args.data, "data").map_err(|e| eyre!(e))?),
    };
    let request = builder.build(U256::from(args.nonce));

    let domain = DomainSeparator::new(&args.name, &args.version, args.chain_id, forwarder);
    let signature = signer.sign_forward_request(&request, &domain).await?;

    Ok(RelayRequest {
        request: ForwardRequestPayload::from(&request),
        signature: signature.to_string(),
    })
}
