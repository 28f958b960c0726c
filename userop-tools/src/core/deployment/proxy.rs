// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Payloads for initializable proxies.
//!
//! The proxy is an ERC-1967 style contract with `constructor(address implementation, bytes data)`:
//! it records the implementation and delegate-calls `data` into it, which is how the
//! implementation's initializer runs in the proxy's storage context.

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    json_abi::{Constructor, Function, JsonAbi},
    primitives::{Address, Bytes},
};

use super::{coerce_args, encode_deploy_data, DeployPayload, EncodingError};

/// Finds the overload of `name` taking `args` inputs.
pub fn find_function<'a>(
    abi: &'a JsonAbi,
    name: &str,
    args: usize,
) -> Result<&'a Function, EncodingError> {
    abi.function(name)
        .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == args))
        .ok_or_else(|| EncodingError::MissingFunction {
            name: name.to_owned(),
            args,
        })
}

/// ABI-encodes a call, selector included.
pub fn encode_function_call(function: &Function, args: &[String]) -> Result<Bytes, EncodingError> {
    let values = coerce_args(&function.inputs, args)?;
    Ok(function.abi_encode_input(&values)?.into())
}

/// Builds a salted payload deploying a proxy that initializes itself against `implementation`.
pub fn build_proxy_deploy_payload(
    proxy_bytecode: &[u8],
    proxy_constructor: Option<&Constructor>,
    implementation: Address,
    initializer: &Function,
    initializer_args: &[String],
) -> Result<DeployPayload, EncodingError> {
    let constructor = proxy_constructor.ok_or(EncodingError::MissingConstructor)?;
    let init_data = encode_function_call(initializer, initializer_args)?;
    let values = [
        DynSolValue::Address(implementation),
        DynSolValue::Bytes(init_data.to_vec()),
    ];
    let init_code = encode_deploy_data(proxy_bytecode, Some(constructor), &values)?;
    Ok(DeployPayload::with_random_salt(init_code))
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{address, bytes},
        sol,
        sol_types::{SolCall, SolValue},
    };

    use super::*;

    sol! {
        function initialize(address owner, address paymentMethod);
    }

    const PROXY_BYTECODE: Bytes = bytes!("60806040526040516103");

    fn implementation_abi() -> JsonAbi {
        JsonAbi::parse([
            "function initialize(address owner, address paymentMethod)",
            "function initialize(address owner)",
            "function owner() view returns (address)",
        ])
        .unwrap()
    }

    #[test]
    fn picks_overload_by_arity() {
        let abi = implementation_abi();
        assert_eq!(find_function(&abi, "initialize", 2).unwrap().inputs.len(), 2);
        assert_eq!(find_function(&abi, "initialize", 1).unwrap().inputs.len(), 1);
        assert!(matches!(
            find_function(&abi, "initialize", 3),
            Err(EncodingError::MissingFunction { args: 3, .. })
        ));
        assert!(find_function(&abi, "upgrade", 0).is_err());
    }

    #[test]
    fn embeds_initializer_call() {
        let abi = implementation_abi();
        let initializer = find_function(&abi, "initialize", 2).unwrap();
        let constructor =
            Constructor::parse("constructor(address implementation, bytes data) payable").unwrap();
        let implementation = address!("00000000000000000000000000000000000000aa");
        let owner = address!("00000000000000000000000000000000000000bb");
        let payment = address!("00000000000000000000000000000000000000cc");

        let payload = build_proxy_deploy_payload(
            &PROXY_BYTECODE,
            Some(&constructor),
            implementation,
            initializer,
            &[owner.to_string(), payment.to_string()],
        )
        .unwrap();

        let init_data = initializeCall {
            owner,
            paymentMethod: payment,
        }
        .abi_encode();
        let ctor_args = (implementation, Bytes::from(init_data)).abi_encode_params();
        assert_eq!(
            payload.init_code().to_vec(),
            [&PROXY_BYTECODE[..], &ctor_args[..]].concat()
        );
    }

    #[test]
    fn proxy_without_constructor() {
        let abi = implementation_abi();
        let initializer = find_function(&abi, "initialize", 1).unwrap();
        let err = build_proxy_deploy_payload(
            &PROXY_BYTECODE,
            None,
            Address::ZERO,
            initializer,
            &[Address::ZERO.to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, EncodingError::MissingConstructor));
    }
}
