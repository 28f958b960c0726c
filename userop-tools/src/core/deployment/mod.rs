// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Deterministic deployment payloads.
//!
//! A payload is sent to a deterministic deployment factory as `salt ‖ init_code`: the first 32
//! bytes are the salt and the remainder is the creation code, constructor arguments included.
//! Every payload carries a freshly generated random salt so redeploying the same code through the
//! same factory never collides with an earlier deployment.

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::{Constructor, Param},
    primitives::{Address, Bytes, B256},
};

use crate::{core::service::Call, utils::concat};

pub mod factory;
pub mod proxy;

pub use factory::CREATE2_FACTORY_ADDRESS;
pub use proxy::build_proxy_deploy_payload;

/// Salt and init code for a deterministic deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployPayload {
    salt: B256,
    init_code: Bytes,
}

impl DeployPayload {
    pub fn new(salt: B256, init_code: Bytes) -> Self {
        Self { salt, init_code }
    }

    /// Pairs init code with a fresh random salt.
    pub fn with_random_salt(init_code: Bytes) -> Self {
        Self::new(B256::random(), init_code)
    }

    pub fn salt(&self) -> B256 {
        self.salt
    }

    pub fn init_code(&self) -> &Bytes {
        &self.init_code
    }

    /// Factory calldata: `salt ‖ init_code`.
    pub fn calldata(&self) -> Bytes {
        concat(&[self.salt.as_slice(), &self.init_code])
    }

    /// Address the factory will deploy this payload to.
    pub fn predicted_address(&self, factory: Address) -> Address {
        factory.create2_from_code(self.salt, &self.init_code)
    }

    /// The call that deploys this payload through `factory`.
    pub fn call(&self, factory: Address) -> Call {
        Call::new(factory, self.calldata())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("no creation bytecode to deploy")]
    MissingBytecode,
    #[error("mismatch number of arguments (want {expected}; got {got})")]
    ArgumentCount { expected: usize, got: usize },
    #[error("could not parse argument for {param}: {reason}")]
    InvalidArgument { param: String, reason: String },
    #[error("abi encoding failed: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),
    #[error("contract has no constructor taking arguments")]
    MissingConstructor,
    #[error("no function `{name}` taking {args} argument(s)")]
    MissingFunction { name: String, args: usize },
}

/// Builds a salted deployment payload from creation bytecode and string constructor arguments.
///
/// The arguments are coerced against the constructor's parameter types. Without a constructor,
/// the bytecode is deployed as-is and any argument is an error.
pub fn build_deploy_payload(
    bytecode: &[u8],
    constructor: Option<&Constructor>,
    args: &[String],
) -> Result<DeployPayload, EncodingError> {
    let values = match constructor {
        Some(constructor) => coerce_args(&constructor.inputs, args)?,
        None if args.is_empty() => Vec::new(),
        None => {
            return Err(EncodingError::ArgumentCount {
                expected: 0,
                got: args.len(),
            })
        }
    };
    let init_code = encode_deploy_data(bytecode, constructor, &values)?;
    Ok(DeployPayload::with_random_salt(init_code))
}

/// Creation bytecode followed by the ABI-encoded constructor arguments.
pub fn encode_deploy_data(
    bytecode: &[u8],
    constructor: Option<&Constructor>,
    values: &[DynSolValue],
) -> Result<Bytes, EncodingError> {
    if bytecode.is_empty() {
        return Err(EncodingError::MissingBytecode);
    }
    let encoded_args = match constructor {
        Some(constructor) => constructor.abi_encode_input(values)?,
        None if values.is_empty() => Vec::new(),
        None => return Err(EncodingError::MissingConstructor),
    };
    Ok(concat(&[bytecode, &encoded_args]))
}

/// Parses string arguments into typed ABI values.
pub fn coerce_args(params: &[Param], args: &[String]) -> Result<Vec<DynSolValue>, EncodingError> {
    if params.len() != args.len() {
        return Err(EncodingError::ArgumentCount {
            expected: params.len(),
            got: args.len(),
        });
    }
    params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let invalid = |reason: String| EncodingError::InvalidArgument {
                param: param.to_string(),
                reason,
            };
            let ty = param.resolve().map_err(|err| invalid(err.to_string()))?;
            ty.coerce_str(arg).map_err(|err| invalid(err.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{address, bytes, U256},
        sol_types::SolValue,
    };

    use super::*;

    const BYTECODE: Bytes = bytes!("6080604052348015600e575f80fd5b50");

    fn constructor(signature: &str) -> Constructor {
        Constructor::parse(signature).expect("valid constructor")
    }

    #[test]
    fn salts_are_fresh() {
        let first = build_deploy_payload(&BYTECODE, None, &[]).unwrap();
        let second = build_deploy_payload(&BYTECODE, None, &[]).unwrap();
        assert_ne!(first.salt(), second.salt());
        assert_eq!(first.init_code(), second.init_code());
    }

    #[test]
    fn calldata_layout() {
        let payload = build_deploy_payload(&BYTECODE, None, &[]).unwrap();
        let calldata = payload.calldata();
        assert_eq!(calldata.len(), 32 + BYTECODE.len());
        assert_eq!(&calldata[..32], payload.salt().as_slice());
        assert_eq!(&calldata[32..], &BYTECODE[..]);
    }

    #[test]
    fn encodes_constructor_args() {
        let ctor = constructor("constructor(uint256 start, address owner)");
        let args = vec![
            "5".to_owned(),
            "0x1234567890123456789012345678901234567890".to_owned(),
        ];
        let payload = build_deploy_payload(&BYTECODE, Some(&ctor), &args).unwrap();
        let expected_args = (
            U256::from(5),
            address!("1234567890123456789012345678901234567890"),
        )
            .abi_encode_params();
        assert_eq!(
            payload.init_code().to_vec(),
            [&BYTECODE[..], &expected_args[..]].concat()
        );
    }

    #[test]
    fn argument_count_mismatch() {
        let ctor = constructor("constructor(uint256 start)");
        let err = build_deploy_payload(&BYTECODE, Some(&ctor), &[]).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::ArgumentCount {
                expected: 1,
                got: 0
            }
        ));

        let err = build_deploy_payload(&BYTECODE, None, &["1".to_owned()]).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::ArgumentCount {
                expected: 0,
                got: 1
            }
        ));
    }

    #[test]
    fn unparsable_argument() {
        let ctor = constructor("constructor(address owner)");
        let err = build_deploy_payload(&BYTECODE, Some(&ctor), &["nope".to_owned()]).unwrap_err();
        assert!(matches!(err, EncodingError::InvalidArgument { .. }));
    }

    #[test]
    fn empty_bytecode() {
        let err = build_deploy_payload(&[], None, &[]).unwrap_err();
        assert!(matches!(err, EncodingError::MissingBytecode));
    }

    #[test]
    fn predicted_address_matches_create2() {
        let payload = DeployPayload::new(B256::repeat_byte(0x11), BYTECODE);
        let factory = CREATE2_FACTORY_ADDRESS;
        assert_eq!(
            payload.predicted_address(factory),
            factory.create2(B256::repeat_byte(0x11), alloy::primitives::keccak256(&BYTECODE)),
        );
        let call = payload.call(factory);
        assert_eq!(call.target, factory);
        assert_eq!(call.data, payload.calldata());
        assert!(call.value.is_zero());
    }
}
