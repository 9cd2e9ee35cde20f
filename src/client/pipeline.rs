//! Call and transaction pipeline
//!
//! `query` runs a read-only `eth_call`; `submit_transaction` prices, signs and
//! broadcasts a legacy EIP-155 transaction.

use alloy::consensus::{SignableTransaction, Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, Signature, TxKind, U256};
use tracing::{debug, error, info, warn};

use super::{Client, TxHash, BASELINE_GAS_PRICE, FALLBACK_GAS_LIMIT};
use crate::domain::abi::{AbiCodec, ContractInterface, DecodedValue, MethodSpec};
use crate::domain::{CallMessage, Signer};
use crate::error::{Error, Result, RpcErrorKind};
use crate::infrastructure::ethereum::NodeApi;

/// Order of the secp256k1 group
const SECP256K1_N: U256 = U256::from_limbs([
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
]);

impl Client {
    /// Call a view method against the pending state and decode its outputs
    pub async fn query(
        &mut self,
        from: Address,
        to: Address,
        abi: &ContractInterface,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DecodedValue>> {
        let (node, codec) = self.parts().await?;

        let (msg, spec) = build_call(codec, from, to, abi, method, args)?;
        let output = node.call(&msg).await?;
        codec.decode_output(spec, &output)
    }

    /// Sign and broadcast a call to `method`, returning the transaction hash.
    ///
    /// The transaction is not awaited; poll the receipt to learn its outcome.
    pub async fn submit_transaction<S>(
        &mut self,
        account: &S,
        to: Address,
        abi: &ContractInterface,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<TxHash>
    where
        S: Signer + ?Sized,
    {
        let (node, codec) = self.parts().await?;
        let from = account.address();

        let (mut msg, _) = build_call(codec, from, to, abi, method, args)?;
        apply_fees(node, &mut msg).await?;

        let nonce = node.pending_nonce(from).await?;
        let chain_id = node.chain_id().await?;

        let tx = TxLegacy {
            chain_id: Some(chain_id),
            nonce,
            gas_price: msg.gas_price.unwrap_or(BASELINE_GAS_PRICE),
            gas_limit: msg.gas,
            to: TxKind::Call(msg.to),
            value: msg.value,
            input: msg.data.clone(),
        };

        let signed = sign_transaction(account, tx)?;
        let local_hash = *signed.hash();
        let raw = TxEnvelope::Legacy(signed).encoded_2718();

        let node_hash = node
            .send_raw_transaction(&raw)
            .await
            .map_err(Error::Submission)?;
        if node_hash != local_hash {
            warn!(
                local = %local_hash,
                node = %node_hash,
                "node reported a different transaction hash"
            );
        }

        info!(
            hash = %local_hash,
            from = %from,
            to = %to,
            method,
            nonce,
            gas = msg.gas,
            "transaction submitted"
        );
        Ok(local_hash)
    }
}

/// Look up `method` and encode a zero-value call message for it
fn build_call<'a>(
    codec: &dyn AbiCodec,
    from: Address,
    to: Address,
    abi: &'a ContractInterface,
    method: &str,
    args: &[DynSolValue],
) -> Result<(CallMessage, &'a MethodSpec)> {
    let spec = abi
        .method(method)
        .ok_or_else(|| Error::MethodNotFound(method.to_string()))?;
    debug!(method, selector = %spec.selector_hex(), to = %to, "target method");

    let mut msg = CallMessage::new(from, to);
    msg.data = Bytes::from(codec.encode_call(spec, args)?);
    Ok((msg, spec))
}

/// Fill gas limit, gas price, fee cap and tip cap from the node
async fn apply_fees(node: &dyn NodeApi, msg: &mut CallMessage) -> Result<()> {
    match node.estimate_gas(msg).await {
        Ok(gas) => {
            msg.gas = gas;
            msg.gas_price = Some(BASELINE_GAS_PRICE);
            debug!(gas, "estimated gas");
        }
        Err(err) if err.is_reverted() => {
            warn!(
                error = %err,
                gas = FALLBACK_GAS_LIMIT,
                "gas estimation reverted, using fallback gas limit"
            );
            msg.gas = FALLBACK_GAS_LIMIT;
        }
        Err(err) => return Err(Error::GasEstimation(err)),
    }

    let price = node.gas_price().await?;
    msg.gas_price = Some(price);
    msg.gas_fee_cap = Some(price);

    match node.max_priority_fee_per_gas().await {
        Ok(tip) => msg.gas_tip_cap = Some(tip),
        Err(err) if err.kind == RpcErrorKind::MethodNotSupported => {
            debug!(error = %err, "node has no fee market, leaving tip cap unset");
            msg.gas_tip_cap = None;
        }
        Err(err) => return Err(err.into()),
    }

    debug!(
        gas = msg.gas,
        gas_price = price,
        tip_cap = ?msg.gas_tip_cap,
        "fees applied"
    );
    Ok(())
}

/// Sign under EIP-155 and check the signature before it leaves the process
fn sign_transaction<S>(signer: &S, tx: TxLegacy) -> Result<Signed<TxLegacy>>
where
    S: Signer + ?Sized,
{
    let hash = tx.signature_hash();
    let signature = signer.sign_hash(&hash)?;

    let recovered = signature
        .recover_address_from_prehash(&hash)
        .map_err(|e| Error::Signature(format!("failed to recover signer: {}", e)))?;
    if recovered != signer.address() {
        error!(
            expected = %signer.address(),
            recovered = %recovered,
            "recovered signer does not match sender"
        );
        return Err(Error::Signature(format!(
            "recovered signer {} does not match sender {}",
            recovered,
            signer.address()
        )));
    }

    if !validate_signature_values(&signature) {
        return Err(Error::Signature("signature values out of range".to_string()));
    }

    Ok(tx.into_signed(signature))
}

/// Check that `r` and `s` lie in `[1, n)` for the secp256k1 order `n`
pub fn validate_signature_values(signature: &Signature) -> bool {
    let in_range = |value: U256| !value.is_zero() && value < SECP256K1_N;
    in_range(signature.r()) && in_range(signature.s())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use crate::infrastructure::ethereum::RawReceipt;
    use alloy_primitives::B256;
    use async_trait::async_trait;

    /// Node whose fee endpoints return fixed results
    struct FeeNode {
        estimate: std::result::Result<u64, RpcError>,
        tip: std::result::Result<u128, RpcError>,
    }

    #[async_trait]
    impl NodeApi for FeeNode {
        async fn chain_id(&self) -> std::result::Result<u64, RpcError> {
            Ok(1337)
        }

        async fn latest_block_number(&self) -> std::result::Result<u64, RpcError> {
            Ok(0)
        }

        async fn call(&self, _msg: &CallMessage) -> std::result::Result<Bytes, RpcError> {
            Ok(Bytes::new())
        }

        async fn estimate_gas(&self, _msg: &CallMessage) -> std::result::Result<u64, RpcError> {
            self.estimate.clone()
        }

        async fn gas_price(&self) -> std::result::Result<u128, RpcError> {
            Ok(7)
        }

        async fn max_priority_fee_per_gas(&self) -> std::result::Result<u128, RpcError> {
            self.tip.clone()
        }

        async fn pending_nonce(&self, _address: Address) -> std::result::Result<u64, RpcError> {
            Ok(0)
        }

        async fn send_raw_transaction(&self, _raw: &[u8]) -> std::result::Result<B256, RpcError> {
            Ok(B256::ZERO)
        }

        async fn transaction_receipt(
            &self,
            _hash: B256,
        ) -> std::result::Result<Option<RawReceipt>, RpcError> {
            Ok(None)
        }

        async fn storage_at(
            &self,
            _address: Address,
            _slot: U256,
        ) -> std::result::Result<B256, RpcError> {
            Ok(B256::ZERO)
        }

        fn endpoint_name(&self) -> String {
            "mock://fee-node".to_string()
        }
    }

    fn fee_message() -> CallMessage {
        CallMessage::new(Address::repeat_byte(0x11), Address::repeat_byte(0x22))
    }

    #[tokio::test]
    async fn test_apply_fees_leaves_tip_unset_without_fee_market() {
        let node = FeeNode {
            estimate: Ok(50_000),
            tip: Err(RpcError::from_response(
                -32601,
                "the method eth_maxPriorityFeePerGas does not exist/is not available",
                None,
            )),
        };
        let mut msg = fee_message();
        apply_fees(&node, &mut msg).await.unwrap();

        assert_eq!(msg.gas, 50_000);
        assert_eq!(msg.gas_price, Some(7));
        assert_eq!(msg.gas_fee_cap, Some(7));
        assert_eq!(msg.gas_tip_cap, None);
    }

    #[tokio::test]
    async fn test_apply_fees_falls_back_on_revert() {
        let node = FeeNode {
            estimate: Err(RpcError::from_response(3, "execution reverted", None)),
            tip: Ok(2),
        };
        let mut msg = fee_message();
        apply_fees(&node, &mut msg).await.unwrap();

        assert_eq!(msg.gas, FALLBACK_GAS_LIMIT);
        assert_eq!(msg.gas_tip_cap, Some(2));
    }

    #[tokio::test]
    async fn test_apply_fees_aborts_on_other_tip_errors() {
        let node = FeeNode {
            estimate: Ok(21_000),
            tip: Err(RpcError::from_response(-32000, "account does not exist", None)),
        };
        let mut msg = fee_message();
        let err = apply_fees(&node, &mut msg).await.unwrap_err();
        assert!(matches!(err, Error::Rpc(e) if e.kind == RpcErrorKind::Other));
    }

    #[test]
    fn test_signature_value_bounds() {
        let one = U256::from(1);
        assert!(validate_signature_values(&Signature::new(one, one, false)));
        assert!(validate_signature_values(&Signature::new(
            SECP256K1_N - one,
            SECP256K1_N - one,
            true
        )));

        assert!(!validate_signature_values(&Signature::new(U256::ZERO, one, false)));
        assert!(!validate_signature_values(&Signature::new(one, U256::ZERO, false)));
        assert!(!validate_signature_values(&Signature::new(SECP256K1_N, one, false)));
        assert!(!validate_signature_values(&Signature::new(one, U256::MAX, false)));
    }

    #[test]
    fn test_curve_order_constant() {
        let expected: U256 = "0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"
            .parse()
            .unwrap();
        assert_eq!(SECP256K1_N, expected);
    }

    struct WrongAddress(crate::infrastructure::signer::Account);

    impl Signer for WrongAddress {
        fn address(&self) -> Address {
            Address::repeat_byte(0x01)
        }

        fn sign_hash(&self, hash: &alloy_primitives::B256) -> Result<Signature> {
            self.0.sign_hash(hash)
        }
    }

    fn sample_tx() -> TxLegacy {
        TxLegacy {
            chain_id: Some(1337),
            nonce: 0,
            gas_price: BASELINE_GAS_PRICE,
            gas_limit: FALLBACK_GAS_LIMIT,
            to: TxKind::Call(Address::repeat_byte(0x22)),
            value: U256::ZERO,
            input: Bytes::from(vec![0x64, 0xd9, 0x8f, 0x6e]),
        }
    }

    #[test]
    fn test_sign_transaction_checks_signer() {
        let account = crate::infrastructure::signer::create_account();
        let hash = sample_tx().signature_hash();
        let signed = sign_transaction(&account, sample_tx()).unwrap();
        let recovered = signed
            .signature()
            .recover_address_from_prehash(&hash)
            .unwrap();
        assert_eq!(recovered, account.address());

        let err = sign_transaction(&WrongAddress(account), sample_tx()).unwrap_err();
        assert!(matches!(err, Error::Signature(msg) if msg.contains("does not match")));
    }
}
