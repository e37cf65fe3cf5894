use super::payload::supply_payload;
use super::transaction::{submit, TransactionParams};
use crate::models::TransactionResult;
use crate::traits::chain_client::TransactionWaiter;
use crate::traits::event_handler::TransactionKind;
use crate::traits::wallet::TransactionSigner;

/// Supply `params.amount` of an asset on behalf of the user
pub async fn execute_supply(
    params: &TransactionParams<'_>,
    signer: &dyn TransactionSigner,
    waiter: &dyn TransactionWaiter,
) -> TransactionResult {
    submit(TransactionKind::Supply, params, supply_payload, signer, waiter).await
}
