use super::payload::withdraw_payload;
use super::transaction::{submit, TransactionParams};
use crate::models::TransactionResult;
use crate::traits::chain_client::TransactionWaiter;
use crate::traits::event_handler::TransactionKind;
use crate::traits::wallet::TransactionSigner;

/// Withdraw `params.amount` of a supplied asset back to the user
pub async fn execute_withdraw(
    params: &TransactionParams<'_>,
    signer: &dyn TransactionSigner,
    waiter: &dyn TransactionWaiter,
) -> TransactionResult {
    submit(TransactionKind::Withdraw, params, withdraw_payload, signer, waiter).await
}
