use tracing::{error, info};

use super::amount::to_base_units;
use crate::errors::TransactionError;
use crate::models::{Asset, EntryFunctionPayload, MarketData, TransactionResult};
use crate::traits::chain_client::TransactionWaiter;
use crate::traits::event_handler::TransactionKind;
use crate::traits::wallet::TransactionSigner;

/// What the user asked to move, and for whom
#[derive(Debug, Clone, Copy)]
pub struct TransactionParams<'a> {
    pub asset: &'a Asset,
    pub market: &'a MarketData,
    pub amount: &'a str,
    pub user_address: &'a str,
}

pub(crate) type PayloadBuilder = fn(&str, u128, &str) -> EntryFunctionPayload;

/// Scale, build, sign and confirm; every failure becomes a failed result
pub(crate) async fn submit(
    kind: TransactionKind,
    params: &TransactionParams<'_>,
    build: PayloadBuilder,
    signer: &dyn TransactionSigner,
    waiter: &dyn TransactionWaiter,
) -> TransactionResult {
    match try_submit(kind, params, build, signer, waiter).await {
        Ok(hash) => TransactionResult::confirmed(hash),
        Err(e) => {
            error!("{} transaction failed: {}", kind.label(), e);
            TransactionResult::failed(e.to_string())
        }
    }
}

async fn try_submit(
    kind: TransactionKind,
    params: &TransactionParams<'_>,
    build: PayloadBuilder,
    signer: &dyn TransactionSigner,
    waiter: &dyn TransactionWaiter,
) -> Result<String, TransactionError> {
    let asset = params.asset;
    let scaled = to_base_units(params.amount, asset.decimals)?;

    info!(
        "{} {} {} ({} base units, decimals {}) reserve {} for {}",
        kind.label(),
        params.amount,
        asset.symbol,
        scaled,
        asset.decimals,
        params.market.reserve_object,
        params.user_address
    );

    let payload = build(&asset.token_address, scaled, params.user_address);
    info!("Submitting {} with {:?}", payload.function, payload.function_arguments);

    let response = signer
        .sign_and_submit(&payload)
        .await
        .map_err(|e| TransactionError::Wallet(format!("{:#}", e)))?;

    let hash = response.hash.ok_or(TransactionError::MissingHash)?;

    info!("Waiting for transaction confirmation...");
    let confirmed = waiter.wait_for_transaction(&hash).await?;
    info!("Transaction confirmed: {} ({})", confirmed.hash, confirmed.vm_status);

    Ok(hash)
}
