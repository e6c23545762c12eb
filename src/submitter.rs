use anyhow::Context;
use itertools::Itertools;

use crate::accumulator::Batch;
use crate::note::NATIVE_ASSET_ID;
use crate::rpc::{CreateTransactionRequest, TransactionOutput, WalletApi};
use crate::transaction::Transaction;

/// Memo attached to every consolidating transaction.
pub const COMBINE_MEMO: &str = "Combine notes";

#[derive(Clone, Debug)]
pub struct SubmissionResult {
    /// Lowercase hex canonical hash of the broadcast transaction.
    pub hash: String,
    pub note_count: usize,
    pub raw: Vec<u8>,
}

/// Turns an accumulated batch into one self-consolidating transaction:
/// all batch notes in, a single output back to the account's own address.
pub struct BatchSubmitter<'a, W: WalletApi> {
    rpc: &'a W,
    account: String,
    destination: String,
    fee: u64,
    expiration_delta: u32,
}

impl<'a, W: WalletApi> BatchSubmitter<'a, W> {
    pub fn new(
        rpc: &'a W,
        account: String,
        destination: String,
        fee: u64,
        expiration_delta: u32,
    ) -> Self {
        BatchSubmitter {
            rpc,
            account,
            destination,
            fee,
            expiration_delta,
        }
    }

    fn build_request(&self, batch: &Batch) -> CreateTransactionRequest {
        CreateTransactionRequest {
            account: self.account.clone(),
            outputs: vec![TransactionOutput {
                public_address: self.destination.clone(),
                amount: batch.total_value.to_string(),
                asset_id: NATIVE_ASSET_ID.to_string(),
                memo: COMBINE_MEMO.to_string(),
            }],
            fee: self.fee.to_string(),
            expiration_delta: self.expiration_delta,
            notes: batch.note_hashes.clone(),
        }
    }

    pub async fn submit(&self, batch: &Batch) -> anyhow::Result<SubmissionResult> {
        tracing::info!(
            "Creating transaction for account {} with {} notes",
            self.account,
            batch.len()
        );
        tracing::debug!("batch notes: {}", batch.note_hashes.iter().join(","));

        let request = self.build_request(batch);
        let unsigned = self.rpc.create_transaction(&request).await?;
        let posted = self.rpc.post_transaction(&unsigned, &self.account).await?;

        let raw = hex::decode(&posted).context("Node returned malformed transaction hex")?;
        let transaction = Transaction::read(&raw)
            .context("Failed to decode the finalized transaction returned by the node")?;

        Ok(SubmissionResult {
            hash: transaction.hash_hex(),
            note_count: batch.len(),
            raw,
        })
    }
}
