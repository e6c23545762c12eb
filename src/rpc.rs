use anyhow::{anyhow, Context};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::note::{NoteRecord, NATIVE_ASSET_ID};

/// A hung node call fails the run after this long instead of hanging it
/// forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The four wallet operations the combiner depends on. `WalletRpc` is the
/// production implementation; tests drive the loop with an in-memory one.
pub trait WalletApi {
    async fn get_account_public_key(&self, account: &str) -> anyhow::Result<String>;

    async fn get_notes(
        &self,
        account: &str,
        page_size: usize,
        filter: &NoteFilter,
    ) -> anyhow::Result<Vec<NoteRecord>>;

    /// Returns the hex of the unsigned transaction built by the node.
    async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> anyhow::Result<String>;

    /// Signs and broadcasts, returns the hex of the finalized transaction.
    async fn post_transaction(&self, transaction: &str, account: &str) -> anyhow::Result<String>;
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    pub asset_id: String,
    pub spent: bool,
}

impl NoteFilter {
    pub fn native_unspent() -> Self {
        NoteFilter {
            asset_id: NATIVE_ASSET_ID.to_string(),
            spent: false,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    pub public_address: String,
    /// Decimal string in smallest denomination.
    pub amount: String,
    pub asset_id: String,
    pub memo: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub account: String,
    pub outputs: Vec<TransactionOutput>,
    pub fee: String,
    pub expiration_delta: u32,
    pub notes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[allow(dead_code)]
    status: u16,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPublicKeyResponse {
    public_key: String,
}

#[derive(Debug, Deserialize)]
struct GetNotesResponse {
    notes: Vec<NoteRecord>,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    transaction: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountRequest<'a> {
    account: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetNotesRequest<'a> {
    account: &'a str,
    page_size: usize,
    filter: &'a NoteFilter,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostTransactionRequest<'a> {
    transaction: &'a str,
    account: &'a str,
}

/// JSON-over-http client for the node's wallet rpc.
pub struct WalletRpc {
    client: Client,
    endpoint: String,
}

impl WalletRpc {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP Client")?;
        Ok(WalletRpc {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    async fn call<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        route: &str,
        body: &Req,
    ) -> anyhow::Result<Resp> {
        let req = self
            .client
            .post(url(&self.endpoint, route))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to call {route} on the node endpoint"))?;

        match req.status() {
            StatusCode::OK => {
                let response: RpcResponse<Resp> = req
                    .json()
                    .await
                    .with_context(|| format!("Expect {route} to return an rpc envelope"))?;
                Ok(response.data)
            }
            code => Err(anyhow!("{route} returned error status: {code:?}")),
        }
    }
}

impl WalletApi for WalletRpc {
    async fn get_account_public_key(&self, account: &str) -> anyhow::Result<String> {
        let response: GetPublicKeyResponse = self
            .call("wallet/getAccountPublicKey", &AccountRequest { account })
            .await?;
        Ok(response.public_key)
    }

    async fn get_notes(
        &self,
        account: &str,
        page_size: usize,
        filter: &NoteFilter,
    ) -> anyhow::Result<Vec<NoteRecord>> {
        let response: GetNotesResponse = self
            .call(
                "wallet/getNotes",
                &GetNotesRequest {
                    account,
                    page_size,
                    filter,
                },
            )
            .await?;
        Ok(response.notes)
    }

    async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> anyhow::Result<String> {
        let response: TransactionResponse =
            self.call("wallet/createTransaction", request).await?;
        Ok(response.transaction)
    }

    async fn post_transaction(&self, transaction: &str, account: &str) -> anyhow::Result<String> {
        let response: TransactionResponse = self
            .call(
                "wallet/postTransaction",
                &PostTransactionRequest {
                    transaction,
                    account,
                },
            )
            .await?;
        Ok(response.transaction)
    }
}

fn url(endpoint: &String, api: impl fmt::Display) -> String {
    format!("{endpoint}/{api}")
}

#[cfg(test)]
mod tests {
    use crate::rpc::{url, CreateTransactionRequest, NoteFilter, TransactionOutput};

    #[test]
    fn url_joins_endpoint_and_route() {
        assert_eq!(
            url(&"http://localhost:8021".to_string(), "wallet/getNotes"),
            "http://localhost:8021/wallet/getNotes"
        );
    }

    #[test]
    fn create_transaction_request_uses_wire_names() {
        let request = CreateTransactionRequest {
            account: "default".to_string(),
            outputs: vec![TransactionOutput {
                public_address: "addr".to_string(),
                amount: "300000000".to_string(),
                asset_id: "00".to_string(),
                memo: "Combine notes".to_string(),
            }],
            fee: "5".to_string(),
            expiration_delta: 30,
            notes: vec!["aa".to_string(), "bb".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["expirationDelta"], 30);
        assert_eq!(json["outputs"][0]["publicAddress"], "addr");
        assert_eq!(json["outputs"][0]["amount"], "300000000");
        assert_eq!(json["notes"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn native_filter_targets_unspent_notes() {
        let filter = NoteFilter::native_unspent();
        assert!(!filter.spent);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["assetId"], crate::note::NATIVE_ASSET_ID);
    }
}
