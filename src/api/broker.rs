use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Client for the sandbox broker API (account CRUD, ACH, transfers)
///
/// Exercised by the maintenance binaries only; the dispatcher never touches
/// these endpoints.
#[derive(Clone)]
pub struct BrokerClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

// ============== Wire Types ==============

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AchRelationship {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Trading-account snapshot; only the balance matters to the funding check.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingAccount {
    #[serde(default)]
    pub balance: Option<String>,
}

impl TradingAccount {
    /// Balance as a number; an absent or unparsable balance reads as zero.
    pub fn balance_value(&self) -> f64 {
        self.balance
            .as_deref()
            .and_then(|b| b.parse().ok())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountApplication {
    pub contact: Contact,
    pub identity: Identity,
    pub disclosures: Disclosures,
    pub agreements: Vec<Agreement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub email_address: String,
    pub phone_number: String,
    pub street_address: Vec<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub tax_id_type: String,
    pub given_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub tax_id: String,
    pub country_of_citizenship: String,
    pub country_of_birth: String,
    pub country_of_tax_residence: String,
    pub funding_source: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Disclosures {
    pub is_control_person: bool,
    pub is_affiliated_exchange_or_finra: bool,
    pub is_politically_exposed: bool,
    pub immediate_family_exposed: bool,
    pub employment_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Agreement {
    pub agreement: String,
    pub signed_at: String,
    pub ip_address: String,
}

impl AccountApplication {
    /// Sandbox application template; only the email varies between accounts.
    pub fn sandbox(email: &str) -> Self {
        Self {
            contact: Contact {
                email_address: email.to_string(),
                phone_number: "+15556667788".to_string(),
                street_address: vec!["20 N San Mateo Dr".to_string()],
                city: "San Mateo".to_string(),
                state: "CA".to_string(),
                postal_code: "94401".to_string(),
            },
            identity: Identity {
                tax_id_type: "USA_SSN".to_string(),
                given_name: "John".to_string(),
                family_name: "Doe".to_string(),
                date_of_birth: "1990-01-01".to_string(),
                tax_id: "999-99-9990".to_string(),
                country_of_citizenship: "USA".to_string(),
                country_of_birth: "USA".to_string(),
                country_of_tax_residence: "USA".to_string(),
                funding_source: vec!["employment_income".to_string()],
            },
            disclosures: Disclosures {
                is_control_person: true,
                is_affiliated_exchange_or_finra: true,
                is_politically_exposed: true,
                immediate_family_exposed: true,
                employment_status: "employed".to_string(),
            },
            agreements: vec![Agreement {
                agreement: "customer_agreement".to_string(),
                signed_at: "2019-09-11T18:09:33Z".to_string(),
                ip_address: "111.11.11.11".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AchRelationshipRequest {
    pub bank_account_type: String,
    pub account_owner_name: String,
    pub bank_account_number: String,
    pub bank_routing_number: String,
    pub nickname: String,
}

impl AchRelationshipRequest {
    /// Sandbox checking-account template.
    pub fn sandbox_checking(owner_name: &str) -> Self {
        Self {
            bank_account_type: "CHECKING".to_string(),
            account_owner_name: owner_name.to_string(),
            bank_account_number: "32131231abc".to_string(),
            bank_routing_number: "123103716".to_string(),
            nickname: "Bank of America Checking".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub transfer_type: String,
    pub direction: String,
    pub timing: String,
    pub amount: String,
    pub relationship_id: String,
}

impl TransferRequest {
    /// Immediate incoming ACH transfer against a linked bank relationship.
    pub fn incoming_ach(relationship_id: &str, amount: f64) -> Self {
        Self {
            transfer_type: "ach".to_string(),
            direction: "INCOMING".to_string(),
            timing: "immediate".to_string(),
            amount: format!("{:.2}", amount),
            relationship_id: relationship_id.to_string(),
        }
    }
}

// ============== Implementation ==============

impl BrokerClient {
    /// `base_url` is the versioned API root, e.g.
    /// `https://broker-api.sandbox.alpaca.markets/v1`.
    pub fn new(base_url: String, auth_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth_token,
        }
    }

    /// Create a sandbox account
    /// Endpoint: POST /accounts
    pub async fn create_account(&self, application: &AccountApplication) -> Result<Account> {
        let url = format!("{}/accounts", self.base_url);
        self.post_json(&url, application)
            .await
            .context("Failed to create account")
    }

    /// List all accounts
    /// Endpoint: GET /accounts
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let url = format!("{}/accounts", self.base_url);
        self.get_json(&url).await.context("Failed to list accounts")
    }

    /// Fetch a single account
    /// Endpoint: GET /accounts/{id}
    pub async fn get_account(&self, account_id: &str) -> Result<Account> {
        let url = format!("{}/accounts/{}", self.base_url, account_id);
        self.get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch account {}", account_id))
    }

    /// List ACH relationships for an account
    /// Endpoint: GET /accounts/{id}/ach_relationships
    pub async fn list_ach_relationships(&self, account_id: &str) -> Result<Vec<AchRelationship>> {
        let url = format!("{}/accounts/{}/ach_relationships", self.base_url, account_id);
        self.get_json(&url)
            .await
            .with_context(|| format!("Failed to list ACH relationships for {}", account_id))
    }

    /// Link a bank account via ACH
    /// Endpoint: POST /accounts/{id}/ach_relationships
    pub async fn create_ach_relationship(
        &self,
        account_id: &str,
        request: &AchRelationshipRequest,
    ) -> Result<AchRelationship> {
        let url = format!("{}/accounts/{}/ach_relationships", self.base_url, account_id);
        self.post_json(&url, request)
            .await
            .with_context(|| format!("Failed to create ACH relationship for {}", account_id))
    }

    /// Initiate a funding transfer; the response body is returned verbatim.
    /// Endpoint: POST /accounts/{id}/transfers
    pub async fn create_transfer(
        &self,
        account_id: &str,
        request: &TransferRequest,
    ) -> Result<String> {
        let url = format!("{}/accounts/{}/transfers", self.base_url, account_id);

        let response = self
            .request_headers(self.client.post(&url))
            .json(request)
            .send()
            .await
            .context("Transfer request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if !status.is_success() {
            anyhow::bail!("Broker API error ({}): {}", status, body);
        }

        Ok(body)
    }

    /// Fetch the trading-account snapshot (balance)
    /// Endpoint: GET /trading/accounts/{id}/account
    pub async fn trading_account(&self, account_id: &str) -> Result<TradingAccount> {
        let url = format!("{}/trading/accounts/{}/account", self.base_url, account_id);
        self.get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch trading account {}", account_id))
    }

    fn request_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("accept", "application/json")
            .header("authorization", &self.auth_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .request_headers(self.client.get(url))
            .send()
            .await
            .context("Broker request failed")?;

        self.parse_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .request_headers(self.client.post(url))
            .json(body)
            .send()
            .await
            .context("Broker request failed")?;

        self.parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Broker API error ({}): {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse broker response")
    }
}
