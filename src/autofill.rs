//! Autofill cache and company profile store.
//!
//! Both live outside the chat snapshot so they survive a cleared transcript. The
//! autofill entry only ever holds the exporter name, address and tax ID; writes merge
//! into what is stored and the last write wins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{autofill_key, company_key, load_json, save_json, StateStore, StorageError};

/// Cached identity answers from earlier sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AutofillData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exporter_company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exporter_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exporter_gstin: Option<String>,
}

impl AutofillData {
    /// Cached value for one of the three autofill fields.
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "exporter_company_name" => self.exporter_company_name.as_deref(),
            "exporter_address" => self.exporter_address.as_deref(),
            "exporter_gstin" => self.exporter_gstin.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Partial update for a single field; `None` for fields outside the cache.
    pub fn for_field(field: &str, value: &str) -> Option<Self> {
        let value = Some(value.to_string());
        match field {
            "exporter_company_name" => Some(Self {
                exporter_company_name: value,
                ..Default::default()
            }),
            "exporter_address" => Some(Self {
                exporter_address: value,
                ..Default::default()
            }),
            "exporter_gstin" => Some(Self {
                exporter_gstin: value,
                ..Default::default()
            }),
            _ => None,
        }
    }

    /// Overlay the fields present in `partial`.
    pub fn merge(&mut self, partial: AutofillData) {
        if partial.exporter_company_name.is_some() {
            self.exporter_company_name = partial.exporter_company_name;
        }
        if partial.exporter_address.is_some() {
            self.exporter_address = partial.exporter_address;
        }
        if partial.exporter_gstin.is_some() {
            self.exporter_gstin = partial.exporter_gstin;
        }
    }
}

/// Company identity shown on documents when the answers do not provide it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyData {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub comp_reg_address: String,
    #[serde(default)]
    pub gstin: String,
}

impl CompanyData {
    /// Apply an autofill-field answer to the matching company attribute.
    pub fn apply(&mut self, field: &str, value: &str) {
        match field {
            "exporter_company_name" => self.company_name = value.to_string(),
            "exporter_address" => self.comp_reg_address = value.to_string(),
            "exporter_gstin" => self.gstin = value.to_string(),
            _ => {}
        }
    }
}

/// Per-user autofill and company stores.
#[derive(Clone)]
pub struct AutofillCache {
    store: Arc<dyn StateStore>,
}

impl AutofillCache {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Cached autofill values; unreadable entries count as empty.
    pub async fn load(&self, user_id: Option<&str>) -> AutofillData {
        match load_json(self.store.as_ref(), &autofill_key(user_id)).await {
            Ok(data) => data.unwrap_or_default(),
            Err(e) => {
                log::error!("Failed to load autofill data, starting empty: {}", e);
                AutofillData::default()
            }
        }
    }

    /// Merge `partial` into the stored entry.
    pub async fn save(&self, user_id: Option<&str>, partial: AutofillData) -> Result<(), StorageError> {
        let mut data = self.load(user_id).await;
        data.merge(partial);
        save_json(self.store.as_ref(), &autofill_key(user_id), &data).await?;
        log::debug!("Autofill data updated for {}", autofill_key(user_id));
        Ok(())
    }

    pub async fn load_company(&self, user_id: Option<&str>) -> CompanyData {
        match load_json(self.store.as_ref(), &company_key(user_id)).await {
            Ok(data) => data.unwrap_or_default(),
            Err(e) => {
                log::error!("Failed to load company data, starting empty: {}", e);
                CompanyData::default()
            }
        }
    }

    pub async fn save_company(&self, user_id: Option<&str>, company: &CompanyData) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), &company_key(user_id), company).await
    }
}
