//! Wire formats of the inventory API.

use serde::Deserialize;

use super::{ApiError, ApiResult};
use crate::config::CompanyField;
use crate::models::Item;

#[derive(Debug, Deserialize)]
struct RawItem {
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
}

impl RawItem {
    fn into_item(self, company_field: CompanyField) -> Item {
        let company = match company_field {
            CompanyField::Company => self.company,
            CompanyField::CompanyName => self.company_name,
            CompanyField::Either => self.company.or(self.company_name),
        };
        Item {
            name: self.name,
            location: self.location.unwrap_or_default(),
            company: company.unwrap_or_default(),
        }
    }
}

/// Array elements nest the record under `item`; older endpoints send it bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Wrapped { item: RawItem },
    Bare(RawItem),
}

impl RawEntry {
    fn into_item(self, company_field: CompanyField) -> Item {
        match self {
            Self::Wrapped { item } | Self::Bare(item) => item.into_item(company_field),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSearchPayload {
    Container { item: Vec<RawEntry> },
    List(Vec<RawEntry>),
}

/// Parse a lookup response body into items, preserving server order.
pub fn parse_search_payload(body: &str, company_field: CompanyField) -> ApiResult<Vec<Item>> {
    let payload: RawSearchPayload = serde_json::from_str(body).map_err(|error| {
        ApiError::MalformedPayload(format!("unexpected search payload: {error}"))
    })?;
    let entries = match payload {
        RawSearchPayload::Container { item } | RawSearchPayload::List(item) => item,
    };
    Ok(entries
        .into_iter()
        .map(|entry| entry.into_item(company_field))
        .collect())
}

/// Parse the body of a successful create call, if it describes a record.
pub fn parse_created_item(body: &str, company_field: CompanyField) -> ApiResult<Option<Item>> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|error| {
        ApiError::MalformedPayload(format!("create response is not JSON: {error}"))
    })?;
    Ok(serde_json::from_value::<RawEntry>(value)
        .ok()
        .map(|entry| entry.into_item(company_field)))
}

#[derive(Debug, Deserialize)]
struct CompanyList {
    #[serde(default)]
    company: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct LocationList {
    #[serde(default)]
    location: Vec<Option<String>>,
}

pub fn parse_company_list(body: &str) -> ApiResult<Vec<String>> {
    let list: CompanyList = serde_json::from_str(body).map_err(|error| {
        ApiError::MalformedPayload(format!("unexpected company list: {error}"))
    })?;
    Ok(non_empty_names(list.company))
}

pub fn parse_location_list(body: &str) -> ApiResult<Vec<String>> {
    let list: LocationList = serde_json::from_str(body).map_err(|error| {
        ApiError::MalformedPayload(format!("unexpected location list: {error}"))
    })?;
    Ok(non_empty_names(list.location))
}

fn non_empty_names(values: Vec<Option<String>>) -> Vec<String> {
    values
        .into_iter()
        .flatten()
        .filter(|value| !value.trim().is_empty())
        .collect()
}

/// Reply of the signup endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignUpReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Extract the server's `message` (or `error`) field from an error body.
pub fn parse_error_message(body: &str) -> Option<String> {
    let payload = serde_json::from_str::<ErrorBody>(body).ok()?;
    payload
        .message
        .or(payload.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}
