//! Client for the Swiss Federal Tax Administration's ICTax securities
//! service.

#[cfg(test)]
mod tests;

use std::{collections::BTreeSet, time::Duration};

use anyhow::{Context, Result};
use engine::lookup::{Attributes, IdentifierAttributes, IdentifierLookup};
use serde::{Deserialize, Serialize};

use crate::{LookupEvent, LookupEvents};

pub const DEFAULT_URL: &str = "https://www.ictax.admin.ch/lsi/api/security";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
const LANGUAGE: &str = "it";
const MAX_ENTRIES: u32 = 5;

/// Body of a security query.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SecurityRequest {
    pub max: u32,
    pub fetch: u32,
    pub offset: u32,
    pub isin: String,
    pub year: String,
    pub lang: String,
}

impl SecurityRequest {
    pub fn new(isin: &str, year: i32) -> Self {
        Self {
            max: MAX_ENTRIES,
            fetch: MAX_ENTRIES,
            offset: 0,
            isin: isin.to_owned(),
            year: year.to_string(),
            lang: LANGUAGE.to_owned(),
        }
    }
}

/// Raw reply to a [SecurityRequest].
#[derive(Clone, Debug)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: String,
}

/// Transport carrying [SecurityRequest]s to the service.
pub trait SecurityService {
    fn query(&self, request: &SecurityRequest) -> Result<ServiceResponse>;
}

/// [SecurityService] over HTTPS.
pub struct HttpSecurityService {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpSecurityService {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .with_context(|| "building HTTP client")?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

impl SecurityService for HttpSecurityService {
    fn query(&self, request: &SecurityRequest) -> Result<ServiceResponse> {
        log::debug!("Querying {} for {request:?}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .with_context(|| format!("sending request for {}", request.isin))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .with_context(|| format!("reading response for {}", request.isin))?;
        Ok(ServiceResponse { status, body })
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ResponseError {
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response lists no securities")]
    NoEntries,
    #[error("response is for ISIN {found}, not {requested}")]
    IsinMismatch { requested: String, found: String },
}

#[derive(Deserialize)]
struct SecurityResponse {
    security: Vec<SecurityEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecurityEntry {
    isin: String,
    vn: serde_json::Value,
    institution: String,
    country_name: Option<String>,
    currency_name: Option<String>,
}

/// Extracts the attributes of `isin` from a service response.
///
/// When the response lists several securities, the first one is used.
pub fn parse_response(isin: &str, response: &ServiceResponse) -> Result<Attributes, ResponseError> {
    if response.status != 200 {
        return Err(ResponseError::Status(response.status));
    }
    let parsed: SecurityResponse = serde_json::from_str(&response.body)
        .map_err(|err| ResponseError::Malformed(err.to_string()))?;

    if parsed.security.len() > 1 {
        log::warn!("Multiple entries for {isin}: using the first one");
    }
    let entry = parsed
        .security
        .into_iter()
        .next()
        .ok_or(ResponseError::NoEntries)?;
    if entry.isin != isin {
        return Err(ResponseError::IsinMismatch {
            requested: isin.to_owned(),
            found: entry.isin,
        });
    }

    let value_number = match entry.vn {
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(number) => number.to_string(),
        other => {
            return Err(ResponseError::Malformed(format!(
                "unexpected value number {other}"
            )));
        }
    };

    Ok(Attributes {
        value_number: Some(value_number),
        name: Some(entry.institution),
        value: None,
        country: entry.country_name,
        currency: entry.currency_name,
    })
}

/// [IdentifierLookup] querying ICTax once per identifier, pausing between
/// consecutive queries.
pub struct IctaxLookup<S> {
    service: S,
    delay: Duration,
    events: Box<dyn LookupEvents>,
}

impl IctaxLookup<HttpSecurityService> {
    /// Creates a lookup against the public ICTax service.
    pub fn connect(events: Box<dyn LookupEvents>) -> Result<Self> {
        let service = HttpSecurityService::new(DEFAULT_URL, DEFAULT_TIMEOUT)?;
        Ok(Self::new(service, DEFAULT_DELAY, events))
    }
}

impl<S: SecurityService> IctaxLookup<S> {
    pub fn new(service: S, delay: Duration, events: Box<dyn LookupEvents>) -> Self {
        Self {
            service,
            delay,
            events,
        }
    }

    fn lookup_one(&self, isin: &str, as_of_year: i32) -> Option<Attributes> {
        log::info!("Querying security with ISIN {isin}");
        let request = SecurityRequest::new(isin, as_of_year);
        let response = match self.service.query(&request) {
            Ok(response) => response,
            Err(err) => {
                log::error!("Error querying ICTax for {isin}: {err:#}");
                return None;
            }
        };
        match parse_response(isin, &response) {
            Ok(attributes) => Some(attributes),
            Err(err) => {
                log::error!("Error in ICTax response for {isin}: {err}");
                log::debug!("Response body for {isin}: {}", response.body);
                None
            }
        }
    }
}

impl<S: SecurityService> IdentifierLookup for IctaxLookup<S> {
    fn resolve(&mut self, identifiers: &BTreeSet<String>, as_of_year: i32) -> IdentifierAttributes {
        let total = identifiers.len();
        let mut resolved = IdentifierAttributes::new();

        for (index, isin) in identifiers.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }

            let attributes = self.lookup_one(isin, as_of_year);
            self.events.on_event(LookupEvent::Progress {
                identifier: isin.clone(),
                resolved: attributes.is_some(),
                completed: index + 1,
                total,
            });
            if let Some(attributes) = attributes {
                resolved.insert(isin.clone(), attributes);
            }
        }

        self.events.on_event(LookupEvent::Completed);
        resolved
    }
}
