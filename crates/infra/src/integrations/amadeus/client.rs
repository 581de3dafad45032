//! Amadeus flight offer search

use async_trait::async_trait;
use calcopilot_common::{Clock, SystemClock};
use calcopilot_core::FlightSearchPort;
use calcopilot_domain::{AmadeusConfig, CopilotError, FlightOffer, FlightQuery, Result};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::token_cache::TokenCache;
use super::types::{ErrorResponse, LocationsResponse, OffersResponse, TokenResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

const MISSING_CREDENTIALS: &str =
    "Amadeus API credentials are not configured (AMADEUS_API_KEY / AMADEUS_API_SECRET).";
const AUTH_FAILED: &str = "Amadeus authentication failed.";
const MAX_OFFERS: &str = "5";

struct Credentials {
    key: String,
    secret: String,
}

/// Flight search against the Amadeus REST API
pub struct AmadeusClient<C: Clock = SystemClock> {
    http: HttpClient,
    base_url: String,
    credentials: Option<Credentials>,
    tokens: TokenCache<C>,
}

impl AmadeusClient<SystemClock> {
    pub fn from_config(config: &AmadeusConfig, http: HttpClient) -> Self {
        Self::with_clock(config, http, SystemClock)
    }
}

impl<C: Clock> AmadeusClient<C> {
    pub fn with_clock(config: &AmadeusConfig, http: HttpClient, clock: C) -> Self {
        let credentials = match (config.api_key.as_deref(), config.api_secret.as_deref()) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(Credentials { key: key.to_string(), secret: secret.to_string() })
            }
            _ => None,
        };
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            tokens: TokenCache::with_clock(clock, config.token_refresh_margin_secs),
        }
    }

    /// Whether credentials were supplied at all.
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn access_token(&self) -> Result<String> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or_else(|| CopilotError::Config(MISSING_CREDENTIALS.to_string()))?;

        if let Some(token) = self.tokens.get(&creds.key) {
            return Ok(token);
        }

        debug!("requesting Amadeus access token");
        let builder = self
            .http
            .request(Method::POST, format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", creds.key.as_str()),
                ("client_secret", creds.secret.as_str()),
            ]);

        let response = self.http.send_replayable(builder).await?;
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "Amadeus token request rejected");
            return Err(CopilotError::Auth(AUTH_FAILED.to_string()));
        }
        let token: TokenResponse =
            response.json().await.map_err(|_| CopilotError::Auth(AUTH_FAILED.to_string()))?;

        self.tokens.insert(&creds.key, token.access_token.clone(), token.expires_in);
        info!(expires_in = token.expires_in, "Amadeus access token refreshed");
        Ok(token.access_token)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let token = self.access_token().await?;
        let builder = self
            .http
            .request(Method::GET, format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .query(query);
        self.http.send(builder).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(response.json::<T>().await.map_err(InfraError::from)?)
}

#[async_trait]
impl<C: Clock + 'static> FlightSearchPort for AmadeusClient<C> {
    async fn resolve_location(&self, query: &str) -> Result<String> {
        let response = self
            .get(
                "/v1/reference-data/locations",
                &[
                    ("keyword", query.to_string()),
                    ("subType", "AIRPORT,CITY".to_string()),
                    ("page[limit]", "1".to_string()),
                ],
            )
            .await?;

        let not_found = || CopilotError::NotFound(format!("Could not find an airport for \"{query}\"."));
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), keyword = query, "location lookup failed");
            return Err(not_found());
        }

        let locations: LocationsResponse = read_json(response).await?;
        let code = locations
            .data
            .into_iter()
            .find_map(|location| location.iata_code)
            .filter(|code| !code.is_empty())
            .ok_or_else(not_found)?;

        debug!(keyword = query, iata = %code, "resolved location");
        Ok(code)
    }

    async fn search_offers(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>> {
        let mut params = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.format("%Y-%m-%d").to_string()),
            ("adults", query.adults.to_string()),
            ("currencyCode", query.currency.clone()),
            ("max", MAX_OFFERS.to_string()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
        }

        debug!(origin = %query.origin, destination = %query.destination, "searching flight offers");
        let response = self.get("/v2/shopping/flight-offers", &params).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.errors.into_iter().next())
                .and_then(|entry| entry.detail)
                .unwrap_or_else(|| "Unknown Amadeus error".to_string());
            warn!(status, %detail, "flight search failed");
            return Err(CopilotError::Upstream(format!("Flight search failed: {detail}")));
        }

        let offers: OffersResponse = read_json(response).await?;
        Ok(offers.data.into_iter().take(5).map(FlightOffer::from).collect())
    }
}
