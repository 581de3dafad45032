//! Outbound adapters for the core ports

pub mod amadeus;
pub mod google;
pub mod open_meteo;
pub mod openai;

pub use amadeus::AmadeusClient;
pub use google::{GmailClient, GoogleCalendarClient, GoogleCalendarConnector};
pub use open_meteo::OpenMeteoClient;
pub use openai::OpenAIClient;
