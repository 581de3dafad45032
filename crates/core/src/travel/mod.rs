//! Travel helpers behind the flight and weather tools

pub mod flights;
pub mod weather;

pub use flights::{carrier_name, format_iso_duration, is_iata_code, kayak_link, summarize_offer};
pub use weather::{build_packing_list, condition_label, forecast_days};
