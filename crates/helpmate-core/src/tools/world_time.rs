use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::{json, Value};
use url::Url;

use super::http::{endpoint, malformed, pointer_str, Fetch};
use super::{ParamSpec, Tool, ToolArgs};
use crate::error::ToolError;

/// Cities the tool can answer for, with their IANA zone.
const CITY_ZONES: &[(&str, &str)] = &[
    ("new york", "America/New_York"),
    ("los angeles", "America/Los_Angeles"),
    ("chicago", "America/Chicago"),
    ("seattle", "America/Los_Angeles"),
    ("denver", "America/Denver"),
    ("london", "Europe/London"),
    ("paris", "Europe/Paris"),
    ("berlin", "Europe/Berlin"),
    ("tokyo", "Asia/Tokyo"),
    ("sydney", "Australia/Sydney"),
    ("dubai", "Asia/Dubai"),
    ("mumbai", "Asia/Kolkata"),
    ("singapore", "Asia/Singapore"),
    ("hong kong", "Asia/Hong_Kong"),
];

/// IANA zone for a city name, matched case-insensitively.
pub fn zone_for(city: &str) -> Option<&'static str> {
    let key = city.trim().to_lowercase();
    CITY_ZONES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, zone)| *zone)
}

fn known_cities() -> String {
    CITY_ZONES
        .iter()
        .map(|(name, _)| title_case(name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Local time lookup via worldtimeapi.org.
pub struct WorldTimeTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl WorldTimeTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for WorldTimeTool {
    fn name(&self) -> &str {
        "GetWorldTime"
    }

    fn description(&self) -> &str {
        "Get the current local time and date in a major world city."
    }

    fn group(&self) -> &str {
        "World Time"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::string(
            "city",
            "City name, e.g. 'Tokyo', 'London', 'New York'",
        )]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let city = args.str("city")?;
        let zone = zone_for(city).ok_or_else(|| {
            ToolError::NotFound(format!(
                "time zone for '{city}' is not known; supported cities: {}",
                known_cities()
            ))
        })?;

        let mut segments = vec!["api", "timezone"];
        segments.extend(zone.split('/'));
        let url = endpoint(&self.base, &segments, &[]);
        let doc = self.fetcher.get_json(url.clone()).await?;

        let raw = pointer_str(&doc, "/datetime", &url)?;
        let local = DateTime::parse_from_rfc3339(raw).map_err(|_| malformed(&url, "/datetime"))?;

        Ok(json!({
            "city": title_case(&city.to_lowercase()),
            "timezone": zone,
            "datetime": raw,
            "utc_offset": local.format("%:z").to_string(),
            "time": local.format("%I:%M:%S %p").to_string(),
            "date": local.format("%A, %B %d, %Y").to_string(),
        }))
    }
}
