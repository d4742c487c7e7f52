use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::http::{endpoint, pointer_number, pointer_str, Fetch};
use super::{ParamSpec, Tool, ToolArgs};
use crate::error::ToolError;

const FORECAST_DAYS: usize = 3;
/// wttr.in reports eight 3-hour slots per day; slot 4 is 12:00.
const MIDDAY_SLOT: usize = 4;

/// Fetch the wttr.in `j1` report for a city.
async fn fetch_report(fetcher: &dyn Fetch, base: &Url, city: &str) -> Result<(Value, Url), ToolError> {
    let url = endpoint(base, &[city], &[("format", "j1")]);
    let doc = fetcher.get_json(url.clone()).await?;
    Ok((doc, url))
}

fn city_param() -> Vec<ParamSpec> {
    vec![ParamSpec::string("city", "The name of the city, e.g. 'Paris'")]
}

/// Current conditions via wttr.in.
pub struct CurrentWeatherTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl CurrentWeatherTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for CurrentWeatherTool {
    fn name(&self) -> &str {
        "GetCurrentWeather"
    }

    fn description(&self) -> &str {
        "Get the current real weather for any city in the world: temperature, \
         condition, humidity and wind."
    }

    fn group(&self) -> &str {
        "Weather"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        city_param()
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let city = args.str("city")?;
        let (doc, url) = fetch_report(self.fetcher.as_ref(), &self.base, city).await?;

        let current = "/current_condition/0";
        let area = "/nearest_area/0";
        Ok(json!({
            "location": pointer_str(&doc, &format!("{area}/areaName/0/value"), &url)?,
            "country": pointer_str(&doc, &format!("{area}/country/0/value"), &url)?,
            "temperature_f": pointer_number(&doc, &format!("{current}/temp_F"), &url)?,
            "temperature_c": pointer_number(&doc, &format!("{current}/temp_C"), &url)?,
            "feels_like_f": pointer_number(&doc, &format!("{current}/FeelsLikeF"), &url)?,
            "condition": pointer_str(&doc, &format!("{current}/weatherDesc/0/value"), &url)?.trim(),
            "humidity": pointer_number(&doc, &format!("{current}/humidity"), &url)?,
            "wind_mph": pointer_number(&doc, &format!("{current}/windspeedMiles"), &url)?,
            "wind_direction": pointer_str(&doc, &format!("{current}/winddir16Point"), &url)?,
        }))
    }
}

/// Three-day forecast via wttr.in.
pub struct WeatherForecastTool {
    fetcher: Arc<dyn Fetch>,
    base: Url,
}

impl WeatherForecastTool {
    pub fn new(fetcher: Arc<dyn Fetch>, base: Url) -> Self {
        Self { fetcher, base }
    }
}

#[async_trait]
impl Tool for WeatherForecastTool {
    fn name(&self) -> &str {
        "GetWeatherForecast"
    }

    fn description(&self) -> &str {
        "Get a 3-day weather forecast for any city: daily low/high, midday \
         condition and chance of rain."
    }

    fn group(&self) -> &str {
        "Weather"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        city_param()
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let city = args.str("city")?;
        let (doc, url) = fetch_report(self.fetcher.as_ref(), &self.base, city).await?;

        let location = pointer_str(&doc, "/nearest_area/0/areaName/0/value", &url)?;
        let days = doc
            .get("weather")
            .and_then(Value::as_array)
            .ok_or_else(|| super::http::malformed(&url, "/weather"))?;

        let mut forecast = Vec::with_capacity(FORECAST_DAYS);
        for day in days.iter().take(FORECAST_DAYS) {
            let hourly_len = day
                .get("hourly")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            if hourly_len == 0 {
                return Err(super::http::malformed(&url, "/weather/*/hourly/0"));
            }
            let slot = if hourly_len > MIDDAY_SLOT { MIDDAY_SLOT } else { 0 };
            let midday = format!("/hourly/{slot}");
            forecast.push(json!({
                "date": pointer_str(day, "/date", &url)?,
                "min_temp_f": pointer_number(day, "/mintempF", &url)?,
                "max_temp_f": pointer_number(day, "/maxtempF", &url)?,
                "condition": pointer_str(day, &format!("{midday}/weatherDesc/0/value"), &url)?.trim(),
                "chance_of_rain": pointer_number(day, &format!("{midday}/chanceofrain"), &url)?,
            }));
        }

        Ok(json!({
            "location": location,
            "days": forecast,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFetcher;
    use crate::tools::http::base_url;

    fn hour(desc: &str, rain: &str) -> Value {
        json!({"weatherDesc": [{"value": desc}], "chanceofrain": rain})
    }

    fn report() -> Value {
        let hours: Vec<Value> = (0..8)
            .map(|i| if i == 4 { hour("Light rain", "80") } else { hour("Clear", "0") })
            .collect();
        json!({
            "current_condition": [{
                "temp_F": "64", "temp_C": "18", "FeelsLikeF": "63",
                "weatherDesc": [{"value": "Cloudy "}],
                "humidity": "72", "windspeedMiles": "9", "winddir16Point": "SW"
            }],
            "nearest_area": [{
                "areaName": [{"value": "Paris"}],
                "country": [{"value": "France"}]
            }],
            "weather": [
                {"date": "2026-10-17", "mintempF": "50", "maxtempF": "66", "hourly": hours.clone()},
                {"date": "2026-10-18", "mintempF": "48", "maxtempF": "61", "hourly": [hour("Sunny", "5")]},
                {"date": "2026-10-19", "mintempF": "47", "maxtempF": "60", "hourly": hours.clone()},
                {"date": "2026-10-20", "mintempF": "45", "maxtempF": "59", "hourly": hours}
            ]
        })
    }

    fn args(v: Value) -> ToolArgs {
        ToolArgs::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn current_weather_is_normalized() {
        let stub = StubFetcher::json(report());
        let tool = CurrentWeatherTool::new(stub.clone(), base_url("https://wttr.in").unwrap());
        let payload = tool.invoke(&args(json!({"city": "Paris"}))).await.unwrap();

        assert_eq!(payload["location"], "Paris");
        assert_eq!(payload["temperature_c"], 18);
        assert_eq!(payload["condition"], "Cloudy");
        assert_eq!(payload["humidity"], 72);
        assert_eq!(payload["wind_direction"], "SW");
        assert_eq!(stub.requests()[0].as_str(), "https://wttr.in/Paris?format=j1");
    }

    #[tokio::test]
    async fn forecast_takes_three_days_at_midday() {
        let stub = StubFetcher::json(report());
        let tool = WeatherForecastTool::new(stub, base_url("https://wttr.in").unwrap());
        let payload = tool.invoke(&args(json!({"city": "Paris"}))).await.unwrap();

        let days = payload["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0]["condition"], "Light rain");
        assert_eq!(days[0]["chance_of_rain"], 80);
        // a day with a single slot falls back to it
        assert_eq!(days[1]["condition"], "Sunny");
        assert_eq!(days[2]["date"], "2026-10-19");
    }

    #[tokio::test]
    async fn blank_city_is_rejected_without_fetching() {
        let stub = StubFetcher::json(report());
        let tool = CurrentWeatherTool::new(stub.clone(), base_url("https://wttr.in").unwrap());
        let err = tool.invoke(&args(json!({"city": "  "}))).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn unexpected_shape_is_upstream_failure() {
        let stub = StubFetcher::json(json!({"error": "Unknown location"}));
        let tool = CurrentWeatherTool::new(stub, base_url("https://wttr.in").unwrap());
        let err = tool.invoke(&args(json!({"city": "Atlantis"}))).await.unwrap_err();
        assert_eq!(err.kind(), "upstream_unavailable");
    }

    #[tokio::test]
    async fn timeout_propagates_as_tool_error() {
        let stub = StubFetcher::failing(ToolError::UpstreamTimeout {
            service: "wttr.in".into(),
            timeout: std::time::Duration::from_secs(10),
        });
        let tool = CurrentWeatherTool::new(stub, base_url("https://wttr.in").unwrap());
        let err = tool.invoke(&args(json!({"city": "Paris"}))).await.unwrap_err();
        assert_eq!(err.kind(), "upstream_timeout");
    }
}
