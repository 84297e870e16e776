//! Best-effort credit balance lookup against the endpoint's key-info route.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::utils::url::key_info_url;

/// Remaining budget expressed in thousandths of a budget unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credits(pub u64);

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        f.write_str(&grouped)
    }
}

#[derive(Debug, Default, Deserialize)]
struct KeyInfoResponse {
    #[serde(default)]
    info: Option<KeyInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct KeyInfo {
    #[serde(default)]
    max_budget: Option<Value>,
    #[serde(default)]
    spend: Option<Value>,
}

/// Numbers may arrive as JSON numbers or numeric strings; anything else is zero.
fn lenient_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite()).unwrap_or(0.0)
}

fn credits_from_info(info: &KeyInfo) -> Credits {
    let budget = lenient_number(info.max_budget.as_ref());
    let spend = lenient_number(info.spend.as_ref());
    let remaining = budget - spend;
    Credits((remaining.max(0.0) * 1000.0).round() as u64)
}

/// Parses a key-info body. A body without `info` counts as zero credits.
pub fn parse_key_info(body: &str) -> Option<Credits> {
    let response: KeyInfoResponse = serde_json::from_str(body).ok()?;
    Some(credits_from_info(&response.info.unwrap_or_default()))
}

/// Fetches the remaining credits. Every failure is swallowed and yields `None`.
pub async fn fetch_balance(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Option<Credits> {
    let url = key_info_url(base_url);
    let response = match client.get(&url).bearer_auth(api_key).send().await {
        Ok(response) => response,
        Err(err) => {
            debug!(%url, "balance check failed: {err}");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(%url, status = response.status().as_u16(), "balance check rejected");
        return None;
    }

    let body = response.text().await.ok()?;
    let credits = parse_key_info(&body);
    if credits.is_none() {
        debug!(%url, "balance response was not valid JSON");
    }
    credits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{serve_once, test_client};

    #[test]
    fn credits_group_thousands() {
        assert_eq!(Credits(0).to_string(), "0");
        assert_eq!(Credits(999).to_string(), "999");
        assert_eq!(Credits(1000).to_string(), "1,000");
        assert_eq!(Credits(12_345_678).to_string(), "12,345,678");
    }

    #[test]
    fn remaining_budget_is_scaled_and_rounded() {
        let credits = parse_key_info(r#"{"info":{"max_budget":10.0,"spend":2.3456}}"#);
        assert_eq!(credits, Some(Credits(7654)));
    }

    #[test]
    fn string_values_and_gaps_are_tolerated() {
        assert_eq!(
            parse_key_info(r#"{"info":{"max_budget":"5","spend":null}}"#),
            Some(Credits(5000))
        );
        assert_eq!(parse_key_info(r#"{"info":{"spend":1}}"#), Some(Credits(0)));
        assert_eq!(parse_key_info(r#"{}"#), Some(Credits(0)));
        assert_eq!(parse_key_info("oops"), None);
    }

    #[test]
    fn overspend_clamps_to_zero() {
        let credits = parse_key_info(r#"{"info":{"max_budget":1,"spend":3}}"#);
        assert_eq!(credits, Some(Credits(0)));
    }

    #[tokio::test]
    async fn fetch_balance_queries_key_info_route() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"info":{"max_budget":2,"spend":0.5}}"#).await;

        let credits = fetch_balance(&test_client(), &format!("{base_url}/v1/"), "sk-test").await;
        assert_eq!(credits, Some(Credits(1500)));

        let captured = server.await.expect("server task").expect("server ok");
        assert_eq!(captured.request_line, "GET /key/info HTTP/1.1");
        assert_eq!(captured.header("authorization"), Some("Bearer sk-test"));
    }

    #[tokio::test]
    async fn fetch_balance_ignores_failures() {
        let (base_url, server) = serve_once("403 Forbidden", r#"{"error":"nope"}"#).await;
        assert_eq!(fetch_balance(&test_client(), &base_url, "sk").await, None);
        server.await.expect("server task").expect("server ok");
    }
}
