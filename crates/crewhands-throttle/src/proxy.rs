//! Proxy rotation and health probing.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ThrottleError;

/// One egress route, parsed from a proxy URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyRoute {
    raw: String,
    url: Url,
}

impl ProxyRoute {
    pub fn parse(raw: &str) -> Result<Self, ThrottleError> {
        let invalid = |message: String| ThrottleError::InvalidRoute {
            route: raw.to_string(),
            message,
        };
        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if !matches!(url.scheme(), "http" | "https" | "socks5") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    /// The route as configured, credentials included.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `scheme://host:port` for the browser's proxy flag. Credentials are
    /// dropped; Chrome does not accept them on the command line.
    pub fn browser_server(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port_or_known_default() {
            Some(port) => format!("{}://{}:{}", self.url.scheme(), host, port),
            None => format!("{}://{}", self.url.scheme(), host),
        }
    }

    pub fn credentials(&self) -> Option<(String, String)> {
        if self.url.username().is_empty() {
            return None;
        }
        Some((
            self.url.username().to_string(),
            self.url.password().unwrap_or_default().to_string(),
        ))
    }
}

/// Routes are logged without their credentials.
impl fmt::Display for ProxyRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.browser_server())
    }
}

/// Result of the most recent probe of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyHealth {
    pub tested_at: DateTime<Utc>,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Egress address reported by the probe endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pool summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub total: usize,
    pub failed: usize,
    pub healthy: usize,
    pub health: BTreeMap<String, ProxyHealth>,
}

#[derive(Debug, Default)]
struct Pool {
    routes: Vec<ProxyRoute>,
    cursor: usize,
    failed: HashSet<String>,
    health: BTreeMap<String, ProxyHealth>,
}

/// Round-robin rotation over egress routes, skipping failed ones.
///
/// Shared across adapter tasks; all state sits behind one mutex that is
/// never held across an await.
#[derive(Debug)]
pub struct ProxyRotator {
    pool: Mutex<Pool>,
    probe_timeout: Duration,
}

impl ProxyRotator {
    pub fn new(routes: Vec<ProxyRoute>) -> Self {
        Self {
            pool: Mutex::new(Pool {
                routes,
                ..Default::default()
            }),
            probe_timeout: Duration::from_secs(10),
        }
    }

    /// Parse every route up front; one bad route rejects the pool.
    pub fn from_urls(urls: &[String]) -> Result<Self, ThrottleError> {
        let routes = urls
            .iter()
            .map(|u| ProxyRoute::parse(u))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(routes))
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn len(&self) -> usize {
        self.pool.lock().routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.lock().routes.is_empty()
    }

    /// Next healthy route in rotation. When every route has failed the
    /// failed set is cleared and the first route is returned.
    pub fn next(&self) -> Option<ProxyRoute> {
        let mut pool = self.pool.lock();
        let count = pool.routes.len();
        if count == 0 {
            return None;
        }

        for _ in 0..count {
            let index = pool.cursor;
            pool.cursor = (pool.cursor + 1) % count;
            let route = &pool.routes[index];
            if !pool.failed.contains(route.as_str()) {
                return Some(route.clone());
            }
        }

        warn!("All proxies marked as failed, resetting failed list");
        pool.failed.clear();
        pool.routes.first().cloned()
    }

    pub fn mark_failed(&self, route: &ProxyRoute) {
        if self.pool.lock().failed.insert(route.as_str().to_string()) {
            warn!("Proxy marked as failed: {}", route);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_failed(&self, route: &ProxyRoute) -> bool {
        self.pool.lock().failed.contains(route.as_str())
    }

    /// Probe `route` by fetching `probe_url` through it. Records the result
    /// and marks the route failed when unreachable.
    pub async fn test_route(&self, route: &ProxyRoute, probe_url: &str) -> bool {
        let started = Instant::now();
        let outcome = self.probe(route, probe_url).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        let health = match outcome {
            Ok(origin) => {
                debug!("Proxy {} reachable in {}ms", route, latency_ms);
                ProxyHealth {
                    tested_at: Utc::now(),
                    reachable: true,
                    latency_ms: Some(latency_ms),
                    origin,
                    error: None,
                }
            }
            Err(e) => ProxyHealth {
                tested_at: Utc::now(),
                reachable: false,
                latency_ms: None,
                origin: None,
                error: Some(e),
            },
        };

        let reachable = health.reachable;
        self.pool
            .lock()
            .health
            .insert(route.to_string(), health);
        if !reachable {
            self.mark_failed(route);
        }
        reachable
    }

    async fn probe(&self, route: &ProxyRoute, probe_url: &str) -> Result<Option<String>, String> {
        let proxy = reqwest::Proxy::all(route.as_str()).map_err(|e| e.to_string())?;
        let client = reqwest::Client::builder()
            .proxy(proxy)
            .timeout(self.probe_timeout)
            .build()
            .map_err(|e| format!("probe client: {}", e))?;

        let response = client
            .get(probe_url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("probe returned status {}", response.status()));
        }

        let origin = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("origin").and_then(|o| o.as_str()).map(str::to_string));
        Ok(origin)
    }

    /// Probe every route concurrently. Returns the number of healthy routes.
    pub async fn test_all(&self, probe_url: &str) -> usize {
        let routes = self.pool.lock().routes.clone();
        info!("Testing {} proxies...", routes.len());
        let results = join_all(routes.iter().map(|route| self.test_route(route, probe_url))).await;
        let healthy = results.into_iter().filter(|ok| *ok).count();
        info!("{}/{} proxies are healthy", healthy, routes.len());
        healthy
    }

    pub fn health_status(&self) -> HealthStatus {
        let pool = self.pool.lock();
        HealthStatus {
            total: pool.routes.len(),
            failed: pool.failed.len(),
            healthy: pool.routes.len().saturating_sub(pool.failed.len()),
            health: pool.health.clone(),
        }
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
