//! Per client IP rate limiting for the authentication endpoints.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{extract::ConnectInfo, http::Request};
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use tower_governor::{governor::GovernorConfigBuilder, GovernorError, GovernorLayer};

/// Seconds between replenished requests.
const AUTH_REPLENISH_SECS: u64 = 6;
/// Requests allowed in a burst before throttling starts.
const AUTH_BURST: u32 = 5;

/// Keys requests by client IP.
///
/// The socket address is used unless `trust_proxy_headers` is set, in which case
/// `X-Forwarded-For`, then `X-Real-IP`, win over it. Requests without any address
/// share the unspecified address bucket.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req, self.trust_proxy_headers))
    }
}

pub fn client_ip<T>(req: &Request<T>, trust_proxy_headers: bool) -> IpAddr {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(req) {
            return ip;
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
    let headers = req.headers();

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
}

pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Limiter for `/api/auth`: one request every 6 seconds per IP, bursts of 5.
///
/// Returns `None` if the limiter configuration is rejected.
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor { trust_proxy_headers })
        .per_second(AUTH_REPLENISH_SECS)
        .burst_size(AUTH_BURST)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(config)))
}
