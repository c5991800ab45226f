use axum::http::HeaderMap;

use sitesentry_tracking::ClientContext;

/// Build the request context from the fronting proxy's headers.
///
/// These headers are trusted input: the service sits behind an edge that
/// strips client-supplied values and injects its own. Geo fields use the
/// Cloudflare header names. Absent values become `"unknown"` (coordinates:
/// `None`), and an unknown IP also collapses all such clients into the
/// limiter's shared bucket.
pub fn client_context(headers: &HeaderMap) -> ClientContext {
    let ip = header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(str::trim).map(str::to_string))
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip").map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    ClientContext {
        ip,
        user_agent: header_or_unknown(headers, "user-agent"),
        referrer: header_str(headers, "referer").map(str::to_string),
        country: header_or_unknown(headers, "cf-ipcountry"),
        city: header_or_unknown(headers, "cf-ipcity"),
        region: header_or_unknown(headers, "cf-region"),
        latitude: header_str(headers, "cf-latitude").and_then(|v| v.parse().ok()),
        longitude: header_str(headers, "cf-longitude").and_then(|v| v.parse().ok()),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_or_unknown(headers: &HeaderMap, name: &str) -> String {
    header_str(headers, name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn absent_headers_default_to_unknown() {
        let ctx = client_context(&HeaderMap::new());
        assert_eq!(ctx.ip, "unknown");
        assert_eq!(ctx.user_agent, "unknown");
        assert_eq!(ctx.country, "unknown");
        assert!(ctx.referrer.is_none());
        assert!(ctx.latitude.is_none());
        assert!(ctx.longitude.is_none());
    }

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_context(&headers).ip, "203.0.113.9");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_context(&headers).ip, "198.51.100.4");
    }

    #[test]
    fn geo_headers_are_picked_up() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-ipcountry", HeaderValue::from_static("DE"));
        headers.insert("cf-ipcity", HeaderValue::from_static("Berlin"));
        headers.insert("cf-latitude", HeaderValue::from_static("52.52"));
        headers.insert("cf-longitude", HeaderValue::from_static("13.405"));

        let ctx = client_context(&headers);
        assert_eq!(ctx.country, "DE");
        assert_eq!(ctx.city, "Berlin");
        assert_eq!(ctx.latitude, Some(52.52));
        assert_eq!(ctx.longitude, Some(13.405));
    }

    #[test]
    fn malformed_coordinates_become_none() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-latitude", HeaderValue::from_static("not-a-number"));
        assert!(client_context(&headers).latitude.is_none());
    }
}
