use actix_web::HttpRequest;

/// Key used to throttle a caller. Proxy headers are honoured only when
/// `trust_x_forwarded_for` is set, otherwise the socket peer is used.
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> String {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }

        if let Some(real_ip) = req.headers().get("x-real-ip").and_then(|v| v.to_str().ok()) {
            return real_ip.trim().to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn request() -> HttpRequest {
        TestRequest::default()
            .peer_addr("10.0.0.7:5555".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.9, 10.0.0.1"))
            .to_http_request()
    }

    #[test]
    fn ignores_forwarded_header_unless_trusted() {
        assert_eq!(get_client_ip(&request(), false), "10.0.0.7");
    }

    #[test]
    fn uses_first_forwarded_hop_when_trusted() {
        assert_eq!(get_client_ip(&request(), true), "203.0.113.9");
    }
}
