use std::net::Ipv4Addr;
use std::net::Ipv6Addr;

use serde::Serialize;


/// The network context of a traced service.
///
/// Endpoints are attached to every annotation of a span and render as the
/// Zipkin v1 endpoint object, omitting unknown addresses and ports.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv4: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv6: Option<Ipv6Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

impl Endpoint {
    /// Creates an endpoint with only a service name.
    pub fn new<S: Into<String>>(service_name: S) -> Endpoint {
        Endpoint {
            service_name: service_name.into(),
            ipv4: None,
            ipv6: None,
            port: None,
        }
    }
}

impl Endpoint {
    /// Sets the IPv4 address of the service.
    pub fn ipv4(mut self, ipv4: Ipv4Addr) -> Self {
        self.ipv4 = Some(ipv4);
        self
    }

    /// Sets the IPv6 address of the service.
    pub fn ipv6(mut self, ipv6: Ipv6Addr) -> Self {
        self.ipv6 = Some(ipv6);
        self
    }

    /// Sets the port the service listens on.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn ipv4_addr(&self) -> Option<Ipv4Addr> {
        self.ipv4
    }

    pub fn ipv6_addr(&self) -> Option<Ipv6Addr> {
        self.ipv6
    }

    pub fn port_number(&self) -> Option<u16> {
        self.port
    }
}


#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::net::Ipv6Addr;

    use super::Endpoint;

    fn assert_json(endpoint: Endpoint, expected: &str) {
        let json = serde_json::to_string(&endpoint).unwrap();
        assert_eq!(json, expected);
    }

    #[test]
    fn service_name_only() {
        assert_json(Endpoint::new("checkout"), r#"{"serviceName":"checkout"}"#);
    }

    #[test]
    fn full_endpoint() {
        let endpoint = Endpoint::new("checkout")
            .ipv4(Ipv4Addr::new(10, 0, 0, 1))
            .ipv6(Ipv6Addr::LOCALHOST)
            .port(8080);
        assert_json(
            endpoint,
            r#"{"serviceName":"checkout","ipv4":"10.0.0.1","ipv6":"::1","port":8080}"#
        );
    }

    #[test]
    fn accessors() {
        let endpoint = Endpoint::new("db").port(5432);
        assert_eq!(endpoint.service_name(), "db");
        assert_eq!(endpoint.port_number(), Some(5432));
        assert_eq!(endpoint.ipv4_addr(), None);
        assert_eq!(endpoint.ipv6_addr(), None);
    }
}
