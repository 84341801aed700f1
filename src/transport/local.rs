//! Local listener bootstrap utilities

use crate::common::AppError;
use std::net::{Ipv4Addr, SocketAddr, TcpListener};

/// Binds a non-blocking std listener ready to hand to tokio.
pub fn bind_listener(addr: SocketAddr) -> Result<TcpListener, AppError> {
    let listener = TcpListener::bind(addr).map_err(|source| AppError::Bind { addr, source })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| AppError::Bind { addr, source })?;
    Ok(listener)
}

/// Binds `addr` and hands the socket to tokio. Must be called inside a runtime.
pub fn bind_serving_listener(
    addr: SocketAddr,
) -> Result<(SocketAddr, tokio::net::TcpListener), AppError> {
    let listener = bind_listener(addr)?;
    let local = listener
        .local_addr()
        .map_err(|source| AppError::Bind { addr, source })?;
    let listener = tokio::net::TcpListener::from_std(listener)
        .map_err(|source| AppError::Bind { addr, source })?;
    Ok((local, listener))
}

/// Returns `configured` when non-zero, otherwise asks the OS for a free
/// ephemeral port on `ip` and releases it again.
pub fn pick_port(ip: Ipv4Addr, configured: u16) -> Result<u16, AppError> {
    if configured != 0 {
        return Ok(configured);
    }
    let addr = SocketAddr::from((ip, 0));
    let probe = TcpListener::bind(addr).map_err(|source| AppError::Bind { addr, source })?;
    let port = probe
        .local_addr()
        .map_err(|source| AppError::Bind { addr, source })?
        .port();
    Ok(port)
}

/// `http://<ip>:<port>/`
pub fn access_uri(ip: Ipv4Addr, port: u16) -> String {
    format!("http://{ip}:{port}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_port_is_used_verbatim() {
        assert_eq!(pick_port(Ipv4Addr::LOCALHOST, 8123).expect("port"), 8123);
    }

    #[test]
    fn ephemeral_port_is_free_after_pick() {
        let port = pick_port(Ipv4Addr::LOCALHOST, 0).expect("port");
        assert_ne!(port, 0);
        bind_listener(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).expect("rebind");
    }

    #[test]
    fn bind_conflict_is_bind_error() {
        let held = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = held.local_addr().expect("addr");
        let err = bind_listener(addr).expect_err("port already held");
        assert!(matches!(err, AppError::Bind { .. }));
    }

    #[tokio::test]
    async fn serving_listener_reports_assigned_port() {
        let (addr, listener) =
            bind_serving_listener(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).expect("bind");
        assert_ne!(addr.port(), 0);
        assert_eq!(listener.local_addr().expect("addr"), addr);
    }

    #[test]
    fn access_uri_shape() {
        assert_eq!(
            access_uri(Ipv4Addr::new(192, 168, 0, 7), 40123),
            "http://192.168.0.7:40123/"
        );
    }
}
