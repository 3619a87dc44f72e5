use std::sync::Arc;
use std::time::Duration;

use riskmap_common::catalog::PortCatalog;
use riskmap_common::network::target::{OsContext, Target};
use riskmap_core::network::tcp::TcpProber;
use riskmap_core::scanner::{self, PortScanner, ScanOptions};
use tokio_util::sync::CancellationToken;

use crate::util::{LOOPBACK, LoopbackPorts, catalog_of, closed_ports};

fn options() -> ScanOptions {
    ScanOptions {
        timeout: Duration::from_millis(500),
        concurrency: 4,
    }
}

/// Real sockets: open listeners interleaved with closed ports come back in
/// catalog order.
#[tokio::test]
async fn loopback_scan_reports_listeners_in_catalog_order() {
    let open = LoopbackPorts::bind(3).await;
    let open_ports = open.ports();
    let closed = closed_ports(3).await;

    let order = vec![
        closed[0],
        open_ports[2],
        closed[1],
        open_ports[0],
        open_ports[1],
        closed[2],
    ];
    let catalog = catalog_of(&order);
    let target = Target::new(LOOPBACK, OsContext::Linux);

    let result = scanner::scan(&target, &catalog, &options()).await;

    let found: Vec<u16> = result.open_ports.iter().map(|p| p.port).collect();
    assert_eq!(found, vec![open_ports[2], open_ports[0], open_ports[1]]);
    assert_eq!(result.probed, 6);
    assert!(!result.cancelled);
}

#[tokio::test]
async fn loopback_scan_with_nothing_listening_is_empty() {
    let catalog = catalog_of(&closed_ports(5).await);
    let target = Target::new(LOOPBACK, OsContext::Mac);

    let result = scanner::scan(&target, &catalog, &options()).await;

    assert!(result.open_ports.is_empty());
    assert_eq!(result.probed, 5);
}

#[tokio::test]
async fn repeated_scans_are_identical() {
    let open = LoopbackPorts::bind(4).await;
    let mut order = open.ports();
    order.extend(closed_ports(4).await);
    order.reverse();
    let catalog = catalog_of(&order);
    let target = Target::new(LOOPBACK, OsContext::Windows);
    let scanner = PortScanner::new(Arc::new(TcpProber), options());

    let first = scanner.scan(&target, &catalog, &CancellationToken::new()).await;
    for _ in 0..3 {
        let again = scanner.scan(&target, &catalog, &CancellationToken::new()).await;
        assert_eq!(again.open_ports, first.open_ports);
    }
    assert_eq!(first.open_ports.len(), 4);
}

#[tokio::test]
async fn empty_catalog_returns_empty_result() {
    let catalog = PortCatalog::new(Vec::new()).unwrap();
    let target = Target::new(LOOPBACK, OsContext::Linux);

    let result = scanner::scan(&target, &catalog, &options()).await;

    assert!(result.open_ports.is_empty());
    assert_eq!(result.probed, 0);
}
