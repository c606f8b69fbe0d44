#![allow(clippy::unwrap_used)]
// End-to-end fleet polls against wiremock NX-API endpoints.

use std::net::TcpListener;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nxtop_core::{
    AliasTable, Credentials, DeviceId, DeviceStatus, Fleet, FleetConfig, NxApiSource,
    RankedEntry, Scheme,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config() -> FleetConfig {
    let mut config = FleetConfig::new(Credentials::new("admin", "admin".to_string()));
    config.scheme = Scheme::Http;
    config.timeout = Duration::from_secs(2);
    config
}

fn show_interface(rows: serde_json::Value) -> serde_json::Value {
    json!({
        "ins_api": {
            "type": "cli_show",
            "version": "1.2",
            "sid": "eoc",
            "outputs": { "output": {
                "input": "show interface",
                "msg": "Success",
                "code": "200",
                "body": { "TABLE_interface": { "ROW_interface": rows } }
            }}
        }
    })
}

async fn device(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ins"))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;
    server
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fleet_isolates_failing_devices() {
    let healthy = device(ResponseTemplate::new(200).set_body_json(show_interface(json!([
        { "interface": "Ethernet1/1", "eth_inbytes": "5000000000", "eth_outbytes": "1000000000" },
        { "interface": "Ethernet1/2", "eth_inbytes": "10000000000", "eth_outbytes": "500000000" },
        { "interface": "Vlan100", "eth_l3in_ucastbytes": 42, "eth_l3out_ucastbytes": 43 }
    ]))))
    .await;
    let rejecting = device(ResponseTemplate::new(401)).await;
    let broken = device(ResponseTemplate::new(200).set_body_string("not json")).await;

    let devices = vec![
        DeviceId::from(healthy.address().to_string()),
        DeviceId::from(rejecting.address().to_string()),
        DeviceId::from(broken.address().to_string()),
    ];

    let fleet = Fleet::from_config(&config()).unwrap();
    let results = fleet.collect(&devices).await;

    assert_eq!(results.len(), 3);

    let ok = results
        .iter()
        .find(|r| r.device == devices[0])
        .unwrap();
    assert_eq!(ok.status, DeviceStatus::Ok);
    assert_eq!(
        ok.inbound(),
        [
            RankedEntry::new("Ethernet1/2", 10_000_000_000),
            RankedEntry::new("Ethernet1/1", 5_000_000_000),
            RankedEntry::new("Vlan100", 42),
        ]
    );
    assert_eq!(ok.outbound()[0], RankedEntry::new("Ethernet1/1", 1_000_000_000));

    for failed in results.iter().filter(|r| r.device != devices[0]) {
        assert_eq!(failed.status, DeviceStatus::FetchFailed);
        assert!(failed.inbound().is_empty());
        assert!(failed.outbound().is_empty());
        assert!(failed.failure.is_some());
    }
}

#[tokio::test]
async fn test_unreachable_device_is_fetch_failed() {
    // Reserve a port, then release it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let fleet = Fleet::from_config(&config()).unwrap();
    let results = fleet.collect(&[DeviceId::from(address)]).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, DeviceStatus::FetchFailed);
    let reason = results[0].failure.as_deref().unwrap();
    assert!(reason.contains("transport error"), "got: {reason}");
}

#[tokio::test]
async fn test_slow_device_does_not_hold_up_fleet() {
    let slow = device(
        ResponseTemplate::new(200)
            .set_body_json(show_interface(json!([
                { "interface": "Ethernet1/1", "eth_inbytes": 1, "eth_outbytes": 1 }
            ])))
            .set_delay(Duration::from_secs(2)),
    )
    .await;
    let fast = device(ResponseTemplate::new(200).set_body_json(show_interface(json!([
        { "interface": "Ethernet1/9", "eth_inbytes": 900, "eth_outbytes": 90 }
    ]))))
    .await;

    let mut config = config();
    config.timeout = Duration::from_millis(200);
    let fleet = Fleet::from_config(&config).unwrap();
    let devices = [
        DeviceId::from(slow.address().to_string()),
        DeviceId::from(fast.address().to_string()),
    ];
    let results = fleet.collect(&devices).await;

    assert_eq!(results[0].status, DeviceStatus::FetchFailed);
    let reason = results[0].failure.as_deref().unwrap();
    assert!(reason.contains("timed out"), "got: {reason}");

    assert_eq!(results[1].status, DeviceStatus::Ok);
    assert_eq!(results[1].inbound(), [RankedEntry::new("Ethernet1/9", 900)]);
}

#[tokio::test]
async fn test_extended_alias_table_reaches_fleet() {
    let server = device(ResponseTemplate::new(200).set_body_json(show_interface(json!([
        { "interface": "Ethernet1/1", "vendor_rx_octets": 70, "vendor_tx_octets": 7 },
        { "interface": "Ethernet1/2", "eth_inbytes": 50, "eth_outbytes": 5 }
    ]))))
    .await;

    let aliases = AliasTable::nxos()
        .with_inbound("vendor_rx_octets")
        .with_outbound("vendor_tx_octets");
    let fleet = Fleet::new(NxApiSource::from_config(&config()).unwrap()).with_aliases(aliases);
    let results = fleet
        .collect(&[DeviceId::from(server.address().to_string())])
        .await;

    assert_eq!(results[0].status, DeviceStatus::Ok);
    assert_eq!(
        results[0].inbound(),
        [RankedEntry::new("Ethernet1/1", 70), RankedEntry::new("Ethernet1/2", 50)]
    );
    assert_eq!(results[0].outbound()[0], RankedEntry::new("Ethernet1/1", 7));
}

#[tokio::test]
async fn test_top_setting_bounds_rankings() {
    let server = device(ResponseTemplate::new(200).set_body_json(show_interface(json!([
        { "interface": "a", "eth_inbytes": 1, "eth_outbytes": 3 },
        { "interface": "b", "eth_inbytes": 2, "eth_outbytes": 2 },
        { "interface": "c", "eth_inbytes": 3, "eth_outbytes": 1 }
    ]))))
    .await;

    let mut config = config();
    config.top = Some(2);
    let fleet = Fleet::from_config(&config).unwrap();
    let results = fleet
        .collect(&[DeviceId::from(server.address().to_string())])
        .await;

    assert_eq!(
        results[0].inbound(),
        [RankedEntry::new("c", 3), RankedEntry::new("b", 2)]
    );
    assert_eq!(
        results[0].outbound(),
        [RankedEntry::new("a", 3), RankedEntry::new("b", 2)]
    );
}
