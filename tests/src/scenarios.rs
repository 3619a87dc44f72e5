use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use riskmap_common::catalog::PortCatalog;
use riskmap_common::error::InputError;
use riskmap_common::network::target::validate;
use riskmap_core::assessment::{AssessError, AssessmentService, ScanRequest};
use riskmap_core::features::FeatureVector;
use riskmap_core::network::tcp::TcpProber;
use riskmap_core::scanner::ScanOptions;
use riskmap_core::scorer::{self, RiskScorer, ScorerConfig, ScorerError, ThreatClass};
use tokio_util::sync::CancellationToken;

use crate::util::{LoopbackPorts, ScriptedProber, closed_ports};

fn options() -> ScanOptions {
    ScanOptions {
        timeout: Duration::from_millis(300),
        concurrency: 50,
    }
}

fn fallback_scorer() -> Arc<dyn RiskScorer> {
    scorer::load_scorer(&ScorerConfig::default()).unwrap()
}

fn service_with(prober: Arc<ScriptedProber>, scorer: Arc<dyn RiskScorer>) -> AssessmentService {
    AssessmentService::new(prober, scorer, Arc::new(PortCatalog::well_known()), options())
}

#[tokio::test]
async fn host_without_open_ports_is_safe() {
    let prober = Arc::new(ScriptedProber::open([]));
    let service = service_with(prober.clone(), fallback_scorer());

    let assessment = service
        .assess(&ScanRequest::new("198.51.100.7", "linux"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(assessment.open_ports.is_empty());
    assert_eq!(assessment.features, FeatureVector::new(0, 0, 0));
    assert_eq!(assessment.verdict.class, ThreatClass::Safe);
    assert_eq!(prober.calls(), PortCatalog::well_known().len());
}

#[tokio::test]
async fn windows_host_with_remote_access_ports_is_a_threat() {
    let prober = Arc::new(ScriptedProber::open([3389, 22, 445]));
    let service = service_with(prober, fallback_scorer());

    let assessment = service
        .assess(&ScanRequest::new("198.51.100.7", "windows"), &CancellationToken::new())
        .await
        .unwrap();

    let labels: Vec<(u16, &str)> = assessment
        .open_ports
        .iter()
        .map(|p| (p.port, p.label))
        .collect();
    assert_eq!(labels, vec![(22, "SSH"), (445, "SMB"), (3389, "RDP")]);
    assert_eq!(assessment.features, FeatureVector::new(3, 3, 1));
    assert_eq!(assessment.verdict.class, ThreatClass::Threat);
}

#[tokio::test]
async fn malformed_address_never_reaches_the_scanner() {
    assert!(!validate("999.1.1.1"));

    let prober = Arc::new(ScriptedProber::open([22]));
    let service = service_with(prober.clone(), fallback_scorer());

    let err = service
        .assess(&ScanRequest::new("999.1.1.1", "linux"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AssessError::Input(InputError::InvalidAddress(ref a)) if a == "999.1.1.1"));
    assert_eq!(prober.calls(), 0);
}

#[tokio::test]
async fn unknown_os_context_never_reaches_the_scanner() {
    let prober = Arc::new(ScriptedProber::open([22]));
    let service = service_with(prober.clone(), fallback_scorer());

    let err = service
        .assess(&ScanRequest::new("198.51.100.7", "solaris"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AssessError::Input(InputError::UnknownOsContext(ref os)) if os == "solaris"));
    assert_eq!(prober.calls(), 0);
}

#[tokio::test]
async fn loopback_assessment_with_real_probes() {
    let open = LoopbackPorts::bind(2).await;
    let mut ports = open.ports();
    ports.extend(closed_ports(2).await);
    let catalog = Arc::new(crate::util::catalog_of(&ports));

    let service = AssessmentService::new(Arc::new(TcpProber), fallback_scorer(), catalog, options());

    let assessment = service
        .assess(&ScanRequest::new("127.0.0.1", "mac"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(assessment.features, FeatureVector::new(2, 2, 2));
    assert_eq!(assessment.verdict.class, ThreatClass::Safe);
    let json = serde_json::to_value(&assessment).unwrap();
    assert_eq!(json["openPorts"].as_array().unwrap().len(), 2);
    assert_eq!(json["verdict"]["class"], "safe");
}

#[tokio::test]
async fn trained_forest_is_loaded_from_disk_and_used() {
    let model = r#"{
        "classes": ["safe", "threat"],
        "trees": [
            { "nodes": [
                { "feature": 1, "threshold": 1.5, "left": 1, "right": 2 },
                { "value": [30.0, 0.0] },
                { "value": [2.0, 28.0] }
            ] }
        ]
    }"#;
    let path: PathBuf = std::env::temp_dir().join(format!("riskmap-it-{}.json", std::process::id()));
    std::fs::write(&path, model).unwrap();

    let loaded = scorer::load_scorer(&ScorerConfig {
        model: Some(path.clone()),
        allow_fallback: false,
    });
    let _ = std::fs::remove_file(&path);
    let forest = loaded.unwrap();

    let prober = Arc::new(ScriptedProber::open([21, 22]));
    let assessment = service_with(prober, forest)
        .assess(&ScanRequest::new("198.51.100.7", "linux"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(assessment.verdict.class, ThreatClass::Threat);
    assert!((assessment.verdict.raw - 28.0 / 30.0).abs() < 1e-9);
}

#[test]
fn missing_scorer_is_a_startup_error() {
    let result = scorer::load_scorer(&ScorerConfig {
        model: None,
        allow_fallback: false,
    });
    assert!(matches!(result, Err(ScorerError::Unavailable)));
}
