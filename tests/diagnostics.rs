//! Dropped payloads are reported through the `log` facade.
#![cfg(unix)]

use std::time::Duration;

use log::Level;
use logtest::Logger;
use rstest::rstest;
use unixlog::{ClientConfig, Endpoint, LogClient};

fn drain(logger: &mut Logger) -> Vec<(Level, String)> {
    let mut records = Vec::new();
    while let Some(record) = logger.pop() {
        records.push((record.level(), record.args().to_string()));
    }
    records
}

// One test function: `logtest` installs a process-wide logger.
#[rstest]
fn client_reports_drops_and_refuses_bridge() {
    let mut logger = Logger::start();
    let dir = tempfile::tempdir().expect("create temp dir");
    let endpoint = Endpoint::unix(dir.path().join("absent.sock"));

    let client = LogClient::connect(
        ClientConfig::default()
            .with_endpoint(endpoint)
            .with_warn_interval(Duration::from_secs(60)),
    );
    let records = drain(&mut logger);
    assert!(
        records
            .iter()
            .any(|(level, msg)| *level == Level::Debug && msg.contains("cannot connect")),
        "connection failure is logged at debug: {records:?}"
    );

    client.send(&1).expect("first send");
    client.send(&2).expect("second send");
    client.send(&3).expect("third send");
    let warnings: Vec<_> = drain(&mut logger)
        .into_iter()
        .filter(|(level, _)| *level == Level::Warn)
        .collect();
    assert_eq!(warnings.len(), 1, "warnings are rate limited: {warnings:?}");
    assert!(warnings[0].1.contains("dropped 1 payloads"));

    drop(client);
    let warnings: Vec<_> = drain(&mut logger)
        .into_iter()
        .filter(|(level, _)| *level == Level::Warn)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].1.contains("dropped 2 payloads"));

    #[cfg(feature = "log-compat")]
    assert!(matches!(
        unixlog::install_global_logger(log::LevelFilter::Info),
        Err(unixlog::LogError::LoggerAlreadySet)
    ));
}
