//! Tests for event processing.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::daemon::mock::{DaemonCall, MockDaemon};
use crate::event::Reason;
use crate::reconcile::ActiveConnectionResolver;
use crate::store::mock::MockStore;
use crate::time::InstantSleeper;

const PEERS: &str = "vpn ipsec site-to-site peer";

const CONF: &str = "\
config setup

conn peer-203.0.113.9-tunnel-1
\t#dhcp-interface=eth0
\tleft=10.0.0.1
\tright=203.0.113.9
#conn peer-203.0.113.9-tunnel-1

conn peer-198.51.100.4-tunnel-0
\tleft=172.16.0.1
\tright=198.51.100.4
#conn peer-198.51.100.4-tunnel-0

";

const SECRETS: &str = "\
10.0.0.1 203.0.113.9 : PSK \"a\" #dhcp-interface=eth0#
172.16.0.1 198.51.100.4 : PSK \"b\"
";

struct Fixture {
    _dir: TempDir,
    files: IpsecFiles,
    daemon: Arc<MockDaemon>,
    reconciler: Reconciler<Arc<MockDaemon>, Arc<MockStore>, InstantSleeper>,
}

impl Fixture {
    fn new(daemon: MockDaemon) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let files = IpsecFiles::new(dir.path().join("ipsec.conf"), dir.path().join("ipsec.secrets"));
        std::fs::write(&files.conf, CONF).unwrap();
        std::fs::write(&files.secrets, SECRETS).unwrap();

        let daemon = Arc::new(daemon);
        let store = Arc::new(
            MockStore::new()
                .with_peer(PEERS, "203.0.113.9", Some("eth0"))
                .with_peer(PEERS, "198.51.100.4", None),
        );
        let resolver = ActiveConnectionResolver::new(Arc::clone(&daemon), store, PEERS);
        let reconciler = Reconciler::new(resolver, Duration::from_secs(5), Duration::from_secs(10))
            .with_sleeper(InstantSleeper);

        Self {
            _dir: dir,
            files,
            daemon,
            reconciler,
        }
    }

    async fn process(&self, old: Option<&str>, new: Option<&str>, reason: &str) -> Result<HookOutcome, HookError> {
        let parse = |s: &str| s.parse::<IpAddr>().unwrap();
        let event = DhcpEvent::new("eth0", old.map(parse), new.map(parse), Reason::parse(reason));
        process_event(&event, &self.files, &self.reconciler).await
    }

    fn conf(&self) -> String {
        std::fs::read_to_string(&self.files.conf).unwrap()
    }

    fn secrets(&self) -> String {
        std::fs::read_to_string(&self.files.secrets).unwrap()
    }
}

#[tokio::test]
async fn renew_with_same_address_does_nothing() {
    let fixture = Fixture::new(MockDaemon::default());

    let outcome = fixture
        .process(Some("10.0.0.1"), Some("10.0.0.1"), "RENEW")
        .await
        .unwrap();

    assert!(matches!(outcome, HookOutcome::Skipped));
    assert_eq!(fixture.conf(), CONF);
    assert_eq!(fixture.secrets(), SECRETS);
    assert!(fixture.daemon.calls().is_empty());
}

#[tokio::test]
async fn reboot_does_nothing() {
    let fixture = Fixture::new(MockDaemon::default());

    let outcome = fixture
        .process(Some("10.0.0.1"), Some("10.0.0.2"), "REBOOT")
        .await
        .unwrap();

    assert!(matches!(outcome, HookOutcome::Skipped));
    assert_eq!(fixture.conf(), CONF);
}

#[tokio::test]
async fn bound_with_same_address_runs_full_update() {
    let fixture = Fixture::new(MockDaemon::with_listings([
        vec!["peer-203.0.113.9-tunnel-1"],
        vec!["peer-203.0.113.9-tunnel-1"],
    ]));

    let outcome = fixture
        .process(Some("10.0.0.1"), Some("10.0.0.1"), "BOUND")
        .await
        .unwrap();

    assert!(matches!(outcome, HookOutcome::Updated { reconcile: Some(_), .. }));
    assert!(fixture.daemon.calls().contains(&DaemonCall::Reload));
}

#[tokio::test]
async fn address_change_retargets_files_and_reconnects() {
    let fixture = Fixture::new(MockDaemon::with_listings([
        vec!["peer-203.0.113.9-tunnel-1", "peer-198.51.100.4-tunnel-0"],
        vec!["peer-198.51.100.4-tunnel-0"],
    ]));

    let outcome = fixture
        .process(Some("10.0.0.1"), Some("10.0.0.2"), "RENEW")
        .await
        .unwrap();

    let HookOutcome::Updated {
        blocks_updated,
        secrets_updated,
        reconcile: Some(report),
    } = outcome
    else {
        panic!("expected a reconciled update");
    };
    assert_eq!(blocks_updated, 1);
    assert_eq!(secrets_updated, 1);

    let conf = fixture.conf();
    assert!(conf.contains("\t#dhcp-interface=eth0\n\tleft=10.0.0.2\n"));
    assert!(conf.contains("\tleft=172.16.0.1\n"));
    assert!(fixture
        .secrets()
        .starts_with("10.0.0.2 203.0.113.9 : PSK \"a\" #dhcp-interface=eth0#\n"));

    // Only the DHCP-tracked peer's SA is managed
    assert_eq!(report.before.iter().collect::<Vec<_>>(), vec!["peer-203.0.113.9-tunnel-1"]);
    assert_eq!(fixture.daemon.terminated(), vec!["peer-203.0.113.9-tunnel-1"]);
    assert_eq!(fixture.daemon.initiated(), vec!["peer-203.0.113.9-tunnel-1"]);
}

#[tokio::test]
async fn lost_address_blanks_files_without_touching_daemon() {
    let fixture = Fixture::new(MockDaemon::default());

    let outcome = fixture.process(Some("10.0.0.1"), None, "RELEASE").await.unwrap();

    assert!(matches!(outcome, HookOutcome::Updated { reconcile: None, .. }));
    assert!(fixture.conf().contains("\t#dhcp-interface=eth0\n\tleft=\n"));
    assert!(fixture.secrets().starts_with("# 203.0.113.9 : PSK \"a\" #dhcp-interface=eth0#\n"));
    assert!(fixture.daemon.calls().is_empty());
}

#[tokio::test]
async fn missing_conf_aborts_before_secrets() {
    let fixture = Fixture::new(MockDaemon::default());
    std::fs::remove_file(&fixture.files.conf).unwrap();

    let err = fixture
        .process(Some("10.0.0.1"), Some("10.0.0.2"), "RENEW")
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::Rewrite(RewriteError::Read { .. })));
    assert_eq!(fixture.secrets(), SECRETS);
    assert!(fixture.daemon.calls().is_empty());
}

#[tokio::test]
async fn snapshot_failure_is_reconcile_error() {
    let fixture = Fixture::new(MockDaemon::with_results(vec![Err(
        crate::daemon::DaemonError::Vici(crate::vici::ViciError::Truncated),
    )]));

    let err = fixture
        .process(Some("10.0.0.1"), Some("10.0.0.2"), "RENEW")
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::Reconcile(_)));
    // Files were already patched
    assert!(fixture.conf().contains("\tleft=10.0.0.2\n"));
}
