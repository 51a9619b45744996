//! Vagrant Discovery Tests
//!
//! Covers:
//! - Project root lookup from nested directories
//! - Provisioned machine listing
//! - `known_hosts`/`install` for the ssh-config and hostmanager sources

mod common;

use common::{interceptor_over, ip, MockResolver};
use futures::future::BoxFuture;
use hostsresolver::base::neterror::NetError;
use hostsresolver::socket::NetStack;
use hostsresolver::sources::vagrant::{list_machines, lookup_root};
use hostsresolver::sources::{hostmanager, vagrant, DiscoveryConfig, VagrantClient};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const FIRST: &str = "first.machine.example.org";
const SECOND: &str = "second.machine.example.org";

const GUEST_HOSTS: &str = "
    127.0.0.1 localhost
    1.1.1.1 first.machine.example.org
    2.3.4.5 second.machine.example.org
";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn known() -> HashMap<String, Ipv4Addr> {
    HashMap::from([(FIRST.to_string(), ip("1.1.1.1")), (SECOND.to_string(), ip("2.3.4.5"))])
}

/// Answers `vagrant` invocations from canned output and records them.
#[derive(Default)]
struct FakeVagrant {
    outputs: HashMap<Vec<String>, Result<String, NetError>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeVagrant {
    fn answer(mut self, args: &[&str], output: &str) -> Self {
        self.outputs.insert(owned(args), Ok(output.to_string()));
        self
    }

    fn fail(mut self, args: &[&str]) -> Self {
        let err = NetError::vagrant_failed(args.join(" "), "exit status: 1");
        self.outputs.insert(owned(args), Err(err));
        self
    }

    fn with_ssh_config(self, machine: &str, hostname: &str) -> Self {
        let output = format!("Host {machine}\n  HostName {hostname}\n  User vagrant\n  Port 22\n");
        self.answer(&["ssh-config", machine], &output)
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

impl VagrantClient for FakeVagrant {
    fn run<'a>(&'a self, args: &'a [&'a str]) -> BoxFuture<'a, Result<String, NetError>> {
        let args = owned(args);
        self.calls.lock().unwrap().push(args.clone());
        let result = self
            .outputs
            .get(&args)
            .cloned()
            .unwrap_or_else(|| Err(NetError::vagrant_failed(args.join(" "), "unexpected")));
        Box::pin(async move { result })
    }
}

#[test]
fn test_lookup_root_from_sub_folder() {
    let config = DiscoveryConfig::default();
    let root = fixture("vagrant_project");
    assert_eq!(lookup_root(&config, Some(root.join("some/sub/folder").as_path())), root);
    assert_eq!(lookup_root(&config, Some(root.as_path())), root);
}

#[test]
fn test_lookup_root_from_configured_cwd() {
    let root = fixture("vagrant_project");
    let config = DiscoveryConfig::default().with_cwd(root.join("some/sub/folder"));
    assert_eq!(lookup_root(&config, None), root);
}

#[test]
fn test_lookup_root_with_custom_names() {
    let config = DiscoveryConfig {
        dotfile_path: PathBuf::from(".custom_vagrant_internal_data"),
        vagrantfile: "custom_vagrantfile".to_string(),
        ..DiscoveryConfig::default()
    };
    let root = fixture("custom_vagrant_project");
    assert_eq!(lookup_root(&config, Some(root.join("some/sub/folder").as_path())), root);
    assert_eq!(list_machines(&config, &root), vec![FIRST, SECOND]);
}

#[test]
fn test_lookup_root_without_marker_returns_start() {
    let dir = tempfile::tempdir().unwrap();
    let start = dir.path().join("a/b");
    std::fs::create_dir_all(&start).unwrap();
    let config = DiscoveryConfig::default();
    assert_eq!(lookup_root(&config, Some(start.as_path())), start);
}

#[test]
fn test_list_machines() {
    let config = DiscoveryConfig::default();
    // A machine directory without an id file was never created.
    assert_eq!(list_machines(&config, &fixture("vagrant_project")), vec![FIRST, SECOND]);
    assert!(list_machines(&config, &fixture("empty_vagrant_project")).is_empty());
}

#[test]
fn test_list_machines_in_tempdir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Vagrantfile"), "").unwrap();
    for machine in ["web", "db"] {
        let provider = dir.path().join(".vagrant/machines").join(machine).join("docker");
        std::fs::create_dir_all(&provider).unwrap();
        std::fs::write(provider.join("id"), "c0ffee").unwrap();
    }
    let config = DiscoveryConfig::default();
    assert_eq!(list_machines(&config, dir.path()), vec!["db", "web"]);
}

#[tokio::test]
async fn test_vagrant_known_hosts() {
    let client = FakeVagrant::default()
        .with_ssh_config(FIRST, "1.1.1.1")
        .with_ssh_config(SECOND, "2.3.4.5");
    let config = DiscoveryConfig::default();
    let start = fixture("vagrant_project").join("some/sub/folder");

    let hosts = vagrant::known_hosts(&client, &config, Some(start.as_path())).await.unwrap();
    assert_eq!(hosts, known());
    assert_eq!(
        client.calls(),
        vec![owned(&["ssh-config", FIRST]), owned(&["ssh-config", SECOND])]
    );
}

#[tokio::test]
async fn test_vagrant_known_hosts_empty_project() {
    let client = FakeVagrant::default();
    let config = DiscoveryConfig::default();
    let root = fixture("empty_vagrant_project");

    let hosts = vagrant::known_hosts(&client, &config, Some(root.as_path())).await.unwrap();
    assert!(hosts.is_empty());
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_vagrant_hostname_must_be_ipv4() {
    let client = FakeVagrant::default()
        .with_ssh_config(FIRST, "1.1.1.1")
        .with_ssh_config(SECOND, "second.local");
    let config = DiscoveryConfig::default();
    let root = fixture("vagrant_project");

    let err = vagrant::known_hosts(&client, &config, Some(root.as_path())).await.unwrap_err();
    assert!(matches!(err, NetError::AddressInvalid));
}

#[tokio::test]
async fn test_vagrant_install() {
    let client = FakeVagrant::default()
        .with_ssh_config(FIRST, "1.1.1.1")
        .with_ssh_config(SECOND, "2.3.4.5");
    let interceptor = interceptor_over(&Arc::new(MockResolver::new()));
    let config = DiscoveryConfig::default();

    vagrant::install(&interceptor, &client, &config, Some(fixture("vagrant_project").as_path()))
        .await
        .unwrap();

    let stack = interceptor.stack();
    assert_eq!(stack.host_by_name(FIRST).await.unwrap(), ip("1.1.1.1"));
    assert_eq!(stack.host_by_name(SECOND).await.unwrap(), ip("2.3.4.5"));
}

#[tokio::test]
async fn test_vagrant_install_failure_leaves_table_untouched() {
    let client = FakeVagrant::default()
        .with_ssh_config(FIRST, "1.1.1.1")
        .fail(&["ssh-config", SECOND]);
    let interceptor = interceptor_over(&Arc::new(MockResolver::new()));
    let config = DiscoveryConfig::default();

    let err = vagrant::install(&interceptor, &client, &config, Some(fixture("vagrant_project").as_path()))
        .await
        .unwrap_err();
    assert!(matches!(err, NetError::VagrantCommandFailed { .. }));
    assert!(interceptor.table().is_empty());
    assert!(!interceptor.is_installed());
}

fn hostmanager_client(machine: &str) -> FakeVagrant {
    FakeVagrant::default().answer(&["ssh", machine, "-c", "cat /etc/hosts"], GUEST_HOSTS)
}

#[tokio::test]
async fn test_hostmanager_defaults_to_first_machine() {
    let client = hostmanager_client(FIRST);
    let config = DiscoveryConfig::default();
    let root = fixture("vagrant_project");

    let hosts = hostmanager::known_hosts(&client, &config, Some(root.as_path()), None).await.unwrap();
    assert_eq!(hosts, known());
    assert_eq!(client.calls(), vec![owned(&["ssh", FIRST, "-c", "cat /etc/hosts"])]);
}

#[tokio::test]
async fn test_hostmanager_with_specific_host() {
    let client = hostmanager_client(SECOND);
    let config = DiscoveryConfig::default();
    let root = fixture("vagrant_project");

    let hosts = hostmanager::known_hosts(&client, &config, Some(root.as_path()), Some(SECOND))
        .await
        .unwrap();
    assert_eq!(hosts, known());
    assert_eq!(client.calls(), vec![owned(&["ssh", SECOND, "-c", "cat /etc/hosts"])]);
}

#[tokio::test]
async fn test_hostmanager_unknown_name_uses_first_machine() {
    let client = hostmanager_client(FIRST);
    let config = DiscoveryConfig::default();
    let root = fixture("vagrant_project");

    hostmanager::known_hosts(&client, &config, Some(root.as_path()), Some("never.created.example.org"))
        .await
        .unwrap();
    assert_eq!(client.calls(), vec![owned(&["ssh", FIRST, "-c", "cat /etc/hosts"])]);
}

#[tokio::test]
async fn test_hostmanager_without_machines() {
    let client = FakeVagrant::default();
    let config = DiscoveryConfig::default();
    let root = fixture("empty_vagrant_project");

    let err = hostmanager::known_hosts(&client, &config, Some(root.as_path()), None).await.unwrap_err();
    assert!(matches!(err, NetError::NoMachines { .. }));
    assert_eq!(err.as_i32(), -901);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_hostmanager_install() {
    let client = hostmanager_client(FIRST);
    let interceptor = interceptor_over(&Arc::new(MockResolver::new()));
    let config = DiscoveryConfig::default();

    hostmanager::install(&interceptor, &client, &config, Some(fixture("vagrant_project").as_path()), None)
        .await
        .unwrap();

    assert!(interceptor.is_installed());
    assert_eq!(interceptor.table().snapshot(), known());
}
