//! Vagrant machine discovery.
//!
//! Finds the project root, lists the machines Vagrant has provisioned there,
//! and asks Vagrant for each machine's address.

use crate::base::neterror::NetError;
use crate::intercept::Interceptor;
use crate::sources::config::DiscoveryConfig;
use futures::future::BoxFuture;
use std::{
    collections::HashMap,
    net::Ipv4Addr,
    path::{Path, PathBuf},
};
use tokio::process::Command;

/// Access to the Vagrant command line.
pub trait VagrantClient: Send + Sync {
    /// Run `vagrant <args>` and return its standard output.
    fn run<'a>(&'a self, args: &'a [&'a str]) -> BoxFuture<'a, Result<String, NetError>>;

    /// The `HostName` Vagrant uses to reach `machine` over SSH.
    fn hostname<'a>(&'a self, machine: &'a str) -> BoxFuture<'a, Result<String, NetError>> {
        Box::pin(async move {
            let output = self.run(&["ssh-config", machine]).await?;
            parse_ssh_config_hostname(&output).ok_or_else(|| {
                NetError::vagrant_failed(
                    format!("ssh-config {machine}"),
                    "no HostName in output",
                )
            })
        })
    }

    /// Run `command` on `machine` and return its output.
    fn ssh<'a>(
        &'a self,
        machine: &'a str,
        command: &'a str,
    ) -> BoxFuture<'a, Result<String, NetError>> {
        Box::pin(async move { self.run(&["ssh", machine, "-c", command]).await })
    }
}

/// Runs the `vagrant` executable inside a project root.
#[derive(Debug, Clone)]
pub struct VagrantCli {
    root: PathBuf,
    program: PathBuf,
}

impl VagrantCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            program: PathBuf::from("vagrant"),
        }
    }

    /// Use a different executable than `vagrant` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl VagrantClient for VagrantCli {
    fn run<'a>(&'a self, args: &'a [&'a str]) -> BoxFuture<'a, Result<String, NetError>> {
        Box::pin(async move {
            let command = args.join(" ");
            tracing::debug!(root = %self.root.display(), command = %command, "running vagrant");

            let output = Command::new(&self.program)
                .args(args)
                .current_dir(&self.root)
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|e| {
                    tracing::warn!(command = %command, error = %e, "cannot start vagrant");
                    NetError::vagrant_failed(command.clone(), e.to_string())
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::warn!(command = %command, status = %output.status, "vagrant failed");
                return Err(NetError::vagrant_failed(
                    command,
                    format!("{}: {}", output.status, stderr.trim()),
                ));
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        })
    }
}

/// Value of the first `HostName` directive in `vagrant ssh-config` output.
pub fn parse_ssh_config_hostname(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(key), Some(value)) if key.eq_ignore_ascii_case("HostName") => {
                Some(value.to_string())
            }
            _ => None,
        }
    })
}

/// Nearest directory at or above `start` (default `config.cwd`) that holds
/// the project marker file.
///
/// Falls back to `start` itself when no ancestor has one.
pub fn lookup_root(config: &DiscoveryConfig, start: Option<&Path>) -> PathBuf {
    let start = start.unwrap_or(&config.cwd);
    let absolute = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());

    let found = absolute
        .ancestors()
        .find(|dir| dir.join(&config.vagrantfile).exists());
    match found {
        Some(root) => root.to_path_buf(),
        None => {
            tracing::debug!(start = %start.display(), "no project marker found");
            start.to_path_buf()
        }
    }
}

/// Names of the machines provisioned under `root`, sorted.
///
/// A machine counts as provisioned when
/// `<dotfile_path>/machines/<name>/<provider>/id` exists.
pub fn list_machines(config: &DiscoveryConfig, root: &Path) -> Vec<String> {
    let machines_dir = root.join(&config.dotfile_path).join("machines");
    let Ok(entries) = std::fs::read_dir(&machines_dir) else {
        return Vec::new();
    };

    let mut machines: Vec<String> = entries
        .flatten()
        .filter(|machine| {
            std::fs::read_dir(machine.path())
                .map(|providers| providers.flatten().any(|p| p.path().join("id").is_file()))
                .unwrap_or(false)
        })
        .filter_map(|machine| machine.file_name().into_string().ok())
        .collect();
    machines.sort();
    machines
}

/// Map every provisioned machine name to the address Vagrant reports for it.
pub async fn known_hosts(
    client: &dyn VagrantClient,
    config: &DiscoveryConfig,
    root: Option<&Path>,
) -> Result<HashMap<String, Ipv4Addr>, NetError> {
    let root = lookup_root(config, root);
    let mut hosts = HashMap::new();

    for machine in list_machines(config, &root) {
        let hostname = client.hostname(&machine).await?;
        let addr: Ipv4Addr = hostname.parse().map_err(|_| {
            tracing::warn!(machine = %machine, hostname = %hostname, "not an IPv4 address");
            NetError::AddressInvalid
        })?;
        hosts.insert(machine, addr);
    }

    tracing::debug!(root = %root.display(), count = hosts.len(), "discovered vagrant machines");
    Ok(hosts)
}

/// Load every provisioned machine into `interceptor` and install it.
///
/// Nothing is written to the table unless every machine resolved.
pub async fn install(
    interceptor: &Interceptor,
    client: &dyn VagrantClient,
    config: &DiscoveryConfig,
    root: Option<&Path>,
) -> Result<(), NetError> {
    let hosts = known_hosts(client, config, root).await?;
    interceptor.update(hosts);
    interceptor.install();
    Ok(())
}
