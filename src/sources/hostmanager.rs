//! Hosts discovery through a provisioned machine's own `/etc/hosts`.
//!
//! Projects using the vagrant-hostmanager plugin keep every machine's name
//! in each guest's hosts file, so reading it from one machine is enough.

use crate::base::neterror::NetError;
use crate::intercept::Interceptor;
use crate::sources::config::DiscoveryConfig;
use crate::sources::hostsfile::parse_content;
use crate::sources::vagrant::{list_machines, lookup_root, VagrantClient};
use std::{collections::HashMap, net::Ipv4Addr, path::Path};

const READ_HOSTS_COMMAND: &str = "cat /etc/hosts";

/// Read the hosts file of `name`, or of the first provisioned machine when
/// `name` is not one of them.
pub async fn known_hosts(
    client: &dyn VagrantClient,
    config: &DiscoveryConfig,
    root: Option<&Path>,
    name: Option<&str>,
) -> Result<HashMap<String, Ipv4Addr>, NetError> {
    let root = lookup_root(config, root);
    let machines = list_machines(config, &root);

    let machine = match name {
        Some(name) if machines.iter().any(|m| m == name) => name,
        _ => machines.first().map(String::as_str).ok_or_else(|| NetError::NoMachines {
            root: root.display().to_string(),
        })?,
    };

    tracing::debug!(machine = %machine, "reading guest hosts file");
    let content = client.ssh(machine, READ_HOSTS_COMMAND).await?;
    Ok(parse_content(&content))
}

/// Load a guest's hosts file into `interceptor` and install it.
///
/// Nothing is written to the table when the machine cannot be reached.
pub async fn install(
    interceptor: &Interceptor,
    client: &dyn VagrantClient,
    config: &DiscoveryConfig,
    root: Option<&Path>,
    name: Option<&str>,
) -> Result<(), NetError> {
    let hosts = known_hosts(client, config, root, name).await?;
    interceptor.update(hosts);
    interceptor.install();
    Ok(())
}
