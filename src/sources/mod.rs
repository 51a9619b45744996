//! Sources that populate the address table.
//!
//! - [`hostsfile`]: a static hosts-format file
//! - [`vagrant`]: machine names and addresses reported by Vagrant
//! - [`hostmanager`]: a guest's hosts file, read over `vagrant ssh`
//! - [`config`]: where Vagrant projects are looked for
//!
//! Every source builds its whole mapping before touching the table, then
//! calls `update` followed by `install`.

pub mod config;
pub mod hostmanager;
pub mod hostsfile;
pub mod vagrant;

pub use config::DiscoveryConfig;
pub use vagrant::{VagrantCli, VagrantClient};
