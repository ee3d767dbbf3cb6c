//! Release pipeline tooling.
//!
//! Glue shared by the release binaries: logging setup, credentials-file
//! parsing, the remote-store abstraction used for uploads, and
//! memory-layout handling. The repository index builder itself lives in
//! the `apt-repo` crate.

pub mod layouts;
pub mod logging;
pub mod props;
pub mod remote;
