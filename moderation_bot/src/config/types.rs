use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Contents of the config file.
///
/// Sets are ordered so the file comes out the same way every time it's written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Bot API token.
    pub token: String,
    /// Users allowed to use privileged commands. Never changed at runtime.
    #[serde(default)]
    pub whitelist: BTreeSet<u64>,
    /// Users whose messages get removed in allowed groups.
    #[serde(default)]
    pub blacklist: BTreeSet<u64>,
    /// Groups where the blacklist is enforced.
    #[serde(default)]
    pub allowed_groups: BTreeSet<i64>,
}

/// Outcome of a mutation on the config store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The config was changed and written to disk.
    Applied,
    /// The config already was in the requested state. Nothing was written.
    Unchanged,
}
