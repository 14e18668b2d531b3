use serde::{Deserialize, Serialize};

use segcat_core::ConcatOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Options applied to every concat source.
    #[serde(default)]
    pub concat: ConcatOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directives used when `RUST_LOG` is unset and
    /// `--verbose` is not given, e.g. `"segcat_demux=debug"`.
    #[serde(default)]
    pub filter: Option<String>,
}
