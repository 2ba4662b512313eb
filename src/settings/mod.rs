//! Settings come from a TOML file (`settings/dev.toml` in debug builds) with
//! `TOKENPAIR_*` environment overrides. Secrets such as `auth.signing_key`
//! belong in the environment, not in the file.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
