//! Configuration section definitions.
//!
//! Each module corresponds to a section in `fnsplit.toml`:
//!
//! | Module     | TOML Section   | Purpose                               |
//! |------------|----------------|---------------------------------------|
//! | `adapter`  | `[adapter]`    | Function defaults merged under routes |
//! | `build`    | `[build]`      | Framework build outputs               |
//! | `output`   | `[output]`     | Deployment output layout              |
//! | `bundler`  | `[bundler]`    | Bundler command and target            |

mod adapter;
mod build;
mod bundler;
mod output;

pub use adapter::AdapterConfig;
pub use build::BuildConfig;
pub use bundler::BundlerConfig;
pub use output::OutputConfig;
