//! Admin authentication for the Parley API
//!
//! A single configuration-supplied shared secret gates every administrative
//! operation. The `AdminAuth` extractor works with any state implementing
//! `FromRef<S>` for `AdminGate`.

mod error;
mod extractors;
mod gate;

pub use error::AuthError;
pub use extractors::AdminAuth;
pub use gate::AdminGate;
