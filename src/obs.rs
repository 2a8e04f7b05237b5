//! Optional observability helpers for verification passes.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_gate.verify` with the `stage`
//!   (call site) field.
//! - Enable `metrics` to increment the `oauth2_gate_verify_total` counter for every
//!   attempt/success/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each verification pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerifyOutcome {
	/// Entry to the verification pass.
	Attempt,
	/// Verified token attached.
	Success,
	/// Rejection or transport failure propagated back to the caller.
	Failure,
}
impl VerifyOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			VerifyOutcome::Attempt => "attempt",
			VerifyOutcome::Success => "success",
			VerifyOutcome::Failure => "failure",
		}
	}
}
impl Display for VerifyOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
