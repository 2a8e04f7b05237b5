// self
use crate::obs::VerifyOutcome;

/// Records a verification outcome via the global metrics recorder (when enabled).
pub fn record_verify_outcome(outcome: VerifyOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_gate_verify_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
