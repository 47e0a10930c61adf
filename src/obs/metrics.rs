// self
use crate::{obs::RequestOutcome, request::Scope};

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(scope: Scope, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"papi_client_request_total",
			"scope" => scope.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (scope, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_request_outcome_noop_without_metrics() {
		record_request_outcome(Scope::Public, RequestOutcome::Failure);
	}
}
