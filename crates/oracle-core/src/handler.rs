//! C8: opportunity dispatch. Handlers are the core's only output seam —
//! everything downstream (signal relay, execution, logging sinks) plugs in
//! here rather than the detector knowing about any of them directly.
//!
//! A scan never aborts because one consumer failed: a failing handler is
//! logged and isolated, while the remaining handlers and the next scan
//! both proceed unaffected.

use tracing::{error, warn};

use crate::error::OracleError;
use crate::types::Opportunity;

/// Implemented by anything that wants to react to a detected opportunity —
/// a metrics sink, an execution queue, a websocket broadcaster. Interfaces
/// only; this crate ships no implementations.
pub trait OpportunityHandler: Send + Sync {
    fn on_opportunity(&self, opportunity: &Opportunity) -> Result<(), OracleError>;

    /// A short name for this handler, used only in failure logs.
    fn name(&self) -> &str {
        "unnamed_handler"
    }
}

/// Invokes every registered handler, in registration order, for each
/// opportunity. A handler's failure becomes a logged `HandlerFailure` and
/// nothing more — the dispatcher always finishes the full handler list for
/// every opportunity it is given.
#[derive(Default)]
pub struct HandlerDispatcher {
    handlers: Vec<Box<dyn OpportunityHandler>>,
}

impl HandlerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Box<dyn OpportunityHandler>) {
        self.handlers.push(handler);
    }

    pub fn dispatch(&self, opportunity: &Opportunity) {
        for handler in &self.handlers {
            if let Err(err) = handler.on_opportunity(opportunity) {
                let failure = OracleError::HandlerFailure {
                    reason: err.to_string(),
                };
                error!(handler = handler.name(), error = %failure, "opportunity handler failed");
            }
        }
    }

    pub fn dispatch_all(&self, opportunities: &[Opportunity]) {
        if self.handlers.is_empty() {
            warn!("no opportunity handlers registered; opportunities will be dropped");
            return;
        }
        for opportunity in opportunities {
            self.dispatch(opportunity);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChainId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
    }

    impl OpportunityHandler for CountingHandler {
        fn on_opportunity(&self, _opportunity: &Opportunity) -> Result<(), OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingHandler;

    impl OpportunityHandler for FailingHandler {
        fn on_opportunity(&self, _opportunity: &Opportunity) -> Result<(), OracleError> {
            Err(OracleError::HandlerFailure {
                reason: "simulated failure".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing_handler"
        }
    }

    fn sample_opportunity() -> Opportunity {
        Opportunity {
            id: 1,
            ts_ms: 0,
            chain: ChainId::Ethereum,
            profit_wei: 1_000,
            gas_estimate: 150_000,
            path: vec![],
            flash_loan_token: "WETH".to_string(),
            flash_loan_amount: 1,
            confidence: 1.0,
        }
    }

    #[test]
    fn dispatches_to_every_registered_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = HandlerDispatcher::new();
        dispatcher.register(Box::new(CountingHandler { calls: calls.clone() }));
        dispatcher.register(Box::new(CountingHandler { calls: calls.clone() }));
        dispatcher.dispatch(&sample_opportunity());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn one_failing_handler_does_not_block_the_others() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = HandlerDispatcher::new();
        dispatcher.register(Box::new(FailingHandler));
        dispatcher.register(Box::new(CountingHandler { calls: calls.clone() }));
        dispatcher.dispatch(&sample_opportunity());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
