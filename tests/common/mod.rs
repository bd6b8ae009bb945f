// Shared test plumbing lives in the `scriptq-test-utils` crate; re-export
// the pieces every integration test uses.

#[allow(unused_imports)]
pub use scriptq_test_utils::{init_tracing, with_timeout};
