// Git plumbing: process-backed worker and the push batching rule.

pub mod batch;
pub mod worker;
