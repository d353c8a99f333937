//! Property-based tests for digest and mirroring guarantees
