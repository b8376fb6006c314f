//! Property-based and randomized tests for exact elimination.
