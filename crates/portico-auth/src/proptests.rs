//! Property-based tests for the guard and the token codec.
