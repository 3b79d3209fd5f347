//! Unit tests for the challenge store
