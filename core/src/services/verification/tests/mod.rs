//! Unit tests for the verification engine

mod engine_tests;
