//! Unit tests for domain entities

mod challenge_tests;
