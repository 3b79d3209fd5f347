//! Unit tests for the delivery orchestrator

mod orchestrator_tests;
