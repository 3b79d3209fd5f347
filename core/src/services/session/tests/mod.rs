//! Unit tests for the session manager
