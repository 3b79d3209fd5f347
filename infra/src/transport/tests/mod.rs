//! Transport implementation tests

mod mock_transport_tests;
