//! Shared fixtures for the capture tests.
