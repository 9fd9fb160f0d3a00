//! Scenario tests for the UI manager
//!
//! End-to-end flows through template loading, layer registration and
//! teardown, as a host application would drive them.

mod manager_scenarios;
