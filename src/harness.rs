//! End-to-end functional scenarios for chart submissions.
//!
//! A scenario drives a live test repository: it pushes branches, opens a
//! pull request, waits for the submission workflow and checks the
//! published chart index. Live runs are gated behind the
//! `_integration_tests` feature, the building blocks are unit tested.

/// Helm repository `index.yaml` model.
pub mod index;

/// Report-only submission scenario driver.
pub mod scenario;

/// OWNERS and report templates.
pub mod templates;
