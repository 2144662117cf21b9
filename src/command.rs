//! Command implementations wiring the CLI to the library.
//!
//! Each command receives its parsed arguments together with the process
//! [`Config`](crate::config::Config) and the collaborators it drives, so the
//! same entry points run from `main` and from tests.

/// `check-release`: inspects a pull request or a version and emits workflow
/// outputs describing the release it carries.
pub mod check_release;

/// `create-pr`: commits local changes on a new branch and opens a pull
/// request.
pub mod create_pr;
