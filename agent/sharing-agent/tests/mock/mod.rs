/*!

This test module provides mock implementations of the [`ProjectClient`] and [`Shareable`] traits
that demonstrate what can be done to test without a platform.

The mock resource applies assign and unassign calls to an in-memory copy of the resource, the way
the platform would, and records every mutating call so that tests can assert on exactly which
calls a reconcile made and in which order.

!*/

pub(crate) mod project_client;
pub(crate) mod shareable;

pub(crate) const OWNER: &str = "p-owner";

/// Project names and ids known to the [`project_client::MockProjectClient`].
pub(crate) const PROJECTS: &[(&str, &str)] = &[
    ("defaultproject", OWNER),
    ("qa", "p-qa"),
    ("dev", "p-dev"),
    ("stage", "p-stage"),
    ("prod", "p-prod"),
];

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
