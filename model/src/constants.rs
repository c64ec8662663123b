use std::time::Duration;

/// Helper macro to avoid retyping the version prefix of a platform API when creating endpoint
/// paths. Given only the API group it returns the group root; given a path literal as well it
/// appends `/path`.
macro_rules! api {
    ($group:literal) => {
        concat!("/", $group, "/v1")
    };
    ($group:literal, $s:literal) => {
        concat!(api!($group), "/", $s)
    };
}

// API roots
pub const AUTH_API: &str = api!("auth");
pub const CONFIG_API: &str = api!("config");
pub const EDGE_API: &str = api!("edge");

// Endpoints that do not need path parameters
pub const PROJECTS_PATH: &str = api!("auth", "projects/");
pub const USERS_PATH: &str = api!("auth", "users/");

// Request headers
pub const HEADER_API_KEY: &str = "X-RAFAY-API-KEYID";

/// The user agent reported to the platform for every call.
pub const DEFAULT_USER_AGENT: &str = "sharectl";

// Cluster settings
/// The cluster setting that records whether sharing is managed outside of the cluster resource.
pub const CLUSTER_SHARING_EXTERNAL_KEY: &str = "cluster_sharing_external";
/// The value of [`CLUSTER_SHARING_EXTERNAL_KEY`] when sharing is managed by the cluster resource.
pub const CLUSTER_SHARING_INTERNAL: &str = "false";

// Environment variables
pub const ENV_PROVIDER_CONFIG: &str = "RAFAY_PROVIDER_CONFIG";

// Paths
pub const DEFAULT_PROVIDER_CONFIG: &str = "~/.rafay/cli/config.json";

// Timing
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const RESOURCE_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[test]
fn api_constants_macro_test() {
    assert_eq!("/auth/v1", AUTH_API);
    assert_eq!("/edge/v1", EDGE_API);
    assert_eq!("/config/v1", CONFIG_API);
    assert_eq!("/auth/v1/projects/", PROJECTS_PATH);
    assert_eq!("/edge/v1/foo", api!("edge", "foo"));
}
