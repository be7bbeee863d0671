//! Department directory.

use crate::framework::{ResourceActor, ResourceHandle};
use crate::http::ApiRequest;
use crate::lifecycle::orchestrator::{GateFailures, GateThenFetch};
use crate::model::Department;

use super::{spawnable, FailureMessage, JsonEndpoint};

pub const DEPARTMENTS_PATH: &str = "/api/departments";
pub const POPULATE_SURVEYS_PATH: &str = "/api/populate-surveys-from-permissions";

const DEPARTMENTS_FAILURE: &str =
    "Failed to load departments. Please ensure the backend is running and department data is populated.";

pub type DepartmentList = JsonEndpoint<Vec<Department>>;

/// Departments, preceded by a request asking the backend to create any survey
/// the user's permissions imply.
pub type PopulatedDepartmentList = GateThenFetch<DepartmentList>;

pub fn department_list() -> DepartmentList {
    JsonEndpoint::new("departments", DEPARTMENTS_PATH)
        .with_failure(FailureMessage::ServerOr(DEPARTMENTS_FAILURE.into()))
}

pub fn populated_department_list() -> PopulatedDepartmentList {
    GateThenFetch::new(ApiRequest::post(POPULATE_SURVEYS_PATH), department_list())
}

/// Creates the plain department list actor and its handle.
pub fn new() -> (ResourceActor<DepartmentList>, ResourceHandle<DepartmentList>) {
    spawnable(department_list())
}

/// Creates the gated department list actor, its handle and the gate's
/// failure counter.
pub fn new_populated() -> (
    ResourceActor<PopulatedDepartmentList>,
    ResourceHandle<PopulatedDepartmentList>,
    GateFailures,
) {
    let resource = populated_department_list();
    let failures = resource.failures();
    let (actor, handle) = spawnable(resource);
    (actor, handle, failures)
}
