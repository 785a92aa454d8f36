//! Referential Integrity Guard
//!
//! Departments and personnel live in separate stores with no shared
//! transaction. Deleting a department is therefore a check-then-act sequence:
//! list the referencing employees, refuse if any exist, then delete. An
//! employee created between the check and the delete slips through; that
//! window is an accepted property of the two-service design, not something to
//! paper over with cross-service locking.

use std::sync::Arc;

use tracing::{debug, info};

use staffgate_core::{Department, Employee, Filter, ListQuery};
use staffgate_store::EntityStore;

use crate::{AppError, AppResult};

/// Best-effort enforcement of the department/personnel link on delete.
pub struct IntegrityGuard {
    personnel: Arc<dyn EntityStore<Employee>>,
    departments: Arc<dyn EntityStore<Department>>,
}

impl IntegrityGuard {
    pub fn new(
        personnel: Arc<dyn EntityStore<Employee>>,
        departments: Arc<dyn EntityStore<Department>>,
    ) -> Self {
        Self {
            personnel,
            departments,
        }
    }

    /// Delete a department unless personnel records still reference it.
    ///
    /// An unreachable personnel store refuses the delete outright: without
    /// the check there is no way to know the department is unreferenced.
    pub async fn delete_department(&self, id: i64) -> AppResult<()> {
        let query = ListQuery::filtered(vec![Filter::eq("occupation", id)]);
        let referencing = self.personnel.list(&query).await?;

        if referencing.num_results > 0 {
            debug!(
                department = id,
                employees = referencing.num_results,
                "refusing department delete"
            );
            return Err(AppError::conflict(format!(
                "department {id} is still referenced by {} employee(s)",
                referencing.num_results
            )));
        }

        self.departments.delete(&id).await?;
        info!(department = id, "deleted department");
        Ok(())
    }

    /// Employee deletes are unguarded; an employee may always be removed.
    pub async fn delete_employee(&self, id: i64) -> AppResult<()> {
        self.personnel.delete(&id).await?;
        info!(employee = id, "deleted employee");
        Ok(())
    }
}
