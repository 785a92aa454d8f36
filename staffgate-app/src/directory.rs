//! Directory workflows
//!
//! Personnel and department compositions. Detail views join two stores; when
//! the secondary store is unreachable the joined half degrades to `None`
//! instead of failing the whole request.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use staffgate_core::{
    Department, Employee, Filter, ListQuery, NewDepartment, NewEmployee, ResultPage, StoreError,
};
use staffgate_store::EntityStore;

use crate::AppResult;

/// Pagination fallbacks applied when a request names neither value.
#[derive(Debug, Clone, Copy)]
pub struct PageDefaults {
    pub page: u64,
    pub per_page: u64,
}

/// An employee joined with its department. `department: None` means the
/// departments store was unreachable or the reference dangles.
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
    pub department: Option<Department>,
}

/// A department joined with its roster. `employees: None` means the personnel
/// store was unreachable.
#[derive(Debug, Serialize)]
pub struct DepartmentDetail {
    pub department: Department,
    pub employees: Option<Vec<Employee>>,
}

/// Personnel/department workflows over their two stores.
pub struct Directory {
    personnel: Arc<dyn EntityStore<Employee>>,
    departments: Arc<dyn EntityStore<Department>>,
    defaults: PageDefaults,
}

impl Directory {
    pub fn new(
        personnel: Arc<dyn EntityStore<Employee>>,
        departments: Arc<dyn EntityStore<Department>>,
        defaults: PageDefaults,
    ) -> Self {
        Self {
            personnel,
            departments,
            defaults,
        }
    }

    fn page_query(&self, page: Option<u64>, per_page: Option<u64>) -> ListQuery {
        ListQuery {
            filters: Vec::new(),
            page: Some(page.unwrap_or(self.defaults.page)),
            per_page: Some(per_page.unwrap_or(self.defaults.per_page)),
        }
    }

    pub async fn list_personnel(
        &self,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> AppResult<ResultPage<Employee>> {
        Ok(self.personnel.list(&self.page_query(page, per_page)).await?)
    }

    /// Create an employee after confirming the referenced department exists.
    /// The stores do not enforce the link, so the gateway checks it here.
    pub async fn add_employee(&self, new: &NewEmployee) -> AppResult<Employee> {
        new.validate()?;

        match self.departments.get(&new.occupation).await {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => {
                return Err(StoreError::validation(
                    "occupation",
                    format!("department {} does not exist", new.occupation),
                )
                .into());
            }
            Err(e) => return Err(e.into()),
        }

        let employee = self.personnel.create(new).await?;
        debug!(employee = employee.id, "created employee");
        Ok(employee)
    }

    pub async fn employee_detail(&self, id: i64) -> AppResult<EmployeeDetail> {
        let employee = self.personnel.get(&id).await?;

        let department = match self.departments.get(&employee.occupation).await {
            Ok(department) => Some(department),
            Err(e) if e.is_unreachable() => {
                warn!(error = %e, "departments store unreachable, omitting occupation");
                None
            }
            // A dangling reference (the delete race) reads the same as an
            // unreachable store: no department to show.
            Err(StoreError::NotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(EmployeeDetail {
            employee,
            department,
        })
    }

    pub async fn list_departments(
        &self,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> AppResult<ResultPage<Department>> {
        Ok(self
            .departments
            .list(&self.page_query(page, per_page))
            .await?)
    }

    pub async fn add_department(&self, new: &NewDepartment) -> AppResult<Department> {
        new.validate()?;
        let department = self.departments.create(new).await?;
        debug!(department = department.id, "created department");
        Ok(department)
    }

    pub async fn department_detail(&self, id: i64) -> AppResult<DepartmentDetail> {
        let department = self.departments.get(&id).await?;

        let query = ListQuery::filtered(vec![Filter::eq("occupation", id)]);
        let employees = match self.personnel.list(&query).await {
            Ok(page) => Some(page.objects),
            Err(e) if e.is_unreachable() => {
                warn!(error = %e, "personnel store unreachable, omitting roster");
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DepartmentDetail {
            department,
            employees,
        })
    }
}
