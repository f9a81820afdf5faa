use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::crud::{CrudModel, SqliteQuery};
use crate::error::ApiError;

use super::Employee;

/// A Department. The name is required; everything else may be absent.
///
/// The employee collection is kept as an id set and is not serialized:
/// employees reference their department through `department_id`, and the
/// collection is resolved through the repository when needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Option<i64>,
    pub department_name: Option<String>,
    pub location_id: Option<i64>,
    #[serde(skip)]
    pub employee_ids: BTreeSet<i64>,
}

// The employee set has no backing column; rows come out of storage with it
// empty.
impl<'r> FromRow<'r, SqliteRow> for Department {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            department_name: row.try_get("department_name")?,
            location_id: row.try_get("location_id")?,
            employee_ids: BTreeSet::new(),
        })
    }
}

super::identity_eq!(Department);

impl Department {
    /// Add an employee to this department, updating both sides of the
    /// relationship. Adding an already-present employee is a no-op.
    pub fn add_employee(&mut self, employee: &mut Employee) {
        if let Some(id) = employee.id {
            self.employee_ids.insert(id);
        }
        employee.department_id = self.id;
    }

    /// Remove an employee, clearing its back-reference. Removing an absent
    /// employee is a no-op.
    pub fn remove_employee(&mut self, employee: &mut Employee) {
        if let Some(id) = employee.id {
            self.employee_ids.remove(&id);
        }
        employee.department_id = None;
    }
}

impl CrudModel for Department {
    const TABLE: &'static str = "department";
    const ENTITY_NAME: &'static str = "department";
    const RESOURCE: &'static str = "departments";
    const COLUMNS: &'static [&'static str] = &["department_name", "location_id"];
    const SORT_COLUMNS: &'static [&'static str] = &["id", "department_name"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.department_name.is_none() {
            return Err(ApiError::required_field(
                Self::ENTITY_NAME,
                "departmentName",
            ));
        }
        Ok(())
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.department_name.clone())
            .bind(self.location_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(id: i64) -> Department {
        Department {
            id: Some(id),
            department_name: Some("Engineering".into()),
            ..Default::default()
        }
    }

    fn employee(id: i64) -> Employee {
        Employee {
            id: Some(id),
            ..Default::default()
        }
    }

    #[test]
    fn add_employee_sets_back_reference() {
        let mut dept = department(7);
        let mut emp = employee(3);

        dept.add_employee(&mut emp);

        assert!(dept.employee_ids.contains(&3));
        assert_eq!(emp.department_id, Some(7));
    }

    #[test]
    fn add_employee_twice_keeps_collection_at_one() {
        let mut dept = department(7);
        let mut emp = employee(3);

        dept.add_employee(&mut emp);
        dept.add_employee(&mut emp);

        assert_eq!(dept.employee_ids.len(), 1);
    }

    #[test]
    fn remove_employee_clears_back_reference() {
        let mut dept = department(7);
        let mut emp = employee(3);
        dept.add_employee(&mut emp);

        dept.remove_employee(&mut emp);

        assert!(dept.employee_ids.is_empty());
        assert_eq!(emp.department_id, None);
    }

    #[test]
    fn remove_absent_employee_is_a_no_op() {
        let mut dept = department(7);
        let mut emp = employee(3);

        dept.remove_employee(&mut emp);

        assert!(dept.employee_ids.is_empty());
        assert_eq!(emp.department_id, None);
    }

    #[test]
    fn missing_name_fails_validation() {
        let dept = Department {
            id: None,
            department_name: None,
            ..Default::default()
        };
        assert!(dept.validate().is_err());
    }

    #[test]
    fn empty_name_passes_validation() {
        // only absence is rejected
        let dept = Department {
            id: None,
            department_name: Some(String::new()),
            ..Default::default()
        };
        assert!(dept.validate().is_ok());
    }
}
