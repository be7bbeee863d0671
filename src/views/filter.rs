//! Department filters for tables with a department selector.

use crate::config::ALL_DEPARTMENTS;
use crate::model::CustomerFocusItem;

/// Selected department. `All` bypasses filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DepartmentFilter {
    #[default]
    All,
    Named(String),
}

impl DepartmentFilter {
    /// Maps a selector value to a filter; [`ALL_DEPARTMENTS`] means no filter.
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_DEPARTMENTS {
            DepartmentFilter::All
        } else {
            DepartmentFilter::Named(selection.to_owned())
        }
    }

    /// Case-sensitive exact match.
    pub fn matches(&self, department: Option<&str>) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Named(name) => department == Some(name.as_str()),
        }
    }
}

impl From<&str> for DepartmentFilter {
    fn from(selection: &str) -> Self {
        Self::from_selection(selection)
    }
}

/// Rows whose department field matches `filter`, in their original order.
pub fn filter_by_department<T, F>(items: &[T], filter: &DepartmentFilter, department: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<&str>,
{
    match filter {
        DepartmentFilter::All => items.to_vec(),
        named => items.iter().filter(|item| named.matches(department(*item))).cloned().collect(),
    }
}

/// Customer-focus rows where the selected department is either side.
pub fn filter_customer_focus(items: &[CustomerFocusItem], filter: &DepartmentFilter) -> Vec<CustomerFocusItem> {
    match filter {
        DepartmentFilter::All => items.to_vec(),
        named => items
            .iter()
            .filter(|item| {
                named.matches(item.to_department.as_deref()) || named.matches(item.from_department.as_deref())
            })
            .cloned()
            .collect(),
    }
}
