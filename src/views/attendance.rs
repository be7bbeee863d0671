//! Survey attendance buckets and chart slices.

use std::collections::BTreeMap;

use crate::model::{AttendanceDepartments, AttendanceStats};

/// Groups `items` by `key`, keeping each group in input order.
pub fn partition_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut buckets: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        buckets.entry(key(&item)).or_default().push(item);
    }
    buckets
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttendanceStatus {
    OnTime,
    Late,
    Missed,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [AttendanceStatus::OnTime, AttendanceStatus::Late, AttendanceStatus::Missed];

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::OnTime => "On Time",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Missed => "Missed",
        }
    }
}

/// One department's punctuality for the current period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub department: String,
    pub status: AttendanceStatus,
}

/// Department names per punctuality bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceBuckets {
    buckets: BTreeMap<AttendanceStatus, Vec<String>>,
}

impl AttendanceBuckets {
    pub fn from_records(records: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        let buckets = partition_by(records, |r| r.status)
            .into_iter()
            .map(|(status, rows)| (status, rows.into_iter().map(|r| r.department).collect()))
            .collect();
        Self { buckets }
    }

    /// Flattens the server's per-bucket name lists.
    pub fn from_departments(departments: &AttendanceDepartments) -> Self {
        let tagged = [
            (AttendanceStatus::OnTime, &departments.on_time_departments),
            (AttendanceStatus::Late, &departments.late_departments),
            (AttendanceStatus::Missed, &departments.missed_departments),
        ];
        Self::from_records(tagged.into_iter().flat_map(|(status, names)| {
            names.iter().map(move |name| AttendanceRecord { department: name.clone(), status })
        }))
    }

    pub fn names(&self, status: AttendanceStatus) -> &[String] {
        self.buckets.get(&status).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn count(&self, status: AttendanceStatus) -> usize {
        self.names(status).len()
    }
}

/// A pie-chart slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceSlice {
    pub status: AttendanceStatus,
    pub label: &'static str,
    pub value: u32,
}

/// On time, late and missed slices; absent stats count as zero.
pub fn attendance_slices(stats: Option<&AttendanceStats>) -> [AttendanceSlice; 3] {
    let stats = stats.copied().unwrap_or_default();
    AttendanceStatus::ALL.map(|status| AttendanceSlice {
        status,
        label: status.label(),
        value: match status {
            AttendanceStatus::OnTime => stats.on_time,
            AttendanceStatus::Late => stats.late,
            AttendanceStatus::Missed => stats.missed,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keeps_input_order_within_buckets() {
        let grouped = partition_by(vec![3, 8, 5, 2, 7], |n| n % 2 == 0);
        assert_eq!(grouped[&false], vec![3, 5, 7]);
        assert_eq!(grouped[&true], vec![8, 2]);
    }

    #[test]
    fn buckets_expose_names_and_counts() {
        let departments = AttendanceDepartments {
            on_time_departments: vec!["HR".into(), "IT".into()],
            late_departments: vec![],
            missed_departments: vec!["Finance".into()],
            missed_count: 1,
        };
        let buckets = AttendanceBuckets::from_departments(&departments);
        assert_eq!(buckets.names(AttendanceStatus::OnTime), ["HR".to_string(), "IT".to_string()]);
        assert_eq!(buckets.count(AttendanceStatus::Late), 0);
        assert!(buckets.names(AttendanceStatus::Late).is_empty());
        assert_eq!(buckets.count(AttendanceStatus::Missed), 1);
    }

    #[test]
    fn missing_stats_give_zero_slices() {
        let slices = attendance_slices(None);
        assert!(slices.iter().all(|s| s.value == 0));
        assert_eq!(slices[0].label, "On Time");

        let stats = AttendanceStats { on_time: 4, late: 1, missed: 2 };
        let values: Vec<u32> = attendance_slices(Some(&stats)).iter().map(|s| s.value).collect();
        assert_eq!(values, vec![4, 1, 2]);
    }
}
