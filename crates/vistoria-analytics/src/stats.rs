//! Statistics reducer

use serde::{Deserialize, Serialize};
use vistoria_model::{Record, Status};

/// Counters by status over the filtered set
///
/// Statuses outside the three named states count only toward `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl StatusCounts {
    /// Count one record
    #[inline]
    pub fn observe(&mut self, status: &Status) {
        self.total += 1;
        match status {
            Status::Pending => self.pending += 1,
            Status::Completed => self.completed += 1,
            Status::InProgress => self.in_progress += 1,
            Status::Other(_) => {}
        }
    }

    /// Records whose status is none of the named states
    #[inline]
    #[must_use]
    pub fn other(&self) -> usize {
        self.total - self.pending - self.completed - self.in_progress
    }
}

/// Reduce the filtered set to status counters in a single pass
#[must_use]
pub fn reduce(records: &[&Record]) -> StatusCounts {
    records.iter().fold(StatusCounts::default(), |mut acc, r| {
        acc.observe(&r.status);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn with_status(status: &str) -> Record {
        Record::new("r", None, Utc::now(), Status::parse(status))
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(reduce(&[]), StatusCounts::default());
    }

    #[test]
    fn unknown_statuses_count_only_in_total() {
        let records = [
            with_status("pending"),
            with_status("completed"),
            with_status("completed"),
            with_status("in_progress"),
            with_status("cancelled"),
            with_status("COMPLETED"),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let counts = reduce(&refs);

        assert_eq!(
            counts,
            StatusCounts {
                total: 6,
                pending: 1,
                completed: 2,
                in_progress: 1,
            }
        );
        assert_eq!(counts.other(), 2);
    }
}
