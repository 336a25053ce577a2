use std::collections::HashSet;

use tracing::warn;

use crate::category::Category;
use crate::model::{Assignment, AssignmentRecord, AssignmentsPayload};

/// Filters a flat assignment list by category tag.
pub fn assignments_by_category(
    assignments: &[Assignment],
    category: Category,
) -> impl Iterator<Item = &Assignment> {
    assignments.iter().filter(move |a| a.category == category)
}

/// The assignments of one topic, each with a resolved category. Ids are only
/// unique within a category; the backend numbers each category separately.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    assignments: Vec<Assignment>,
    keys: HashSet<(Category, String)>,
    dropped: usize,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignments<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = Assignment>,
    {
        let mut catalog = Self::new();
        for a in assignments {
            catalog.insert(a);
        }
        catalog
    }

    /// Builds a catalog from either backend shape. Records whose tag is not one
    /// of the four categories never reach the aggregator.
    pub fn from_payload(payload: AssignmentsPayload) -> Self {
        let mut catalog = Self::new();
        match payload {
            AssignmentsPayload::Flat(records) => {
                for record in records {
                    catalog.insert_record(record);
                }
            }
            AssignmentsPayload::Grouped(mut grouped) => {
                for category in Category::ALL {
                    for record in grouped.take_bucket(category) {
                        catalog.insert(record.resolve(category));
                    }
                }
            }
        }
        catalog
    }

    fn insert_record(&mut self, record: AssignmentRecord) {
        let category = record.category.as_deref().and_then(Category::from_tag);
        match category {
            Some(category) => {
                self.insert(record.resolve(category));
            }
            None => {
                warn!(
                    assignment_id = %record.id,
                    tag = record.category.as_deref().unwrap_or(""),
                    "dropping assignment with unknown category"
                );
                self.dropped += 1;
            }
        }
    }

    /// Adds an assignment unless its id is already present in the same
    /// category. First one wins.
    pub fn insert(&mut self, assignment: Assignment) -> bool {
        if !self.keys.insert((assignment.category, assignment.id.clone())) {
            warn!(
                assignment_id = %assignment.id,
                category = %assignment.category,
                "dropping duplicate assignment id"
            );
            self.dropped += 1;
            return false;
        }
        self.assignments.push(assignment);
        true
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn assignments_by_category(&self, category: Category) -> impl Iterator<Item = &Assignment> {
        assignments_by_category(&self.assignments, category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.assignments_by_category(category).count()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Records rejected while building: unknown tags and ids repeated within a category.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
