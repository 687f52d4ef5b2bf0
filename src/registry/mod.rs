//! Student registry
//!
//! In-memory ordered collection of student records addressed by numeric id.
//! Insertion order is both storage order and listing order.

pub mod input;
mod seed;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use input::{decode_body, display_text, BodyError, FieldMap, RequestedId};

/// A single student record
///
/// Only `id` is typed. Every other field holds whatever value the client
/// supplied; `None` means the field was never set and is left out of the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Value>,
    #[serde(rename = "studentID", default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_international: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<Value>,
}

/// Fields supplied when creating a record
///
/// Nothing is required and nothing is checked; each supplied value is stored
/// as given, including `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewStudent {
    pub full_name: Option<Value>,
    pub student_id: Option<Value>,
    pub email: Option<Value>,
    pub program: Option<Value>,
    pub year: Option<Value>,
    pub is_international: Option<Value>,
}

impl NewStudent {
    pub fn from_fields(fields: &FieldMap) -> Self {
        let field = |key: &str| fields.get(key).cloned();
        Self {
            full_name: field("fullName"),
            student_id: field("studentID"),
            email: field("email"),
            program: field("program"),
            year: field("year"),
            is_international: field("isInternational"),
        }
    }
}

/// Partial update of an existing record
///
/// `Some` fields replace the stored value; `None` keeps it. Built from a
/// request body, a field is only `Some` when its supplied value is truthy, so
/// `year: 0` or `fullName: ""` leave the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub full_name: Option<Value>,
    pub student_id: Option<Value>,
    pub email: Option<Value>,
    pub program: Option<Value>,
    pub year: Option<Value>,
    pub dob: Option<Value>,
    /// Set only by the literal string `"true"`; the flag is never cleared
    pub mark_international: bool,
}

impl StudentPatch {
    pub fn from_fields(fields: &FieldMap) -> Self {
        let truthy = |key: &str| {
            fields
                .get(key)
                .filter(|v| input::is_truthy(Some(*v)))
                .cloned()
        };

        Self {
            full_name: truthy("fullName"),
            student_id: truthy("studentID"),
            email: truthy("email"),
            program: truthy("program"),
            year: truthy("year"),
            dob: truthy("dob"),
            mark_international: fields.get("isInternational").and_then(Value::as_str)
                == Some("true"),
        }
    }

    fn apply(self, student: &mut Student) {
        let replace = |slot: &mut Option<Value>, value: Option<Value>| {
            if value.is_some() {
                *slot = value;
            }
        };

        replace(&mut student.full_name, self.full_name);
        replace(&mut student.student_id, self.student_id);
        replace(&mut student.email, self.email);
        replace(&mut student.program, self.program);
        replace(&mut student.year, self.year);
        replace(&mut student.dob, self.dob);
        if self.mark_international {
            student.is_international = Some(Value::Bool(true));
        }
    }
}

/// Policy used to assign ids on create
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// `current length + 1`; may hand out an id that is still in use after a delete
    #[default]
    LengthPlusOne,
    /// One past the highest id ever assigned; ids are never reused
    Monotonic,
}

/// Registry error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Student with ID {id} not found.")]
    NotFound { id: RequestedId },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Ordered in-memory student collection
#[derive(Debug, Clone)]
pub struct StudentRegistry {
    students: Vec<Student>,
    id_policy: IdPolicy,
    /// Highest id ever assigned, for the monotonic policy
    high_water: i64,
}

impl StudentRegistry {
    /// Create an empty registry
    pub const fn new(id_policy: IdPolicy) -> Self {
        Self {
            students: Vec::new(),
            id_policy,
            high_water: 0,
        }
    }

    /// Create a registry holding the six startup records
    pub fn seeded(id_policy: IdPolicy) -> Self {
        Self::with_students(seed::initial_students(), id_policy)
    }

    pub fn with_students(students: Vec<Student>, id_policy: IdPolicy) -> Self {
        let high_water = students.iter().map(|s| s.id).max().unwrap_or(0);
        Self {
            students,
            id_policy,
            high_water,
        }
    }

    /// All records in insertion order
    pub fn list(&self) -> &[Student] {
        &self.students
    }

    /// First record whose id matches
    pub fn get(&self, id: impl Into<RequestedId>) -> RegistryResult<&Student> {
        let id = id.into();
        self.students
            .iter()
            .find(|s| id.matches(s.id))
            .ok_or(RegistryError::NotFound { id })
    }

    /// Append a new record and return its assigned id
    pub fn create(&mut self, new: NewStudent) -> i64 {
        let id = self.next_id();
        self.high_water = self.high_water.max(id);
        self.students.push(Student {
            id,
            full_name: new.full_name,
            student_id: new.student_id,
            email: new.email,
            program: new.program,
            year: new.year,
            is_international: new.is_international,
            dob: None,
        });
        id
    }

    /// Apply a partial update and return the updated record
    pub fn update(
        &mut self,
        id: impl Into<RequestedId>,
        patch: StudentPatch,
    ) -> RegistryResult<&Student> {
        let index = self.position(id.into())?;
        let student = &mut self.students[index];
        patch.apply(student);
        Ok(&*student)
    }

    /// Remove exactly one record and return it
    pub fn delete(&mut self, id: impl Into<RequestedId>) -> RegistryResult<Student> {
        let index = self.position(id.into())?;
        Ok(self.students.remove(index))
    }

    fn position(&self, id: RequestedId) -> RegistryResult<usize> {
        self.students
            .iter()
            .position(|s| id.matches(s.id))
            .ok_or(RegistryError::NotFound { id })
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_id(&self) -> i64 {
        match self.id_policy {
            IdPolicy::LengthPlusOne => self.students.len() as i64 + 1,
            IdPolicy::Monotonic => self.high_water + 1,
        }
    }
}

impl Default for StudentRegistry {
    fn default() -> Self {
        Self::seeded(IdPolicy::default())
    }
}
