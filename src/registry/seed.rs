// Startup records

use super::Student;
use serde_json::Value;

/// (fullName, studentID, email, program, year, isInternational)
const SEED: [(&str, &str, &str, &str, i64, bool); 6] = [
    ("Ayesha Perera", "S001", "ayesha.perera@example.com", "Computer Application", 2, false),
    ("Luca Rossi", "S002", "luca.rossi@example.com", "Information Technology", 1, true),
    ("Mei Lin", "S003", "mei.lin@example.com", "Data Science", 3, false),
    ("Carlos James", "S004", "carlos.james@example.com", "Computer Application", 2, true),
    ("Emily Johnson", "S005", "emily.johnson@example.com", "Business Administration", 4, false),
    ("Ali Khan", "S006", "ali.khan@example.com", "Cybersecurity", 1, true),
];

/// The six records present when the process starts, ids 1..=6
pub fn initial_students() -> Vec<Student> {
    SEED.iter()
        .zip(1..)
        .map(
            |(&(full_name, student_id, email, program, year, international), id)| Student {
                id,
                full_name: Some(Value::from(full_name)),
                student_id: Some(Value::from(student_id)),
                email: Some(Value::from(email)),
                program: Some(Value::from(program)),
                year: Some(Value::from(year)),
                is_international: Some(Value::from(international)),
                dob: None,
            },
        )
        .collect()
}
