//! HTML views
//!
//! The landing page and the student listing page.

use crate::registry::{display_text, Student};
use serde_json::Value;
use std::fmt::Write;

/// Title of the student listing page
pub const STUDENT_LIST_TITLE: &str = "Registered Student List";

/// Escape text for safe inclusion in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
<nav><a href="/">Home</a> | <a href="/viewStudents">View Students</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Landing page
pub fn render_index() -> String {
    layout(
        "Student Management System",
        r#"<h1>Student Management System</h1>
<p>Browse the <a href="/viewStudents">registered students</a> or use the REST API:</p>
<ul>
<li><code>GET /api/students</code></li>
<li><code>GET /api/students/:id</code></li>
<li><code>POST /api/students</code></li>
<li><code>PUT /api/students/:id</code></li>
<li><code>DELETE /api/students/:id</code></li>
</ul>"#,
    )
}

/// Escaped table cell text; an unset field is an empty cell
fn cell(value: Option<&Value>) -> String {
    value
        .map(|v| escape_html(&display_text(v)))
        .unwrap_or_default()
}

/// Listing page with one table row per student, in registry order
pub fn render_student_list(title: &str, students: &[Student]) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_html(title));

    if students.is_empty() {
        body.push_str("<p>No students registered.</p>");
        return layout(title, &body);
    }

    body.push_str(
        "<table>\n<thead><tr><th>ID</th><th>Full Name</th><th>Student ID</th><th>Email</th>\
         <th>Program</th><th>Year</th><th>International</th></tr></thead>\n<tbody>\n",
    );

    for s in students {
        let international = match &s.is_international {
            Some(Value::Bool(true)) => "Yes".to_string(),
            Some(Value::Bool(false)) => "No".to_string(),
            other => cell(other.as_ref()),
        };
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            s.id,
            cell(s.full_name.as_ref()),
            cell(s.student_id.as_ref()),
            cell(s.email.as_ref()),
            cell(s.program.as_ref()),
            cell(s.year.as_ref()),
            international,
        );
    }

    body.push_str("</tbody>\n</table>");
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StudentRegistry;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"O'Neil" & co</b>"#),
            "&lt;b&gt;&quot;O&#39;Neil&quot; &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn test_list_renders_rows_in_order() {
        let registry = StudentRegistry::default();
        let html = render_student_list(STUDENT_LIST_TITLE, registry.list());

        assert!(html.contains("<title>Registered Student List</title>"));
        assert_eq!(html.matches("<tr><td>").count(), 6);
        let first = html.find("Ayesha Perera").unwrap();
        let last = html.find("Ali Khan").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_list_escapes_names() {
        let mut registry = StudentRegistry::new(Default::default());
        registry.create(crate::registry::NewStudent {
            full_name: Some(Value::from("<script>alert(1)</script>")),
            ..Default::default()
        });
        let html = render_student_list(STUDENT_LIST_TITLE, registry.list());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_list_prints_loose_values() {
        let mut registry = StudentRegistry::new(Default::default());
        registry.create(crate::registry::NewStudent {
            full_name: Some(serde_json::json!(["A", "B"])),
            year: Some(Value::from("second")),
            is_international: Some(Value::from("yes")),
            ..Default::default()
        });
        let html = render_student_list(STUDENT_LIST_TITLE, registry.list());
        assert!(html.contains("<td>A,B</td>"));
        assert!(html.contains("<td>second</td><td>yes</td>"));
    }

    #[test]
    fn test_empty_list() {
        let html = render_student_list(STUDENT_LIST_TITLE, &[]);
        assert!(html.contains("No students registered."));
    }
}
