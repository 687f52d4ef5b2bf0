//! Route matching module
//!
//! Path patterns such as `/api/students/:id`. Literal segments match ASCII
//! case-insensitively and a single trailing slash on the request path is
//! ignored.

/// One segment of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

/// Named values captured from `:param` segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .into_iter()
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Match a request path, capturing percent-decoded parameters
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts = split_path(strip_trailing_slash(path));
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if !lit.eq_ignore_ascii_case(part) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = urlencoding::decode(part)
                        .map_or_else(|_| part.to_string(), std::borrow::Cow::into_owned);
                    params.push((name.clone(), value));
                }
            }
        }

        Some(PathParams(params))
    }
}

fn strip_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Split into segments without the leading slash; `/` has no segments
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_pattern() {
        let root = PathPattern::parse("/");
        assert!(root.matches("/").is_some());
        assert!(root.matches("/viewStudents").is_none());
    }

    #[test]
    fn test_literal_is_case_insensitive() {
        let pattern = PathPattern::parse("/viewStudents");
        assert!(pattern.matches("/viewStudents").is_some());
        assert!(pattern.matches("/VIEWSTUDENTS").is_some());
        assert!(pattern.matches("/viewStudents/").is_some());
        assert!(pattern.matches("/viewStudents//").is_none());
        assert!(pattern.matches("/viewStudents/extra").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("/api/students/:id");
        let params = pattern.matches("/api/students/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("other"), None);

        let params = pattern.matches("/api/students/a%20b/").unwrap();
        assert_eq!(params.get("id"), Some("a b"));

        assert!(pattern.matches("/api/students").is_none());
        assert!(pattern.matches("/api/students/").is_none());
        assert!(pattern.matches("/api/students/1/2").is_none());
    }
}
