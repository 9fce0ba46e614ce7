//! Resolution of a location inside the remote configuration document into a
//! request URL.
//!
//! A location is a slash-separated path, optionally anchored at an object
//! carrying an `@id` tag. Segments are forwarded verbatim: the admin API
//! accepts whatever addressing the caller writes, so nothing is escaped or
//! validated here.

/// Address of a node in the configuration document.
///
/// With both fields set, `path` is relative to the object tagged with `id`.
/// With neither set, the location is the root `config/` collection. Empty
/// strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: Option<String>,
    id: Option<String>,
}

impl Location {
    /// The root configuration document.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self::default().with_path(path)
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::default().with_id(id)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = non_empty(path.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = non_empty(id.into());
        self
    }

    pub fn path_str(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn id_str(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Build the request URL for `location` under `base`.
///
/// `base` must end with `/` (see `Endpoint::base_url`). Never fails.
pub fn resolve(base: &str, location: &Location) -> String {
    match (location.path_str(), location.id_str()) {
        (None, None) => format!("{base}config/"),
        (path, Some(id)) => {
            let mut url = format!("{base}id/{id}");
            if let Some(path) = path {
                url.push('/');
                url.push_str(strip_leading_separator(path));
            }
            url
        }
        (Some(path), None) => format!("{base}{}", strip_leading_separator(path)),
    }
}

/// Strip exactly one leading `/`.
fn strip_leading_separator(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
