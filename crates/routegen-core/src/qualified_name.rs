use std::fmt;

/// Dotted name identifying a namespace member or nested type.
///
/// The qualifier holds every enclosing segment in order, namespaces first and
/// then containing types, so `App.Users.GetUserEndpoint.Endpoint` has the
/// qualifier `["App", "Users", "GetUserEndpoint"]` and the name `Endpoint`.
///
/// # Examples
///
/// ```
/// use routegen_core::QualifiedName;
///
/// let global = QualifiedName::global("Startup");
/// assert_eq!(global.to_string(), "Startup");
///
/// let nested = QualifiedName::new("Endpoint", vec!["App".into(), "GetTimeEndpoint".into()]);
/// assert_eq!(nested.to_string(), "App.GetTimeEndpoint.Endpoint");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Enclosing namespaces and types, outermost first. Empty for the global namespace.
    pub qualifier: Vec<String>,
    /// Simple name (e.g. `IEndpoint`, `GetTimeEndpoint`).
    pub name: String,
}

impl QualifiedName {
    /// Create a qualified name under the given qualifier path.
    pub fn new(name: impl Into<String>, qualifier: Vec<String>) -> Self {
        Self {
            qualifier,
            name: name.into(),
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            qualifier: Vec::new(),
            name: name.into(),
        }
    }

    /// Parse a dotted string such as `Routegen.IEndpoint`.
    ///
    /// A leading `global::` alias qualifier is stripped, so
    /// `global::App.Startup` and `App.Startup` are equal.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.strip_prefix("global::").unwrap_or(s);
        let mut parts: Vec<String> = trimmed
            .split('.')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                qualifier: parts,
                name,
            },
            None => Self::global(""),
        }
    }

    /// Check if this name lives directly in the global namespace.
    pub fn is_global(&self) -> bool {
        self.qualifier.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the qualifier joined with dots.
    pub fn qualifier_string(&self) -> String {
        self.qualifier.join(".")
    }

    /// Create a child name nested inside this one.
    ///
    /// Example: `App.GetTimeEndpoint` + `Endpoint` = `App.GetTimeEndpoint.Endpoint`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut qualifier = self.qualifier.clone();
        qualifier.push(self.name.clone());
        Self {
            qualifier,
            name: name.into(),
        }
    }

    /// Get the enclosing name, if any.
    pub fn parent(&self) -> Option<Self> {
        let (name, rest) = self.qualifier.split_last()?;
        Some(Self {
            qualifier: rest.to_vec(),
            name: name.clone(),
        })
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.qualifier {
            write!(f, "{segment}.")?;
        }
        f.write_str(&self.name)
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_name() {
        let name = QualifiedName::global("Startup");
        assert!(name.is_global());
        assert_eq!(name.to_string(), "Startup");
    }

    #[test]
    fn parse_dotted() {
        let name = QualifiedName::parse("App.Users.GetUserEndpoint");
        assert_eq!(name.name, "GetUserEndpoint");
        assert_eq!(name.qualifier, vec!["App", "Users"]);
        assert_eq!(name.qualifier_string(), "App.Users");
    }

    #[test]
    fn parse_strips_global_alias() {
        assert_eq!(
            QualifiedName::parse("global::Routegen.IEndpoint"),
            QualifiedName::parse("Routegen.IEndpoint")
        );
    }

    #[test]
    fn parse_empty() {
        let empty = QualifiedName::parse("");
        assert_eq!(empty.name, "");
        assert!(empty.is_global());
    }

    #[test]
    fn child_and_parent() {
        let outer = QualifiedName::parse("App.GetTimeEndpoint");
        let handler = outer.child("Handler");
        assert_eq!(handler.to_string(), "App.GetTimeEndpoint.Handler");
        assert_eq!(handler.parent(), Some(outer));
        assert!(QualifiedName::global("int").parent().is_none());
    }

    #[test]
    fn hash_equality() {
        use std::collections::HashSet;

        let a = QualifiedName::parse("Routegen.IEndpoint");
        let b = QualifiedName::new("IEndpoint", vec!["Routegen".into()]);
        let c = QualifiedName::parse("Other.IEndpoint");

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}
