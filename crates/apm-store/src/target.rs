use std::fmt;

/// Connection string for the document store, as read from configuration.
///
/// Opaque to this crate: the driver interprets it. `Display` and `Debug`
/// mask the password so targets can be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget(String);

impl ConnectionTarget {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw connection string, credentials included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme, e.g. `mongodb` or `mongodb+srv`.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// Host list between the userinfo and the path, e.g. `h1:27017,h2:27017`.
    pub fn hosts(&self) -> Option<&str> {
        let (_, rest) = self.0.split_once("://")?;
        let authority = rest.split(['/', '?']).next().unwrap_or(rest);
        let hosts = match authority.rfind('@') {
            Some(at) => &authority[at + 1..],
            None => authority,
        };
        Some(hosts)
    }

    /// The target with any password replaced by `****`.
    pub fn redacted(&self) -> String {
        let Some((scheme, rest)) = self.0.split_once("://") else {
            return self.0.clone();
        };
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let authority = &rest[..authority_end];
        let Some(at) = authority.rfind('@') else {
            return self.0.clone();
        };
        let userinfo = &authority[..at];
        let user = match userinfo.split_once(':') {
            Some((user, _)) => format!("{user}:****"),
            None => userinfo.to_string(),
        };
        format!("{scheme}://{user}{}", &rest[at..])
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionTarget({})", self.redacted())
    }
}
