//! Credential resolution

use crate::{Error, Result};

/// Authentication credential
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Username
    pub username: String,
    /// Database the user authenticates against
    pub source: String,
    /// Password
    pub password: String,
}

impl Credential {
    /// Driver credential; the mechanism is negotiated by the driver
    pub fn to_driver(&self) -> mongodb::options::Credential {
        let mut credential = mongodb::options::Credential::default();
        credential.username = Some(self.username.clone());
        credential.source = Some(self.source.clone());
        credential.password = Some(self.password.clone());
        credential
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("source", &self.source)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Build zero or one credential.
///
/// No username yields no credential. Otherwise the credential authenticates
/// against `auth_db_name` when set, else against `db_name`.
///
/// # Errors
///
/// Returns [`Error::MissingPassword`] when a username has no password.
pub fn resolve_credentials(
    username: Option<&str>,
    password: Option<&str>,
    db_name: &str,
    auth_db_name: Option<&str>,
) -> Result<Vec<Credential>> {
    let Some(username) = username else {
        return Ok(Vec::new());
    };

    let password = password.ok_or_else(|| Error::MissingPassword {
        username: username.to_string(),
    })?;

    // authDbName usually grants access to all other databases ("admin")
    let source = auth_db_name.unwrap_or(db_name);
    if source.trim().is_empty() {
        return Err(Error::Config(format!(
            "dbName or authDbName is required to authenticate user '{}'",
            username
        )));
    }

    Ok(vec![Credential {
        username: username.to_string(),
        source: source.to_string(),
        password: password.to_string(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_username_no_credential() {
        let creds = resolve_credentials(None, Some("p"), "jobs", Some("admin")).unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn test_targets_db_name_by_default() {
        let creds = resolve_credentials(Some("u"), Some("p"), "jobs", None).unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].username, "u");
        assert_eq!(creds[0].source, "jobs");
        assert_eq!(creds[0].password, "p");
    }

    #[test]
    fn test_auth_db_name_takes_precedence() {
        let creds = resolve_credentials(Some("u"), Some("p"), "jobs", Some("admin")).unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].source, "admin");
    }

    #[test]
    fn test_missing_password_is_config_error() {
        let err = resolve_credentials(Some("u"), None, "jobs", None).unwrap_err();
        assert!(matches!(err, Error::MissingPassword { ref username } if username == "u"));
    }

    #[test]
    fn test_blank_source_is_config_error() {
        let err = resolve_credentials(Some("u"), Some("p"), "", None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let creds = resolve_credentials(Some("u"), Some("p"), "", Some("admin")).unwrap();
        assert_eq!(creds[0].source, "admin");
    }

    #[test]
    fn test_to_driver() {
        let creds = resolve_credentials(Some("u"), Some("p"), "jobs", Some("admin")).unwrap();
        let driver = creds[0].to_driver();
        assert_eq!(driver.username.as_deref(), Some("u"));
        assert_eq!(driver.source.as_deref(), Some("admin"));
        assert_eq!(driver.password.as_deref(), Some("p"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = resolve_credentials(Some("u"), Some("hunter2"), "jobs", None).unwrap();
        let debug_str = format!("{:?}", creds[0]);
        assert!(!debug_str.contains("hunter2"));
    }
}
