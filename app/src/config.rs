use log::warn;

/// Environment variable holding the comma-separated admin allow-list.
pub const ADMIN_EMAILS_ENV: &str = "VETCLINIC_ADMIN_EMAILS";

/// Application configuration.
///
/// The admin e-mail allow-list bypasses the stored role flags: any session
/// whose e-mail appears here resolves to ADMIN before the store is consulted.
/// Mixing a configured trust list with the data-driven role store is inherited
/// behavior and is flagged for review; keep the list empty unless bootstrap
/// access is genuinely needed.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    admin_emails: Vec<String>,
}

impl AppConfig {
    /// Build a config with an explicit allow-list. Entries are trimmed and
    /// lower-cased; blanks are dropped.
    pub fn new<I, S>(admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let admin_emails: Vec<String> = admin_emails
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !admin_emails.is_empty() {
            warn!(
                "admin allow-list configured with {} entry(ies); these accounts bypass stored role flags",
                admin_emails.len()
            );
        }
        Self { admin_emails }
    }

    /// Read the allow-list from `VETCLINIC_ADMIN_EMAILS` (comma-separated).
    /// A missing variable yields an empty list.
    pub fn from_env() -> Self {
        let raw = std::env::var(ADMIN_EMAILS_ENV).unwrap_or_default();
        Self::new(raw.split(','))
    }

    /// Whether `email` is on the admin allow-list (case-insensitive).
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| e == &email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_case_insensitive_and_trimmed() {
        let config = AppConfig::new(["  Boss@Clinic.Example ", "", "root@clinic.example"]);
        assert!(config.is_admin_email("boss@clinic.example"));
        assert!(config.is_admin_email("BOSS@CLINIC.EXAMPLE"));
        assert!(config.is_admin_email("root@clinic.example"));
        assert!(!config.is_admin_email("someone@clinic.example"));
    }

    #[test]
    fn from_env_reads_the_comma_separated_variable() {
        std::env::set_var(ADMIN_EMAILS_ENV, " Boss@Clinic.Example ,root@clinic.example,");
        let config = AppConfig::from_env();
        std::env::remove_var(ADMIN_EMAILS_ENV);
        assert!(config.is_admin_email("boss@clinic.example"));
        assert!(config.is_admin_email("root@clinic.example"));
        assert!(!config.is_admin_email("someone@clinic.example"));
    }

    #[test]
    fn empty_config_matches_nothing() {
        let config = AppConfig::default();
        assert!(!config.is_admin_email("boss@clinic.example"));
        assert!(!config.is_admin_email(""));
    }
}
