use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub token_secret: SecretString,
    pub token_ttl: i64,
    pub frontend_origin: Option<String>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(token_secret: SecretString, token_ttl: i64, frontend_origin: Option<String>) -> Self {
        Self {
            token_secret,
            token_ttl,
            frontend_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(SecretString::from("sekret".to_string()), 3600, None);
        assert_eq!(args.token_secret.expose_secret(), "sekret");
        assert_eq!(args.token_ttl, 3600);
        assert!(args.frontend_origin.is_none());
    }

    #[test]
    fn test_global_args_debug_redacts_secret() {
        let args = GlobalArgs::new(
            SecretString::from("sekret".to_string()),
            3600,
            Some("http://localhost:3000".to_string()),
        );
        let printed = format!("{args:?}");
        assert!(!printed.contains("sekret"));
    }
}
