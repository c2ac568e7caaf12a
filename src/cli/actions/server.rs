use crate::{
    cli::{actions::Action, globals::GlobalArgs},
    finventory,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use tracing::debug;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            token_secret,
            token_ttl,
            frontend_origin,
        } => {
            let parsed = Url::parse(&dsn).context("Invalid database connection string")?;

            match parsed.scheme() {
                "postgres" | "postgresql" => (),
                scheme => return Err(anyhow!("Unsupported DSN scheme: {scheme}")),
            }

            let globals = GlobalArgs::new(
                SecretString::from(token_secret),
                token_ttl,
                frontend_origin,
            );

            debug!("Global args: {:?}", globals);

            finventory::new(port, dsn, &globals).await?;
        }
    }

    Ok(())
}
