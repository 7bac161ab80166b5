use anyhow::bail;
use serde_json::json;

use crate::auth::TokenService;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config;
use crate::database::Datastore;

pub async fn handle(name: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    config.validate()?;

    let store = Datastore::connect(&config.database).await?;
    if store.users.find_by_name(name).await?.is_none() {
        bail!("{} was not found", name);
    }

    let tokens = TokenService::from_config(&config.security)?;
    let token = tokens.issue(name)?;

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            &format!("Issued token for {}", name),
            Some(json!({ "name": name, "token": token })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
