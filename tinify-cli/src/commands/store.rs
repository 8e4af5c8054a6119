use super::{log_metadata, read_input};
use crate::Provider;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tinify_client::TinifyClient;
use tinify_core::storage::{Aws, Gcs, StorageConfiguration};

pub fn execute(
    client: &TinifyClient,
    input: &str,
    path: &str,
    headers: Vec<(String, String)>,
    provider: Provider,
) -> Result<()> {
    let storage = storage_for(provider, headers);

    let data = read_input(input)
        .context("Failed to read input")?;
    tracing::info!("Read {} bytes", data.len());

    let source = client.from_buffer(data)
        .context("Compression failed")?;
    log_metadata(&source);

    let stored = client.to_cloud(&source, path, storage.as_ref())
        .context("Failed to store image")?;

    match stored.location() {
        Some(location) => tracing::info!("Stored {} at {}", path, location),
        None => tracing::info!("Stored {}", path),
    }
    Ok(())
}

fn storage_for(provider: Provider, headers: Vec<(String, String)>) -> Box<dyn StorageConfiguration> {
    let mut options = Map::new();
    if !headers.is_empty() {
        let headers: Map<String, Value> = headers
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect();
        options.insert("headers".to_string(), Value::Object(headers));
    }

    match provider {
        Provider::Aws { region, access_key_id, secret_access_key } => {
            tracing::debug!("Using AWS storage in region: {}", region);
            Box::new(Aws::new(region, secret_access_key, access_key_id).with_options(options))
        }
        Provider::Gcs { access_token } => {
            tracing::debug!("Using Google Cloud Storage");
            Box::new(Gcs::new(access_token).with_options(options))
        }
    }
}
