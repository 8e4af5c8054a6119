use anyhow::Result;
use clap::{Parser, Subcommand};
use tinify_client::TinifyClient;
use tinify_core::{ImageType, Preserve, ResizeMethod};

mod commands;

#[derive(Parser)]
#[command(name = "tinify")]
#[command(about = "Compress images with the Tinify API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key of the Tinify account
    #[arg(long, env = "TINIFY_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Tinify API base URL
    #[arg(long, env = "TINIFY_BASE_URL", default_value = tinify_client::DEFAULT_BASE_URL)]
    base_url: String,

    /// Logging level
    #[arg(long, env = "TINIFY_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a local image
    Compress {
        /// Input image (use '-' for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Compress an image the service downloads from a URL
    Url {
        /// Absolute URL of the image
        url: String,

        /// Output file (use '-' for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,

        /// Reject URLs that are not http or https
        #[arg(long)]
        http_only: bool,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Compress a local image and store the result in a cloud bucket
    Store {
        /// Input image (use '-' for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Destination as bucket/path/to/file
        #[arg(short, long)]
        path: String,

        /// Extra header for the stored object, as NAME=VALUE (repeatable)
        #[arg(long = "header", value_parser = parse_key_value)]
        headers: Vec<(String, String)>,

        #[command(subcommand)]
        provider: Provider,
    },
}

/// At most one transform per run; the service applies one per request.
#[derive(clap::Args, Debug, Default)]
#[group(multiple = false)]
pub struct TransformArgs {
    /// Resize as METHOD:WIDTHxHEIGHT, e.g. fit:150x100 or scale:300x
    #[arg(long, value_parser = parse_resize)]
    pub resize: Option<tinify_core::Resize>,

    /// Convert to the given format
    #[arg(long, value_enum)]
    pub convert: Option<ImageTypeArg>,

    /// Metadata to keep from the original (repeatable)
    #[arg(long, value_enum)]
    pub preserve: Vec<PreserveArg>,
}

#[derive(Subcommand)]
pub enum Provider {
    /// Amazon S3
    Aws {
        #[arg(long, env = "AWS_REGION")]
        region: String,

        #[arg(long, env = "AWS_ACCESS_KEY_ID")]
        access_key_id: String,

        #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
        secret_access_key: String,
    },

    /// Google Cloud Storage
    Gcs {
        #[arg(long, env = "GCP_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ImageTypeArg {
    Avif,
    Webp,
    Jpeg,
    Png,
    /// Whichever format is smallest
    Smallest,
}

impl From<ImageTypeArg> for ImageType {
    fn from(arg: ImageTypeArg) -> Self {
        match arg {
            ImageTypeArg::Avif => ImageType::Avif,
            ImageTypeArg::Webp => ImageType::WebP,
            ImageTypeArg::Jpeg => ImageType::Jpeg,
            ImageTypeArg::Png => ImageType::Png,
            ImageTypeArg::Smallest => ImageType::Smallest,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum PreserveArg {
    Copyright,
    Creation,
    Location,
}

impl From<PreserveArg> for Preserve {
    fn from(arg: PreserveArg) -> Self {
        match arg {
            PreserveArg::Copyright => Preserve::Copyright,
            PreserveArg::Creation => Preserve::Creation,
            PreserveArg::Location => Preserve::Location,
        }
    }
}

fn parse_key_value(value: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", value))?;
    if name.trim().is_empty() {
        return Err("header name must not be empty".to_string());
    }
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn parse_resize(value: &str) -> std::result::Result<tinify_core::Resize, String> {
    let (method, size) = value
        .split_once(':')
        .ok_or_else(|| format!("expected METHOD:WIDTHxHEIGHT, got '{}'", value))?;
    let method: ResizeMethod = method.parse().map_err(|e| format!("{}", e))?;
    let (width, height) = size
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", size))?;

    let dimension = |raw: &str| -> std::result::Result<Option<u32>, String> {
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<u32>()
            .map(Some)
            .map_err(|_| format!("invalid dimension '{}'", raw))
    };

    let resize = tinify_core::Resize::new(method, dimension(width)?, dimension(height)?);
    resize.validate().map_err(|e| e.to_string())?;
    Ok(resize)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout may carry image bytes
    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Tinify CLI starting");

    let http_only = matches!(cli.command, Commands::Url { http_only: true, .. });
    let client = TinifyClient::builder(&cli.api_key)
        .base_url(&cli.base_url)
        .http_only_urls(http_only)
        .build()?;

    match cli.command {
        Commands::Compress { input, output, transform } => {
            commands::compress::execute(&client, &input, &output, &transform)?;
        }
        Commands::Url { url, output, transform, .. } => {
            commands::url::execute(&client, &url, &output, &transform)?;
        }
        Commands::Store { input, path, headers, provider } => {
            commands::store::execute(&client, &input, &path, headers, provider)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resize() {
        let resize = parse_resize("fit:150x100").unwrap();
        assert_eq!(resize, tinify_core::Resize::fit(150, 100));

        let resize = parse_resize("scale:300x").unwrap();
        assert_eq!(resize, tinify_core::Resize::scale_to_width(300));

        assert!(parse_resize("scale:300x200").is_err());
        assert!(parse_resize("fit150x100").is_err());
        assert!(parse_resize("fit:axb").is_err());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("Cache-Control=public, max-age=60").unwrap(),
            ("Cache-Control".to_string(), "public, max-age=60".to_string())
        );
        assert!(parse_key_value("no-separator").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_transform_flags_are_exclusive() {
        let result = Cli::try_parse_from([
            "tinify",
            "--api-key",
            "key",
            "compress",
            "--resize",
            "fit:10x10",
            "--convert",
            "webp",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_store_parses_provider() {
        let cli = Cli::try_parse_from([
            "tinify",
            "--api-key",
            "key",
            "store",
            "--input",
            "cat.png",
            "--path",
            "bucket/cat.png",
            "--header",
            "Cache-Control=public",
            "gcs",
            "--access-token",
            "token",
        ])
        .unwrap();

        match cli.command {
            Commands::Store { path, headers, provider, .. } => {
                assert_eq!(path, "bucket/cat.png");
                assert_eq!(headers, vec![("Cache-Control".to_string(), "public".to_string())]);
                assert!(matches!(provider, Provider::Gcs { .. }));
            }
            _ => panic!("expected store command"),
        }
    }
}
