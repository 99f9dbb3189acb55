use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kinethos")]
#[command(author, version, about = "Telegram webhook for KinethosBot", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve the webhook over HTTP (BIND_ADDR, WEBHOOK_PATH)
    Serve,

    /// Run inside the AWS Lambda runtime
    Lambda,

    /// Register the webhook URL with Telegram, passing WEBHOOK_SECRET_TOKEN
    SetWebhook {
        /// Public HTTPS URL Telegram should deliver updates to
        #[arg(long)]
        url: url::Url,
    },

    /// Remove the registered webhook
    DeleteWebhook,

    /// Publish the command menu shown by Telegram clients
    SetCommands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Commands {
    /// Transport used when no subcommand is given: Lambda inside the Lambda
    /// sandbox (`AWS_LAMBDA_RUNTIME_API` is set), the HTTP server elsewhere.
    pub fn default_for(lambda_runtime_api: Option<&str>) -> Self {
        match lambda_runtime_api {
            Some(api) if !api.is_empty() => Self::Lambda,
            _ => Self::Serve,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transport() {
        assert_eq!(Commands::default_for(Some("127.0.0.1:9001")), Commands::Lambda);
        assert_eq!(Commands::default_for(Some("")), Commands::Serve);
        assert_eq!(Commands::default_for(None), Commands::Serve);
    }

    #[test]
    fn test_parse_set_webhook() {
        let cli = Cli::try_parse_from(["kinethos", "set-webhook", "--url", "https://example.com/bot"]).unwrap();
        match cli.command {
            Some(Commands::SetWebhook { url }) => assert_eq!(url.as_str(), "https://example.com/bot"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(Cli::try_parse_from(["kinethos", "set-webhook", "--url", "not a url"]).is_err());
    }
}
