//! `freeze-watch` -- one-shot CloudTrail change-freeze notifier.
//!
//! Meant to be started by a scheduler. Each run looks back over the
//! configured window and mails one notice per matching event, then exits.
//! See [`freeze_watch::config`] for the environment variables.

use chrono::Utc;
use mailer::SesMailer;
use tracing_subscriber::EnvFilter;

use freeze_watch::config::Config;
use freeze_watch::runner;
use freeze_watch::source::CloudTrailSource;


#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("freeze_watch=info,mailer=info")),
        )
        .init();

    let config = Config::from_env().unwrap_or_else(|err| {
        tracing::error!("Invalid configuration: {}", err);
        std::process::exit(1);
    });

    let aws_config = aws_config::load_from_env().await;
    let source = CloudTrailSource::new(aws_sdk_cloudtrail::Client::new(&aws_config), config.max_pages);
    let mailer = SesMailer::new(aws_sdk_sesv2::Client::new(&aws_config));

    let report = runner::run(&source, &mailer, &config, Utc::now()).await;
    tracing::debug!("Run report: {:?}", report);
}
