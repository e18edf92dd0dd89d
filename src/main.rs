use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = gmail_mailer::cli::Cli::parse();
    gmail_mailer::logging::init(cli.verbose);

    if let Err(err) = gmail_mailer::run(cli).await {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
