use streamchat::adapters::ReqwestHttpClient;
use streamchat::cli::{parse_args, CliCommand, TranscriptPrinter, USAGE, VERSION};
use streamchat::config::ChatConfig;
use streamchat::session::SessionController;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamchat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let options = match parse_args(std::env::args()) {
        Ok(CliCommand::Version) => {
            println!("streamchat {}", VERSION);
            return Ok(());
        }
        Ok(CliCommand::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(CliCommand::Chat(options)) => options,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    color_eyre::install()?;
    init_logging();

    let config = options.apply(ChatConfig::from_env());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config))
}

async fn run(config: ChatConfig) -> Result<()> {
    let client = ReqwestHttpClient::from_config(&config)?;
    tracing::info!("Chatting with {}", config.chat_url());

    let mut controller = SessionController::new(client, config);
    let mut printer = TranscriptPrinter::new(std::io::stdout());
    if let Some(greeting) = controller.conversation().last() {
        printer.print_message(greeting)?;
    }
    let output = printer.status();
    controller.observe(Box::new(printer));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match controller.submit(&line).await {
            Ok(outcome) => {
                tracing::debug!("Exchange {} ended as {:?}", outcome.id, outcome.phase);
            }
            Err(e) => eprintln!("{}", e.user_message()),
        }
        if let Some(e) = output.take_error() {
            return Err(e.into());
        }
    }

    Ok(())
}
