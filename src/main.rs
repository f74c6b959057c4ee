use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chat_widget::{
    config::Cli,
    error::TransportError,
    message::ChatResponse,
    services::{
        render::{OptionButton, format_bubble, format_options},
        transport::{ChatTransport, HttpTransport},
        widget::{ChatWidget, PendingRequest},
    },
};

type Finished = (PendingRequest, Result<ChatResponse, TransportError>);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let http = HttpTransport::new(cli.transport_config()?);
    info!(endpoint = http.endpoint(), "chat client starting");
    let transport: Arc<dyn ChatTransport> = Arc::new(http);

    let mut widget = ChatWidget::new(cli.widget_config());
    let mut printer = Printer::default();
    let (tx, mut rx) = mpsc::unbounded_channel::<Finished>();

    if !cli.no_start {
        if let Some(pending) = widget.begin_start() {
            dispatch(&transport, pending, &tx);
        }
    }
    println!("Type a message, a number to pick an option, or /quit.");
    printer.refresh(&mut widget)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if line.trim() == "/quit" {
                    break;
                }

                if let Some(pending) = widget.begin_line(&line) {
                    dispatch(&transport, pending, &tx);
                }
                printer.refresh(&mut widget)?;
            }
            Some((pending, outcome)) = rx.recv() => {
                widget.complete(&pending, outcome);
                printer.refresh(&mut widget)?;
            }
        }
    }

    Ok(())
}

// Run the request off the input loop so typing stays possible while it is in flight.
fn dispatch(
    transport: &Arc<dyn ChatTransport>,
    pending: PendingRequest,
    tx: &mpsc::UnboundedSender<Finished>,
) {
    let transport = Arc::clone(transport);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = transport.send(&pending.request).await;
        let _ = tx.send((pending, outcome));
    });
}

/// Prints what changed since the last refresh.
#[derive(Default)]
struct Printer {
    shown: usize,
    options: Vec<OptionButton>,
}

impl Printer {
    fn refresh(&mut self, widget: &mut ChatWidget) -> Result<()> {
        let view = widget.view();
        let mut out = std::io::stdout().lock();

        let messages: Vec<_> = view.bubbles.iter().filter(|b| !b.typing).collect();
        for bubble in messages.iter().skip(self.shown) {
            writeln!(out, "{}", format_bubble(bubble))?;
        }
        self.shown = messages.len();

        if view.options != self.options {
            write!(out, "{}", format_options(&view.options))?;
            self.options = view.options;
        }

        if widget.take_scroll_request() {
            out.flush()?;
        }
        Ok(())
    }
}
