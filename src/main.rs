mod client;
mod defines;
mod impls;
mod logging;
mod prompt;
mod types;
mod util;

use clap::Parser;
use client::FuturesClient;
use prompt::Prompter;
use std::io;
use std::time::Duration;
use tracing::dispatcher::{self, Dispatch};
use tracing::{error, info, warn};
use types::*;

/// Exit gracefully on Ctrl-C instead of dying mid-prompt.
/// The handler runs on its own thread, blocking reads on stdin are left behind.
fn install_interrupt_handler(dispatch: Dispatch) {
    let handler_dispatch = dispatch.clone();
    let installed = ctrlc::set_handler(move || {
        println!("\nBot stopped by user.");
        dispatcher::with_default(&handler_dispatch, || info!("session interrupted by user"));
        std::process::exit(0);
    });

    if let Err(e) = installed {
        dispatcher::with_default(&dispatch, || warn!("unable to install Ctrl-C handler: {}", e));
    }
}

fn main() {
    // parse arguments via clap
    let cmd_args = CommandlineArgs::parse();
    let use_testnet = !cmd_args.mainnet;
    let network = if use_testnet { "Testnet" } else { "Mainnet" };

    let dispatch = match logging::build_dispatch(&cmd_args.log_file) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("Error: unable to open log file {}: {}", cmd_args.log_file.display(), e);
            std::process::exit(1);
        }
    };
    install_interrupt_handler(dispatch.clone());

    println!("=== Binance Futures {} Trading Bot ===", network);
    println!("\nEnter your Binance {} Credentials:", network);

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let credentials = match prompter.read_credentials() {
        Ok(Some(credentials)) => credentials,
        Ok(None) => {
            println!("Credentials missing. Exiting.");
            return;
        }
        Err(e) => {
            eprintln!("Error: unable to read credentials: {}", e);
            std::process::exit(1);
        }
    };

    let settings = ClientSettings {
        recv_window_ms: cmd_args.recv_window,
        timeout: Duration::from_secs(cmd_args.timeout),
    };

    // the only fatal failure: without a client there is nothing to do
    let client = match FuturesClient::new(credentials, use_testnet, &settings, dispatch.clone()) {
        Ok(client) => client,
        Err(_) => std::process::exit(1),
    };

    let outcome = prompter.run(|request| {
        // outcome is logged by the client, loop always goes back to prompting
        let _ = client.place_order(request);
    });

    dispatcher::with_default(&dispatch, || match outcome {
        Ok(()) => info!("session ended by user ({})", client.base_url()),
        Err(e) => {
            error!("terminal i/o failed: {}", e);
            std::process::exit(1);
        }
    });
}
