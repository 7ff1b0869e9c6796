//! AMAP Togo point-of-sale terminal
//!
//! Interactive storefront cart: browse the catalog, build a cart that
//! survives restarts, fill the delivery form and submit the order to the
//! hosted backend's order-creation procedure.

use std::{
    io::{BufRead, Write},
    process,
};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use panier::{
    orders::OrderGateway,
    prelude::{CartStore, CatalogEntry, JsonFileStorage},
};
use panier_client::{CatalogClient, RpcOrderGateway};

use crate::{
    config::PosConfig,
    session::{Command, OfflineGateway, Session, parse_command},
};

mod catalog;
mod config;
mod session;

/// Point-of-sale entry point.
#[tokio::main]
async fn main() {
    let config = PosConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();

    let backend = config.backend.backend_config();

    let gateway: Box<dyn OrderGateway> = match &backend {
        Some(backend) => Box::new(RpcOrderGateway::new(backend.clone())),
        None => {
            info!("no backend configured, checkout will be offline");

            Box::new(OfflineGateway)
        }
    };

    let entries = load_catalog(&config, backend.clone().map(CatalogClient::new)).await;

    let storage = JsonFileStorage::new(&config.session.cart_file);

    let store = match CartStore::restore(storage) {
        Ok(store) => store,
        Err(error) => {
            warn!(%error, "could not restore cart state, starting empty");

            CartStore::new(JsonFileStorage::new(&config.session.cart_file))
        }
    };

    if !store.cart().is_empty() {
        info!(
            lines = store.cart().len(),
            "restored cart from previous session"
        );
    }

    let session = Session::new(entries, store, gateway, &config.session.receipt_dir);

    run(session).await;
}

/// Catalog preference order: backend, named fixture file, bundled demo.
async fn load_catalog(config: &PosConfig, client: Option<CatalogClient>) -> Vec<CatalogEntry> {
    if let Some(client) = client {
        match client.list_all().await {
            Ok(entries) => return entries,
            Err(error) => warn!(%error, "catalog fetch failed, falling back to fixture"),
        }
    }

    let loaded = match &config.session.catalog_file {
        Some(path) => catalog::load_file(path),
        None => catalog::demo_catalog(),
    };

    loaded.unwrap_or_else(|error| {
        warn!(%error, "could not load catalog fixture");

        Vec::new()
    })
}

#[expect(
    clippy::print_stdout,
    reason = "the terminal session is the user interface"
)]
async fn run(mut session: Session<JsonFileStorage>) {
    println!("AMAP Togo point of sale. Type 'help' for commands.");

    let stdin = std::io::stdin();

    loop {
        print!("> ");
        _ = std::io::stdout().flush();

        let mut input = String::new();

        match stdin.lock().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "failed to read input");

                break;
            }
        }

        let command = match parse_command(&input) {
            Ok(command) => command,
            Err(session::ParseError::Empty) => continue,
            Err(error) => {
                println!("{error}");

                continue;
            }
        };

        if command == Command::Quit {
            println!("À bientôt.");

            break;
        }

        match session.handle(command).await {
            Ok(message) => println!("{message}"),
            Err(error) => println!("Error: {error}"),
        }
    }
}
