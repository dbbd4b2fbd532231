use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::router::handle;
use astra::Server;
use std::net::SocketAddr;

mod classify;
mod config;
mod db;
mod detect;
mod errors;
mod fetcher;
mod fingerprint;
mod mailer;
mod monitor;
mod responses;
mod router;

#[cfg(test)]
mod tests;

fn main() {
    let config = Config::from_env();

    let db = Database::new(config.db_path.clone());

    if let Err(e) = init_db(&db, "sql/schema.sql") {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // Daily check cycle runs on its own thread. The server below only
    // serves the liveness probe and the on-demand trigger.
    monitor::scheduler::start_daily(db.clone(), config.clone());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse().unwrap();
    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(4);

    let result = server.serve(move |req, _info| match handle(req, &db, &config) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
