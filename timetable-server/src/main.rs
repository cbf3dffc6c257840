use std::{env, io, process, sync::Arc};

use tokio::{net::TcpListener, signal};

use timetable_server::{router, Store};

mod cli;

fn setup_logging() {
    if env::var("TIMETABLE_LOG").is_err() {
        env::set_var("TIMETABLE_LOG", "timetable_server=info");
    }

    pretty_env_logger::init_custom_env("TIMETABLE_LOG");
}

#[tokio::main]
async fn main() -> io::Result<()> {
    setup_logging();
    let args = cli::parse(env::args().skip(1).collect());

    let store = match Store::open(&args.data_dir).await {
        Ok(store) => store,
        Err(err) => {
            log::error!("Failed to open {}: {err}", args.data_dir.display());
            process::exit(1);
        }
    };

    let listener = TcpListener::bind(args.address).await?;
    log::info!(
        "Listening at http://{} with data in {}",
        args.address,
        args.data_dir.display()
    );

    axum::serve(listener, router(Arc::new(store)))
        .with_graceful_shutdown(async {
            if let Err(err) = signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {err}");
            }
        })
        .await
}
