use anyhow::Result;

#[path = "kerpic_server/types.rs"]
mod types;
#[path = "kerpic_server/http_error.rs"]
mod http_error;
#[path = "kerpic_server/handlers.rs"]
mod handlers;
#[path = "kerpic_server/routes.rs"]
mod routes;
#[path = "kerpic_server/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    runtime::run().await
}
