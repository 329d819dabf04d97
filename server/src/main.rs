use orglens_server::core::CoreApp;

#[tokio::main]
async fn main() {
    if let Err(e) = CoreApp::run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
