#[tokio::main]
async fn main() {
    stockindex::cli::run().await;
}
