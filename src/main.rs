#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bookstore_app::run().await
}
