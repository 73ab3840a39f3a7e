#[tokio::main]
async fn main() -> anyhow::Result<()> {
    textcde_server::start().await
}
