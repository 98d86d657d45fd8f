use lobby_api::api::Api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Api::launch().await
}
