#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    manudocs_server::run().await
}
