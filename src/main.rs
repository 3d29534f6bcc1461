#[tokio::main]
async fn main() -> std::io::Result<()> {
    tank_arena::run_with_config().await
}
