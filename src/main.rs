#[tokio::main]
async fn main() {
  if let Err(e) = fitmentor_lib::run().await {
    eprintln!("fitmentor: {}", e);
    std::process::exit(1);
  }
}
