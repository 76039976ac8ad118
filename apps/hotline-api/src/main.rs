use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = hotline_api::Args::parse();
	hotline_api::run(args).await
}
