use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = zill_api::Args::parse();

	zill_api::run(args).await
}
