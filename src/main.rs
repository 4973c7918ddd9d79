use anyhow::{Context, Result};
use grin::error::GrinError;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: grin <encode|decode> <infile> <outfile>";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, infile, outfile] if cmd.as_str() == "encode" => {
            grin::encode(infile, outfile).with_context(|| format!("encoding {infile}"))?
        }
        [cmd, infile, outfile] if cmd.as_str() == "decode" => {
            grin::decode(infile, outfile).with_context(|| format!("decoding {infile}"))?
        }
        _ => return Err(GrinError::InvalidUsage(USAGE.into()).into()),
    }
    Ok(())
}
