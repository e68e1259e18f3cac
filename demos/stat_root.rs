use anyhow::Context as _;

use vgfs_client::{Client, FsString};

/// Minimal driver for a running VGFS server: probe it, open a session,
/// and print the root object's metadata snapshot.
///
/// Usage: statroot [ADDR] [VOLUME_GROUP]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:2323".to_string());
    let vg = args.next().unwrap_or_else(|| "default".to_string());

    let mut client = Client::connect(addr.as_str())
        .await
        .with_context(|| format!("connecting to {addr}"))?;

    client.nop().await.context("liveness probe")?;

    let root = client
        .login(&FsString::from("statroot"), &FsString::from(vg.as_str()))
        .await
        .with_context(|| format!("logging in to volume group {vg}"))?;

    let attr = client.stat(&root).await.context("stat of root handle")?;

    println!("root of {vg} on {addr}:");
    println!("  mode  {:#o} (kind {:?})", attr.mode, attr.kind());
    println!("  links {}", attr.nlink);
    println!("  size  {} bytes", attr.size);
    println!("  atime {:?}", attr.atime);
    println!("  btime {:?}", attr.btime);
    println!("  ctime {:?}", attr.ctime);
    println!("  mtime {:?}", attr.mtime);

    Ok(())
}
