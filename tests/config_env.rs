//! Kept in its own test binary: it mutates the process environment.
use das_node::config::NodeConfig;

#[test]
fn environment_overrides_file_and_defaults() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    std::io::Write::write_all(&mut file, b"[rpc]\nport = 7000\naddress = \"127.0.0.1\"\n")?;

    std::env::set_var("DAS__RPC__PORT", "9000");
    std::env::set_var("DAS__LOG__JSON", "true");
    let loaded = NodeConfig::load(Some(file.path()));
    std::env::remove_var("DAS__RPC__PORT");
    std::env::remove_var("DAS__LOG__JSON");

    let cfg = loaded?;
    assert_eq!(cfg.rpc.port, 9000);
    assert_eq!(cfg.rpc.address, "127.0.0.1");
    assert!(cfg.log.json);
    Ok(())
}
