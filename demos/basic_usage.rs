// Basic usage example for regcfg
//
// Run with: cargo run --example basic_usage

use regcfg::{ConfigProvider, FileStore, RegistryConfigProvider};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Hive documents land in ./example_registry/<view>/<hive>.json
    let store = Arc::new(FileStore::open("./example_registry"));
    let config = RegistryConfigProvider::parse(
        store,
        "registry://HKEY_CURRENT_USER/Software/Example/App/",
    )?;

    println!("📦 regcfg Basic Usage Example\n");

    // Writing creates every missing key on the way
    println!("🔧 Writing settings...");
    config.set_value("Name", "My App")?;
    config.set_value("Network/Port", 8080u32)?;
    config.set_value("Network/Origins", vec!["http://localhost:3000".to_string()])?;
    config.set_value("Advanced/Debug", false)?;

    // Children come back as absolute addresses; print them relative to the base
    println!("✅ Children of {}:", config.base_address());
    for child in config.children_at_base()? {
        let name = child.relative_to(config.base_address()).unwrap_or_default();
        let kind = if child.is_container() { "key" } else { "value" };
        println!("   {name:<12} ({kind})");
    }

    // Reads fall back to the default when nothing is stored
    let port: u32 = config.get_value("Network/Port", 80)?;
    let timeout: u32 = config.get_value("Network/Timeout", 30)?;
    println!("\n🌐 Port: {port}, timeout: {timeout}s (default)");

    // Absolute addresses bypass the base entirely
    let machine_wide: bool = config.get_value(
        "registry://HKEY_LOCAL_MACHINE/Software/Example/App/Installed",
        false,
    )?;
    println!("🖥️  Installed machine-wide: {machine_wide}");

    println!("\n✨ Done! Check ./example_registry/ for the stored documents.");
    Ok(())
}
