// Plain-path settings example for regcfg
//
// Run with: cargo run --example scoped_settings

use regcfg::{MemoryStore, RegistrySettings};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = RegistrySettings::for_app(
        Arc::new(MemoryStore::new()),
        r"Software\Example\Editor",
        true,
        false,
    )?;
    println!("📦 regcfg Scoped Settings Example\n");
    println!("🔑 {settings:?}\n");

    // Values in the base key and in sub-keys
    settings.set_value("Theme", "dark", None)?;
    settings.set_value("Width", 1280u32, Some("Window"))?;
    settings.set_value("Height", 720u32, Some("Window"))?;
    settings.set_value("Recent", vec!["a.txt".to_string(), "b.txt".to_string()], Some(r"Files\History"))?;

    println!("✅ Sub-keys: {:?}", settings.subkey_names(None)?);
    println!("✅ Values:   {:?}", settings.value_names(None)?);

    // A scoped accessor sees paths relative to its own key
    let window = settings.open_key("Window")?;
    let width: u32 = window.get_value("Width", None, 800)?;
    let height: u32 = window.get_value("Height", None, 600)?;
    println!("\n🪟 Window: {width}x{height}");

    // Missing keys are not errors here
    println!("❔ Plugins key present: {}", settings.has_key("Plugins")?);
    println!("❔ Plugin values: {:?}", settings.value_names(Some("Plugins"))?);

    let recent: Vec<String> = settings.get_value("Recent", Some(r"Files\History"), Vec::new())?;
    println!("\n📂 Recent files: {recent:?}");
    Ok(())
}
