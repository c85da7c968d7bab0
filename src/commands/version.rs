//! Version command implementation

use appctl::error::Result;
use appctl::environment::{Capability, PluginRegistry};

/// Run version command
pub fn run() -> Result<()> {
    println!("appctl {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());

    let registry = PluginRegistry::builtin();
    println!();
    println!("Plugins:");
    println!(
        "  Stream providers: {}",
        registry.ids_for(Capability::StreamProvider).join(", ")
    );
    println!(
        "  Metadata stores: {}",
        registry.ids_for(Capability::MetadataStore).join(", ")
    );

    Ok(())
}

fn rustc_version() -> &'static str {
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
