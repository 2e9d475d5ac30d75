use avtalskoll_core::config::{builtin, load_config};
use avtalskoll_core::error::AvtalskollError;
use std::path::Path;

pub fn show() -> Result<(), AvtalskollError> {
    builtin::load_default()?;
    println!("{}", builtin::default_json().trim_end());
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), AvtalskollError> {
    let config = load_config(file)?;

    println!("Configuration '{}' (v{}) is valid.", config.name, config.version);
    println!("  Frequencies: {}", config.weekly_frequencies.len());
    println!(
        "  Fractions: {} vs {} ({} alias(es))",
        config.fractions.primary,
        config.fractions.secondary,
        config.fractions.aliases.len()
    );
    println!(
        "  Billing: {} polic(ies), {} ignored group(s)",
        config.billing.policies.len(),
        config.billing.ignored_groups.len()
    );
    println!(
        "  Flex groups: {} container label(s), {} addon label(s)",
        config.flex_groups.containers.len(),
        config.flex_groups.addons.len()
    );
    Ok(())
}
