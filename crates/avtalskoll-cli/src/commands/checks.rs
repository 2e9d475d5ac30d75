use avtalskoll_core::checks::{self, CheckKind};
use avtalskoll_core::error::AvtalskollError;

pub fn list() -> Result<(), AvtalskollError> {
    println!("Available checks:\n");
    for kind in CheckKind::ALL {
        println!("  {:<18} {}", kind.slug(), kind.title());
        println!(
            "                     Columns: {}",
            checks::required_columns(kind).join(", ")
        );
        println!();
    }
    println!("Use --strict with hamtfrekvens to flag any frequency difference.");
    Ok(())
}
