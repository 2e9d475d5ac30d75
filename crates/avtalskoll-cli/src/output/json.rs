use avtalskoll_core::checks::CheckOutcome;
use avtalskoll_core::error::AvtalskollError;

pub fn print(outcome: &CheckOutcome) -> Result<(), AvtalskollError> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{json}");
    Ok(())
}
