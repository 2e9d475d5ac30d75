use serde::Serialize;
use std::fmt;

use crate::model::Deviation;

/// Reason column shared by every check.
pub const REASON: &str = "Orsak";

/// Which fraction comparison to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionVariant {
    /// Flag when the primary fraction's densest frequency exceeds the secondary's.
    #[default]
    MaxExceeds,
    /// Flag whenever the two fractions' distinct frequencies differ.
    DistinctSet,
}

/// The available checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    FractionFrequency(FractionVariant),
    BillingGroup,
    ContainerCount,
    DoorAddon,
    PriceComponent,
    SludgeFacility,
}

impl CheckKind {
    pub const ALL: [CheckKind; 6] = [
        CheckKind::FractionFrequency(FractionVariant::MaxExceeds),
        CheckKind::BillingGroup,
        CheckKind::ContainerCount,
        CheckKind::DoorAddon,
        CheckKind::PriceComponent,
        CheckKind::SludgeFacility,
    ];

    /// Short name used on the command line and in output file names.
    pub fn slug(&self) -> &'static str {
        match self {
            CheckKind::FractionFrequency(_) => "hamtfrekvens",
            CheckKind::BillingGroup => "debiteringsgrupp",
            CheckKind::ContainerCount => "individer",
            CheckKind::DoorAddon => "dorrtillagg",
            CheckKind::PriceComponent => "prisdel",
            CheckKind::SludgeFacility => "slamanlaggningar",
        }
    }

    pub fn from_slug(slug: &str) -> Option<CheckKind> {
        let slug = slug.trim().to_lowercase();
        CheckKind::ALL.into_iter().find(|k| k.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            CheckKind::FractionFrequency(_) => "Hämtfrekvens matavfall mot restavfall",
            CheckKind::BillingGroup => "Debiteringsgrupp mot affärsenhet",
            CheckKind::ContainerCount => "Antal kärl mot aktiva individer",
            CheckKind::DoorAddon => "Dörrtillägg mot kärlens hämtfrekvens",
            CheckKind::PriceComponent => "Hämtfrekvens mot prisdel",
            CheckKind::SludgeFacility => "Slamanläggningar",
        }
    }

    /// Report column width for the deviation workbook.
    pub fn column_width(&self) -> f64 {
        match self {
            CheckKind::FractionFrequency(_) => 25.0,
            _ => 30.0,
        }
    }

    /// Human-readable summary for a deviation count.
    pub fn summary(&self, deviations: usize) -> String {
        if deviations == 0 {
            return "Inga avvikelser hittades.".to_string();
        }
        match self {
            CheckKind::FractionFrequency(FractionVariant::MaxExceeds) => format!(
                "{deviations} flexplatser har avvikelser där matavfallet har tätare hämtning än restavfallet och behöver åtgärd"
            ),
            CheckKind::FractionFrequency(FractionVariant::DistinctSet) => format!(
                "{deviations} flexplatser har olika hämtfrekvenser för matavfall och restavfall och behöver åtgärd"
            ),
            CheckKind::BillingGroup => format!(
                "{deviations} avtal ligger på felaktig debiteringsgrupp och behöver åtgärd"
            ),
            CheckKind::ContainerCount => format!(
                "{deviations} flextjänster har avvikande antalsvärde mot antalet aktiva individer"
            ),
            CheckKind::DoorAddon => format!(
                "{deviations} flexplatser har mismatch i hämtfrekvens mellan dörrtillägg/kärl och behöver åtgärd"
            ),
            CheckKind::PriceComponent => format!(
                "{deviations} flextjänster har mismatch mellan hämtfrekvensen och prisdelen på avtalet."
            ),
            CheckKind::SludgeFacility => {
                format!("{deviations} anläggningar har avvikelser som behöver hanteras")
            }
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Ordered deviations found by one check, with the report's column layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationReport {
    pub check: CheckKind,
    /// Output columns, in order. Deviations may omit some of them.
    pub columns: Vec<String>,
    pub deviations: Vec<Deviation>,
}

impl DeviationReport {
    pub fn new(check: CheckKind, columns: &[&str]) -> Self {
        DeviationReport {
            check,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            deviations: Vec::new(),
        }
    }

    pub fn push(&mut self, deviation: Deviation) {
        self.deviations.push(deviation);
    }

    pub fn len(&self) -> usize {
        self.deviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deviations.is_empty()
    }
}

/// A finished check: the report plus the summary shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub deviation_count: usize,
    pub summary: String,
    pub report: DeviationReport,
}

impl From<DeviationReport> for CheckOutcome {
    fn from(report: DeviationReport) -> Self {
        CheckOutcome {
            deviation_count: report.len(),
            summary: report.check.summary(report.len()),
            report,
        }
    }
}
