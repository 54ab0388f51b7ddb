//! Price field names.
//!
//! Upstream data uses English column names; the dashboard shows fixed
//! Spanish display names. Lookups accept either form.

use std::fmt;

/// Display name of the date column.
pub const DATE_COLUMN: &str = "Fecha";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    /// Every numeric field, in column order.
    pub const ALL: [PriceField; 5] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::Volume,
    ];

    /// Fields offered by the price selector.
    pub const SELECTABLE: [PriceField; 4] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            PriceField::Open => "Apertura",
            PriceField::High => "Maximo",
            PriceField::Low => "Minimo",
            PriceField::Close => "Cierre",
            PriceField::Volume => "Volumen",
        }
    }

    pub fn upstream_name(self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::Volume => "Volume",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PriceField::Open => "Precio de apertura (USD).",
            PriceField::High => "Precio máximo del día.",
            PriceField::Low => "Precio mínimo del día.",
            PriceField::Close => "Precio de cierre del día.",
            PriceField::Volume => "Volumen total operado.",
        }
    }

    /// Resolve a display name or upstream name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<PriceField> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.display_name() == name || f.upstream_name() == name)
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Rows of the variable-definitions table: (name, description).
pub fn variable_definitions() -> Vec<(&'static str, &'static str)> {
    std::iter::once((DATE_COLUMN, "Fecha del registro."))
        .chain(PriceField::ALL.iter().map(|f| (f.display_name(), f.description())))
        .collect()
}
