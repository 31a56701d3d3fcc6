//! Static guidance shown under every prediction.

/// One water-quality parameter and how to read it.
#[derive(Debug, Clone, Copy)]
pub struct ParameterNote {
    pub symbol: &'static str,
    pub name: &'static str,
    pub meaning: &'static str,
    pub limit: &'static str,
}

pub const PARAMETER_NOTES: [ParameterNote; 9] = [
    ParameterNote {
        symbol: "NH4",
        name: "Ammonium",
        meaning: "High levels may indicate pollution from wastewater or agricultural runoff and can be toxic to aquatic life.",
        limit: "< 0.5 mg/L for drinking water",
    },
    ParameterNote {
        symbol: "BSK5",
        name: "BOD5",
        meaning: "A high BSK5 indicates a lot of organic pollution, consuming oxygen and harming aquatic life.",
        limit: "< 3 mg/L for surface water",
    },
    ParameterNote {
        symbol: "Suspended Solids",
        name: "Suspended Solids",
        meaning: "High levels reduce light penetration, can clog fish gills, or smother eggs.",
        limit: "< 25 mg/L for surface water",
    },
    ParameterNote {
        symbol: "O2",
        name: "Dissolved Oxygen",
        meaning: "Essential for aquatic life. Low levels (< 5 mg/L) stress or kill aquatic organisms.",
        limit: "> 5 mg/L",
    },
    ParameterNote {
        symbol: "NO3",
        name: "Nitrate",
        meaning: "In excess, promotes algae growth (eutrophication) and can harm aquatic ecosystems and drinking water safety.",
        limit: "< 10 mg/L as NO3-N for drinking water",
    },
    ParameterNote {
        symbol: "NO2",
        name: "Nitrite",
        meaning: "Toxic to aquatic organisms, even at low concentrations, indicating a breakdown in nitrogen processing.",
        limit: "< 0.1 mg/L for drinking water",
    },
    ParameterNote {
        symbol: "SO4",
        name: "Sulfate",
        meaning: "Generally not harmful in low concentrations, but can affect taste and promote corrosion.",
        limit: "< 250 mg/L for drinking water",
    },
    ParameterNote {
        symbol: "PO4",
        name: "Phosphate",
        meaning: "Excess leads to algal blooms and eutrophication, causing oxygen depletion and fish kills.",
        limit: "< 0.1 mg/L for surface water",
    },
    ParameterNote {
        symbol: "Cl",
        name: "Chloride",
        meaning: "High concentrations affect drinking water taste and harm freshwater organisms.",
        limit: "< 250 mg/L for drinking water",
    },
];

pub const INTERPRETATION_HEADING: &str = "Interpretation of Water Quality Parameters:";

pub const SCORING_DISCLAIMER: &str = "The scoring is based on general acceptable limits and environmental impact. Specific regulations may vary.";

impl ParameterNote {
    /// Bold-free heading, e.g. `NO3 (Nitrate)`.
    pub fn heading(&self) -> String {
        if self.symbol == self.name {
            self.symbol.to_string()
        } else {
            format!("{} ({})", self.symbol, self.name)
        }
    }
}
