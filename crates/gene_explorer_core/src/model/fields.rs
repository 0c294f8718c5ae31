use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one control of the explorer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldId {
    Response,
    Timepoint,
    Cohorts,
    Normalize,
    Genes,
    TextSize,
    Facet,
    Shape,
    Color,
    Size,
    Alpha,
}

impl FieldId {
    /// All fields in display order.
    pub const ALL: [FieldId; 11] = [
        FieldId::Response,
        FieldId::Timepoint,
        FieldId::Cohorts,
        FieldId::Normalize,
        FieldId::Genes,
        FieldId::TextSize,
        FieldId::Facet,
        FieldId::Shape,
        FieldId::Color,
        FieldId::Size,
        FieldId::Alpha,
    ];

    /// Fields locked while a plot request is in flight.
    pub const PRIMARY: [FieldId; 4] = [
        FieldId::Response,
        FieldId::Cohorts,
        FieldId::Timepoint,
        FieldId::Genes,
    ];

    /// Fields that must hold a valid value before a plot can be requested.
    pub const REQUIRED: [FieldId; 5] = [
        FieldId::Response,
        FieldId::Timepoint,
        FieldId::Cohorts,
        FieldId::Genes,
        FieldId::TextSize,
    ];

    pub fn is_primary(self) -> bool {
        Self::PRIMARY.contains(&self)
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// Whether the field belongs to the "Additional options" section.
    pub fn is_additional_option(self) -> bool {
        matches!(
            self,
            FieldId::TextSize
                | FieldId::Facet
                | FieldId::Shape
                | FieldId::Color
                | FieldId::Size
                | FieldId::Alpha
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Response => "Response",
            FieldId::Timepoint => "Time point",
            FieldId::Cohorts => "Cohorts",
            FieldId::Normalize => "Normalize to baseline",
            FieldId::Genes => "Genes",
            FieldId::TextSize => "Text size",
            FieldId::Facet => "Facet",
            FieldId::Shape => "Shape",
            FieldId::Color => "Color",
            FieldId::Size => "Size",
            FieldId::Alpha => "Alpha",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            FieldId::Response => {
                "The variable to plot against the expression of selected genes. \
                 For HAI, the timepoint of peak immunogenicity is selected."
            }
            FieldId::Timepoint => "The gene-expression time point to plot.",
            FieldId::Cohorts => {
                "The cohorts with subjects of interest. \
                 Some cohorts might only be available at specific timepoints."
            }
            FieldId::Normalize => {
                "Should the data be normalized to baseline (i.e. subtract the day 0 response \
                 after log transformation), or simply plot the un-normalized data."
            }
            FieldId::Genes => "The genes to plot.",
            FieldId::TextSize => {
                "The size of all text elements on the plot (Including axis, legend and labels)"
            }
            FieldId::Facet => {
                "The plot will facet by cohorts on the y axis and genes on the x axis. \
                 In `grid` mode, the scales are consistent for a gene and for a cohort. \
                 In `wrap` mode, the scales are free. Use wrap if you observe empty spaces \
                 in the plots. `wrap` is also more appropriate when plotting many genes \
                 and a single cohort."
            }
            FieldId::Shape => "The shape of the data points.",
            FieldId::Color => "The color of the data points. (Age is selected by default)",
            FieldId::Size => "The size of the data points.",
            FieldId::Alpha => "The transparency of the data points.",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immunological response plotted against gene expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseVariable {
    #[serde(rename = "HAI")]
    Hai,
}

impl ResponseVariable {
    pub const ALL: [ResponseVariable; 1] = [ResponseVariable::Hai];

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseVariable::Hai => "HAI",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ResponseVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facetting mode of the plot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facet {
    #[default]
    Grid,
    Wrap,
}

impl Facet {
    pub const ALL: [Facet; 2] = [Facet::Grid, Facet::Wrap];

    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Grid => "Grid",
            Facet::Wrap => "Wrap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn toggled(self) -> Self {
        match self {
            Facet::Grid => Facet::Wrap,
            Facet::Wrap => Facet::Grid,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demographic variable mapped onto a point aesthetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Demographic {
    Age,
    Gender,
    Race,
}

impl Demographic {
    /// Options for the color, size and alpha aesthetics.
    pub const ALL: [Demographic; 3] = [Demographic::Age, Demographic::Gender, Demographic::Race];

    /// Shape only accepts discrete variables.
    pub const SHAPE_OPTIONS: [Demographic; 2] = [Demographic::Gender, Demographic::Race];

    pub fn as_str(self) -> &'static str {
        match self {
            Demographic::Age => "Age",
            Demographic::Gender => "Gender",
            Demographic::Race => "Race",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Demographic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
