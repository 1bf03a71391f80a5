//! Page size presets and geometry resolution
//!
//! Maps a size preset name plus orientation and margin to the absolute
//! physical dimensions the rest of the pipeline works with. Dimensions are
//! in millimeters throughout; margins carry their own unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Registered page size presets (portrait dimensions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    /// US Letter
    Letter,
    /// US Legal
    Legal,
    /// US Tabloid
    Tabloid,
    /// US Ledger (tabloid rotated)
    Ledger,
    /// Elongated preset for long-form single-page documents
    CaseStudy,
}

impl PageSize {
    /// All registered presets, in registry order
    pub fn all() -> &'static [PageSize] {
        &[
            Self::A0,
            Self::A1,
            Self::A2,
            Self::A3,
            Self::A4,
            Self::A5,
            Self::Letter,
            Self::Legal,
            Self::Tabloid,
            Self::Ledger,
            Self::CaseStudy,
        ]
    }

    /// Registry name of the preset
    pub fn name(&self) -> &'static str {
        match self {
            Self::A0 => "a0",
            Self::A1 => "a1",
            Self::A2 => "a2",
            Self::A3 => "a3",
            Self::A4 => "a4",
            Self::A5 => "a5",
            Self::Letter => "letter",
            Self::Legal => "legal",
            Self::Tabloid => "tabloid",
            Self::Ledger => "ledger",
            Self::CaseStudy => "case_study",
        }
    }

    /// Portrait width and height in millimeters
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Self::A0 => (841.0, 1189.0),
            Self::A1 => (594.0, 841.0),
            Self::A2 => (420.0, 594.0),
            Self::A3 => (297.0, 420.0),
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (216.0, 279.0),
            Self::Legal => (216.0, 356.0),
            Self::Tabloid => (279.0, 432.0),
            Self::Ledger => (432.0, 279.0),
            Self::CaseStudy => (420.0, 1189.0),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageSize {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .find(|p| p.name() == wanted)
            .copied()
            .ok_or_else(|| RenderError::UnknownPreset {
                name: s.to_string(),
                valid: Self::all()
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Preset dimensions as registered
    #[default]
    Portrait,
    /// Width and height swapped
    Landscape,
}

impl Orientation {
    /// Name as used in CSS and filenames
    pub fn name(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Orientation {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(RenderError::UnknownPreset {
                name: other.to_string(),
                valid: "portrait, landscape".to_string(),
            }),
        }
    }
}

/// Supported margin length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    Cm,
    In,
}

impl LengthUnit {
    fn suffix(&self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::In => "in",
        }
    }

    fn to_mm(self) -> f64 {
        match self {
            Self::Mm => 1.0,
            Self::Cm => 10.0,
            Self::In => 25.4,
        }
    }
}

/// A uniform page margin: a length with a unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Numeric value in `unit`
    pub value: f64,
    /// Length unit of `value`
    pub unit: LengthUnit,
}

impl Margin {
    /// Construct a margin in millimeters
    pub fn mm(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Mm,
        }
    }

    /// The margin converted to millimeters
    pub fn to_mm(&self) -> f64 {
        self.value * self.unit.to_mm()
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::mm(20.0)
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trim trailing ".0" so "20mm" round-trips as entered
        if self.value.fract() == 0.0 {
            write!(f, "{}{}", self.value as i64, self.unit.suffix())
        } else {
            write!(f, "{}{}", self.value, self.unit.suffix())
        }
    }
}

impl FromStr for Margin {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| RenderError::InvalidMargin(format!("'{s}' is missing a unit (mm, cm, in)")))?;
        let (number, unit) = s.split_at(split);

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| RenderError::InvalidMargin(format!("'{s}' has no numeric value")))?;

        let unit = match unit.trim().to_lowercase().as_str() {
            "mm" => LengthUnit::Mm,
            "cm" => LengthUnit::Cm,
            "in" => LengthUnit::In,
            other => {
                return Err(RenderError::InvalidMargin(format!(
                    "unrecognized unit '{other}' (expected mm, cm, or in)"
                )))
            }
        };

        if value < 0.0 {
            return Err(RenderError::InvalidMargin(format!(
                "'{s}' is negative; margins must be >= 0"
            )));
        }

        Ok(Self { value, unit })
    }
}

/// Resolved absolute page dimensions and margin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width in millimeters, after any orientation swap
    pub width_mm: f64,
    /// Page height in millimeters, after any orientation swap
    pub height_mm: f64,
    /// Uniform margin on all four sides
    pub margin: Margin,
}

impl PageGeometry {
    /// Resolve a preset + orientation + margin into absolute dimensions
    ///
    /// Landscape swaps width/height after preset lookup. Fails with
    /// `InvalidMargin` when the margin would degenerate the content area
    /// (margin must be strictly less than half the smaller dimension).
    pub fn resolve(size: PageSize, orientation: Orientation, margin: Margin) -> Result<Self> {
        let (w, h) = size.dimensions_mm();
        let (width_mm, height_mm) = match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };

        let margin_mm = margin.to_mm();
        if margin_mm < 0.0 {
            return Err(RenderError::InvalidMargin(format!(
                "{margin} is negative; margins must be >= 0"
            )));
        }
        let limit = width_mm.min(height_mm) / 2.0;
        if margin_mm >= limit {
            return Err(RenderError::InvalidMargin(format!(
                "{margin} leaves no content area on a {width_mm}x{height_mm}mm page \
                 (must be less than {limit}mm)"
            )));
        }

        Ok(Self {
            width_mm,
            height_mm,
            margin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_dimension_table() {
        let expected = [
            (PageSize::A0, 841.0, 1189.0),
            (PageSize::A1, 594.0, 841.0),
            (PageSize::A2, 420.0, 594.0),
            (PageSize::A3, 297.0, 420.0),
            (PageSize::A4, 210.0, 297.0),
            (PageSize::A5, 148.0, 210.0),
            (PageSize::Letter, 216.0, 279.0),
            (PageSize::Legal, 216.0, 356.0),
            (PageSize::Tabloid, 279.0, 432.0),
            (PageSize::Ledger, 432.0, 279.0),
            (PageSize::CaseStudy, 420.0, 1189.0),
        ];
        for (size, w, h) in expected {
            assert_eq!(size.dimensions_mm(), (w, h), "preset {size}");
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("a4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!("A3".parse::<PageSize>().unwrap(), PageSize::A3);
        assert_eq!(
            "case_study".parse::<PageSize>().unwrap(),
            PageSize::CaseStudy
        );
    }

    #[test]
    fn test_unknown_preset_lists_valid_names() {
        let err = "b4".parse::<PageSize>().unwrap_err();
        match err {
            RenderError::UnknownPreset { name, valid } => {
                assert_eq!(name, "b4");
                assert!(valid.contains("a4"));
                assert!(valid.contains("case_study"));
            }
            other => panic!("Expected UnknownPreset, got {other:?}"),
        }
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        for size in PageSize::all() {
            let portrait =
                PageGeometry::resolve(*size, Orientation::Portrait, Margin::mm(10.0)).unwrap();
            let landscape =
                PageGeometry::resolve(*size, Orientation::Landscape, Margin::mm(10.0)).unwrap();
            assert_eq!(portrait.width_mm, landscape.height_mm);
            assert_eq!(portrait.height_mm, landscape.width_mm);
            // Swap inverts the aspect relation
            if portrait.height_mm >= portrait.width_mm {
                assert!(landscape.width_mm >= landscape.height_mm);
            }
        }
    }

    #[test]
    fn test_margin_parsing() {
        for input in ["20mm", "15mm", "1in", "2cm"] {
            assert!(input.parse::<Margin>().is_ok(), "failed to parse {input}");
        }
        let inch = "1in".parse::<Margin>().unwrap();
        let mm20 = "20mm".parse::<Margin>().unwrap();
        let cm2 = "2cm".parse::<Margin>().unwrap();
        assert!(inch.to_mm() > mm20.to_mm());
        assert_eq!(cm2.to_mm(), 20.0);
        assert_eq!(inch.to_mm(), 25.4);
    }

    #[test]
    fn test_margin_rejects_unitless_and_bad_units() {
        assert!(matches!(
            "20".parse::<Margin>(),
            Err(RenderError::InvalidMargin(_))
        ));
        assert!(matches!(
            "20px".parse::<Margin>(),
            Err(RenderError::InvalidMargin(_))
        ));
        assert!(matches!(
            "mm".parse::<Margin>(),
            Err(RenderError::InvalidMargin(_))
        ));
        assert!(matches!(
            "-5mm".parse::<Margin>(),
            Err(RenderError::InvalidMargin(_))
        ));
    }

    #[test]
    fn test_margin_display_roundtrip() {
        assert_eq!("20mm".parse::<Margin>().unwrap().to_string(), "20mm");
        assert_eq!("1in".parse::<Margin>().unwrap().to_string(), "1in");
        assert_eq!("2.5cm".parse::<Margin>().unwrap().to_string(), "2.5cm");
    }

    #[test]
    fn test_degenerate_margin_rejected() {
        // Half of A5's smaller dimension is 74mm
        let err = PageGeometry::resolve(PageSize::A5, Orientation::Portrait, Margin::mm(74.0));
        assert!(matches!(err, Err(RenderError::InvalidMargin(_))));

        let ok = PageGeometry::resolve(PageSize::A5, Orientation::Portrait, Margin::mm(73.0));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_zero_margin_valid() {
        let geom =
            PageGeometry::resolve(PageSize::A4, Orientation::Portrait, Margin::mm(0.0)).unwrap();
        assert_eq!(geom.margin.to_mm(), 0.0);
    }

    #[test]
    fn test_case_study_portrait() {
        let geom = PageGeometry::resolve(
            PageSize::CaseStudy,
            Orientation::Portrait,
            "20mm".parse().unwrap(),
        )
        .unwrap();
        assert_eq!(geom.width_mm, 420.0);
        assert_eq!(geom.height_mm, 1189.0);
    }
}
