use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// arXiv subject areas the paper can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Category {
    #[serde(rename = "hep-ph")]
    HepPh,
    #[serde(rename = "hep-th")]
    HepTh,
    #[serde(rename = "hep-lat")]
    HepLat,
    #[serde(rename = "gr-qc")]
    GrQc,
    #[serde(rename = "astro-ph")]
    AstroPh,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::HepPh,
        Category::HepTh,
        Category::HepLat,
        Category::GrQc,
        Category::AstroPh,
    ];

    /// The arXiv tag, as used in `cat:` queries.
    pub fn id(self) -> &'static str {
        match self {
            Category::HepPh => "hep-ph",
            Category::HepTh => "hep-th",
            Category::HepLat => "hep-lat",
            Category::GrQc => "gr-qc",
            Category::AstroPh => "astro-ph",
        }
    }

    /// Section heading shown on the page.
    pub fn section_name(self) -> &'static str {
        match self {
            Category::HepPh => "Phenomenology",
            Category::HepTh => "Theory",
            Category::HepLat => "Lattice",
            Category::GrQc => "GR & Quantum Cosmology",
            Category::AstroPh => "Astrophysics",
        }
    }

    pub fn search_query(self) -> String {
        format!("cat:{}", self.id())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("unknown arXiv category: {}", s))
    }
}
