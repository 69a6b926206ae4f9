/// Qualitative band for a 0-100 health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => Self::Poor,
            30..=59 => Self::Fair,
            60..=79 => Self::Good,
            _ => Self::Excellent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Poor => "Little is left after discretionary spending",
            Self::Fair => "Consider setting more aside each month",
            Self::Good => "A healthy share of income is kept back",
            Self::Excellent => "Most of your income is kept back",
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
