//! Display helpers for rupee amounts and risk colouring.

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;

/// Headline exposure figure, e.g. `₹1.60 Cr`.
pub fn crore(amount: f64) -> String {
    format!("₹{:.2} Cr", amount / CRORE)
}

/// Short axis label: `₹1.2Cr`, `₹4.5L`, `₹12K` or the raw amount.
pub fn compact_currency(amount: f64) -> String {
    if amount >= CRORE {
        format!("₹{:.1}Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.1}L", amount / LAKH)
    } else if amount >= 1_000.0 {
        format!("₹{:.0}K", amount / 1_000.0)
    } else {
        format!("₹{amount}")
    }
}

/// Detailed amount: `₹2.40 Cr`, `₹1.50 L` or grouped thousands.
pub fn detailed_currency(amount: f64) -> String {
    if amount >= CRORE {
        format!("₹{:.2} Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.2} L", amount / LAKH)
    } else {
        format!("₹{}", group_thousands(amount))
    }
}

fn group_thousands(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let fraction = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction == 0 {
        grouped
    } else {
        format!("{grouped}.{fraction:02}")
    }
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Colour band used by the risk tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Severe,
    Elevated,
    Low,
}

impl RiskBand {
    pub fn for_score(score: u8) -> Self {
        if score >= 80 {
            RiskBand::Severe
        } else if score >= 50 {
            RiskBand::Elevated
        } else {
            RiskBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Severe => "severe",
            RiskBand::Elevated => "elevated",
            RiskBand::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_headline_exposure() {
        assert_eq!(crore(160_000.0), "₹0.02 Cr");
        assert_eq!(crore(25_000_000.0), "₹2.50 Cr");
    }

    #[test]
    fn compact_currency_picks_unit() {
        assert_eq!(compact_currency(12_000_000.0), "₹1.2Cr");
        assert_eq!(compact_currency(450_000.0), "₹4.5L");
        assert_eq!(compact_currency(12_000.0), "₹12K");
        assert_eq!(compact_currency(800.0), "₹800");
    }

    #[test]
    fn detailed_currency_groups_thousands() {
        assert_eq!(detailed_currency(98_765.5), "₹98,765.50");
        assert_eq!(detailed_currency(1_000.0), "₹1,000");
        assert_eq!(detailed_currency(150_000.0), "₹1.50 L");
    }

    #[test]
    fn risk_band_boundaries() {
        assert_eq!(RiskBand::for_score(80), RiskBand::Severe);
        assert_eq!(RiskBand::for_score(50), RiskBand::Elevated);
        assert_eq!(RiskBand::for_score(49), RiskBand::Low);
    }
}
