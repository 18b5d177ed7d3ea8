//! Currency tables
//!
//! Price and currency-presence patterns are plain data handed to the pricing
//! extractor. Adding a currency or a pattern means adding a table row, not a
//! new branch in the extractor.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Numeric amount: `99`, `99.99`, `1,299`, `1,299.00`
const AMOUNT: &str = r"(?P<amount>\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+(?:\.\d{2})?)";

/// Bare `$` not preceded by a letter (so `C$`/`A$` stay with their own currency), or `US$`
const USD_SYMBOL: &str = r"(?:^|[^A-Za-z]|US)\$";

/// Currencies the extractor can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Inr,
    Jpy,
    Krw,
    Cad,
    Aud,
    Chf,
    Cny,
}

/// Display information for a currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub name: &'static str,
    pub symbol: &'static str,
    pub region: &'static str,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Inr => "INR",
            Self::Jpy => "JPY",
            Self::Krw => "KRW",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
            Self::Chf => "CHF",
            Self::Cny => "CNY",
        }
    }

    pub fn info(&self) -> CurrencyInfo {
        let (name, symbol, region) = match self {
            Self::Usd => ("US Dollar", "$", "United States"),
            Self::Eur => ("Euro", "€", "European Union"),
            Self::Gbp => ("British Pound", "£", "United Kingdom"),
            Self::Inr => ("Indian Rupee", "₹", "India"),
            Self::Jpy => ("Japanese Yen", "¥", "Japan"),
            Self::Krw => ("Korean Won", "₩", "South Korea"),
            Self::Cad => ("Canadian Dollar", "C$", "Canada"),
            Self::Aud => ("Australian Dollar", "A$", "Australia"),
            Self::Chf => ("Swiss Franc", "CHF", "Switzerland"),
            Self::Cny => ("Chinese Yuan", "¥", "China"),
        };
        CurrencyInfo {
            name,
            symbol,
            region,
        }
    }

    /// Maps a bare currency symbol to its currency. `¥` resolves to JPY.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "$" => Some(Self::Usd),
            "€" => Some(Self::Eur),
            "£" => Some(Self::Gbp),
            "₹" => Some(Self::Inr),
            "¥" => Some(Self::Jpy),
            "₩" => Some(Self::Krw),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How the currency of a price match is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyHint {
    /// The pattern is specific to one currency
    Fixed(Currency),
    /// Read from the optional `symbol` capture group; unknown when absent
    FromSymbol,
    /// Currency-agnostic pattern
    Unknown,
}

/// One row of the price pattern table
#[derive(Debug, Clone)]
pub struct PricePattern {
    pub regex: Regex,
    pub hint: CurrencyHint,
}

impl PricePattern {
    /// Source text of the pattern, recorded on every match
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }
}

/// Static pattern data consumed by the pricing extractor
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    /// Price patterns, evaluated in order
    pub price_patterns: Vec<PricePattern>,
    /// Presence patterns per currency, in table order
    pub presence_patterns: Vec<(Currency, Vec<Regex>)>,
}

static STANDARD_TABLE: LazyLock<CurrencyTable> = LazyLock::new(build_standard_table);

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl CurrencyTable {
    /// The built-in table: USD, EUR, GBP, INR, JPY, KRW, CAD, AUD price
    /// patterns, currency-agnostic B2B patterns, and presence patterns that
    /// additionally recognise CHF and CNY
    pub fn standard() -> Self {
        STANDARD_TABLE.clone()
    }

    /// Appends a price pattern (case-insensitive)
    pub fn with_price_pattern(mut self, pattern: &str, hint: CurrencyHint) -> Result<Self, regex::Error> {
        self.price_patterns.push(PricePattern {
            regex: ci(pattern)?,
            hint,
        });
        Ok(self)
    }

    /// Appends a presence pattern for `currency` (case-insensitive)
    pub fn with_presence_pattern(mut self, currency: Currency, pattern: &str) -> Result<Self, regex::Error> {
        let regex = ci(pattern)?;
        match self.presence_patterns.iter_mut().find(|(c, _)| *c == currency) {
            Some((_, patterns)) => patterns.push(regex),
            None => self.presence_patterns.push((currency, vec![regex])),
        }
        Ok(self)
    }
}

fn ci(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){}", pattern))
}

fn build_standard_table() -> CurrencyTable {
    use Currency::*;
    use CurrencyHint::*;

    let price_rows: Vec<(String, CurrencyHint)> = vec![
        (format!("{}{}", USD_SYMBOL, AMOUNT), Fixed(Usd)),
        (format!(r"{}\s*(?:USD|dollars?)\b", AMOUNT), Fixed(Usd)),
        (format!(r"C\${}", AMOUNT), Fixed(Cad)),
        (format!(r"{}\s*CAD\b", AMOUNT), Fixed(Cad)),
        (format!(r"A\${}", AMOUNT), Fixed(Aud)),
        (format!(r"{}\s*AUD\b", AMOUNT), Fixed(Aud)),
        (format!("€{}", AMOUNT), Fixed(Eur)),
        (format!(r"{}\s*(?:EUR|euros?)\b", AMOUNT), Fixed(Eur)),
        (format!("£{}", AMOUNT), Fixed(Gbp)),
        (format!(r"{}\s*(?:GBP|pounds?)\b", AMOUNT), Fixed(Gbp)),
        (format!("₹{}", AMOUNT), Fixed(Inr)),
        (format!(r"{}\s*(?:INR|rupees?)\b", AMOUNT), Fixed(Inr)),
        (format!("¥{}", AMOUNT), Fixed(Jpy)),
        (format!(r"{}\s*(?:JPY|yen)\b", AMOUNT), Fixed(Jpy)),
        (format!("₩{}", AMOUNT), Fixed(Krw)),
        (format!(r"{}\s*(?:KRW|won)\b", AMOUNT), Fixed(Krw)),
        (
            format!(r"{}\s*(?:per|/)\s*(?:month|year|mo|yr|user|seat|license)\b", AMOUNT),
            Unknown,
        ),
        (format!(r"\bfrom\s*(?P<symbol>[€£₹¥₩$])?{}", AMOUNT), FromSymbol),
        (
            format!(r"\bstarting\s*at\s*(?P<symbol>[€£₹¥₩$])?{}", AMOUNT),
            FromSymbol,
        ),
        (
            format!(
                r"{}\s*(?:monthly|yearly|per\s*month|per\s*year|per\s*user|per\s*seat)\b",
                AMOUNT
            ),
            Unknown,
        ),
    ];

    let presence_rows: Vec<(Currency, Vec<String>)> = vec![
        (
            Usd,
            vec![
                USD_SYMBOL.to_string(),
                r"\bUSD\b".into(),
                r"\bdollars?\b".into(),
                r"US\s*dollars?".into(),
            ],
        ),
        (Eur, vec!["€".into(), r"\bEUR\b".into(), r"\beuros?\b".into()]),
        (
            Gbp,
            vec![
                "£".into(),
                r"\bGBP\b".into(),
                r"\bpounds?\b".into(),
                r"\bsterling\b".into(),
            ],
        ),
        (Inr, vec!["₹".into(), r"\bINR\b".into(), r"\brupees?\b".into()]),
        (Jpy, vec!["¥".into(), r"\bJPY\b".into(), r"\byen\b".into()]),
        (
            Cad,
            vec![r"C\$".into(), r"\bCAD\b".into(), r"Canadian\s*dollars?".into()],
        ),
        (
            Aud,
            vec![r"A\$".into(), r"\bAUD\b".into(), r"Australian\s*dollars?".into()],
        ),
        (Chf, vec![r"\bCHF\b".into(), r"Swiss\s*francs?".into()]),
        (
            Cny,
            vec![
                "¥".into(),
                r"\bCNY\b".into(),
                r"Chinese\s*yuan".into(),
                r"\brenminbi\b".into(),
            ],
        ),
        (Krw, vec!["₩".into(), r"\bKRW\b".into(), r"Korean\s*won".into()]),
    ];

    CurrencyTable {
        price_patterns: price_rows
            .into_iter()
            .map(|(pattern, hint)| PricePattern {
                regex: ci(&pattern).unwrap(),
                hint,
            })
            .collect(),
        presence_patterns: presence_rows
            .into_iter()
            .map(|(currency, patterns)| {
                let compiled = patterns.iter().map(|p| ci(p).unwrap()).collect();
                (currency, compiled)
            })
            .collect(),
    }
}
